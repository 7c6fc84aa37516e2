//! Extension <-> media type registry.

/// Media type used when an extension has no registered mapping.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Extension/media-type lookups. Extensions are given without the leading dot.
pub trait MimeRegistry {
    fn mime_for_extension(&self, extension: &str) -> Option<&str>;

    /// Preferred extension for `mime`, without the leading dot.
    fn extension_for_mime(&self, mime: &str) -> Option<&str>;
}

/// Built-in table of common types.
///
/// When several extensions share a type, the first listed is the one
/// returned by `extension_for_mime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMimeRegistry;

const TABLE: &[(&str, &str)] = &[
    // documents
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ("xls", "application/vnd.ms-excel"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("ppt", "application/vnd.ms-powerpoint"),
    ("pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation"),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
    ("odp", "application/vnd.oasis.opendocument.presentation"),
    ("rtf", "application/rtf"),
    ("epub", "application/epub+zip"),
    // text
    ("txt", "text/plain"),
    ("text", "text/plain"),
    ("log", "text/plain"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("md", "text/markdown"),
    ("xml", "text/xml"),
    ("vcf", "text/x-vcard"),
    ("ics", "text/calendar"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    // images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("ico", "image/x-icon"),
    // audio
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("opus", "audio/opus"),
    ("flac", "audio/flac"),
    ("wav", "audio/x-wav"),
    ("mid", "audio/midi"),
    ("midi", "audio/midi"),
    // video
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("3gp", "video/3gpp"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    // archives and packages
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("tgz", "application/gzip"),
    ("bz2", "application/x-bzip2"),
    ("xz", "application/x-xz"),
    ("7z", "application/x-7z-compressed"),
    ("rar", "application/x-rar-compressed"),
    ("tar", "application/x-tar"),
    ("apk", "application/vnd.android.package-archive"),
    ("deb", "application/vnd.debian.binary-package"),
    ("iso", "application/x-iso9660-image"),
    // fonts
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
];

impl MimeRegistry for BuiltinMimeRegistry {
    fn mime_for_extension(&self, extension: &str) -> Option<&str> {
        if extension.is_empty() {
            return None;
        }
        TABLE
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, mime)| *mime)
    }

    fn extension_for_mime(&self, mime: &str) -> Option<&str> {
        // Parameters such as "; charset=utf-8" don't affect the extension.
        let essence = mime.split(';').next().unwrap_or("").trim();
        if essence.is_empty() {
            return None;
        }
        TABLE
            .iter()
            .find(|(_, m)| m.eq_ignore_ascii_case(essence))
            .map(|(ext, _)| *ext)
    }
}

/// Substring after the last `.` of `name`, or `""` when there is none.
pub fn extension_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_of_uses_last_dot() {
        assert_eq!(extension_of("report.pdf"), "pdf");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of(".hidden"), "hidden");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let r = BuiltinMimeRegistry;
        assert_eq!(r.mime_for_extension("PDF"), Some("application/pdf"));
        assert_eq!(r.mime_for_extension("Jpg"), Some("image/jpeg"));
        assert_eq!(r.mime_for_extension(""), None);
        assert_eq!(r.mime_for_extension("nope"), None);
    }

    #[test]
    fn reverse_lookup_prefers_first_extension() {
        let r = BuiltinMimeRegistry;
        assert_eq!(r.extension_for_mime("image/jpeg"), Some("jpg"));
        assert_eq!(r.extension_for_mime("text/plain; charset=utf-8"), Some("txt"));
        assert_eq!(r.extension_for_mime("IMAGE/PNG"), Some("png"));
        assert_eq!(r.extension_for_mime("application/x-unknown"), None);
        assert_eq!(r.extension_for_mime(""), None);
    }
}
