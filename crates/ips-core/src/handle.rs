//! Opaque resource handles.
//!
//! A handle is a URL-shaped capability token (`content://authority/path`)
//! granted by some external provider. The core never dereferences it directly;
//! everything goes through [`crate::provider::ContentProvider`].

use std::fmt;
use std::str::FromStr;
use url::Url;

/// Reference to externally-owned bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    url: Url,
}

impl ResourceHandle {
    pub fn parse(s: &str) -> Result<Self, url::ParseError> {
        Url::parse(s).map(Self::from_url)
    }

    pub fn from_url(url: Url) -> Self {
        Self { url }
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Authority (host part) the handle is scoped to, if any.
    pub fn authority(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Percent-decoded non-empty path segments.
    pub fn path_segments(&self) -> Vec<String> {
        self.url
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(percent_decode)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Last non-empty path segment, percent-decoded.
    ///
    /// Returns `None` for root/empty paths and for `.` or `..`.
    pub fn last_path_segment(&self) -> Option<String> {
        let segment = self.path_segments().pop()?;
        if segment.is_empty() || segment == "." || segment == ".." {
            return None;
        }
        Some(segment)
    }
}

impl FromStr for ResourceHandle {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Lossy percent-decode of a single path segment. Malformed escapes are kept verbatim.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(s: &str) -> ResourceHandle {
        ResourceHandle::parse(s).unwrap()
    }

    #[test]
    fn last_segment_normal() {
        assert_eq!(
            handle("content://media.provider/external/images/photo.png")
                .last_path_segment()
                .as_deref(),
            Some("photo.png")
        );
        assert_eq!(
            handle("content://docs/single").last_path_segment().as_deref(),
            Some("single")
        );
    }

    #[test]
    fn last_segment_root_or_empty() {
        assert_eq!(handle("content://docs/").last_path_segment(), None);
        assert_eq!(handle("content://docs").last_path_segment(), None);
    }

    #[test]
    fn last_segment_skips_trailing_slash_and_query() {
        assert_eq!(
            handle("content://docs/a/b/").last_path_segment().as_deref(),
            Some("b")
        );
        assert_eq!(
            handle("content://docs/file.zip?token=abc")
                .last_path_segment()
                .as_deref(),
            Some("file.zip")
        );
    }

    #[test]
    fn last_segment_is_percent_decoded() {
        assert_eq!(
            handle("content://docs/tree/my%20report.pdf")
                .last_path_segment()
                .as_deref(),
            Some("my report.pdf")
        );
        assert_eq!(
            handle("content://docs/caf%C3%A9.txt")
                .last_path_segment()
                .as_deref(),
            Some("café.txt")
        );
    }

    #[test]
    fn percent_decode_keeps_malformed_escapes() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("a%zzb"), "a%zzb");
        assert_eq!(percent_decode("%4"), "%4");
    }

    #[test]
    fn authority_is_host() {
        let h = handle("content://com.example.files/shared/1");
        assert_eq!(h.authority(), Some("com.example.files"));
        assert_eq!(h.to_string(), "content://com.example.files/shared/1");
    }
}
