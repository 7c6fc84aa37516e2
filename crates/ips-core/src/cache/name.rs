//! Cache entry naming for a flat directory.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Normalizes a resolved name into a single path component.
///
/// - Replaces NUL, `/`, `\` and control characters with `_` (runs collapse)
/// - Trims surrounding whitespace
/// - Limits length to 255 bytes on a char boundary
///
/// Returns `None` when nothing usable remains (empty, `.` or `..`).
pub fn cache_safe_name(name: &str) -> Option<String> {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim();
    let mut take = trimmed.len().min(NAME_MAX);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    let name = trimmed[..take].trim_end();

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

/// Outer last-resort name: `<epochMillis>.bin`.
pub fn fallback_name(now_millis: i64) -> String {
    format!("{now_millis}.bin")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(cache_safe_name("report.pdf").as_deref(), Some("report.pdf"));
        assert_eq!(cache_safe_name("my report.pdf").as_deref(), Some("my report.pdf"));
        assert_eq!(cache_safe_name(".nomedia").as_deref(), Some(".nomedia"));
    }

    #[test]
    fn separators_are_flattened() {
        assert_eq!(cache_safe_name("a/b\\c.txt").as_deref(), Some("a_b_c.txt"));
        assert_eq!(cache_safe_name("../../etc/passwd").as_deref(), Some(".._.._etc_passwd"));
        assert_eq!(cache_safe_name("x//y").as_deref(), Some("x_y"));
    }

    #[test]
    fn control_chars_replaced() {
        assert_eq!(cache_safe_name("file\x00name.txt").as_deref(), Some("file_name.txt"));
        assert_eq!(cache_safe_name("tab\there").as_deref(), Some("tab_here"));
    }

    #[test]
    fn unusable_names_rejected() {
        assert_eq!(cache_safe_name(""), None);
        assert_eq!(cache_safe_name("   "), None);
        assert_eq!(cache_safe_name("."), None);
        assert_eq!(cache_safe_name(" .. "), None);
    }

    #[test]
    fn long_names_truncated_on_char_boundary() {
        let long = "é".repeat(200);
        let out = cache_safe_name(&long).unwrap();
        assert!(out.len() <= 255);
        assert_eq!(out.chars().count(), 127);
    }

    #[test]
    fn fallback_name_shape() {
        assert_eq!(fallback_name(1700000000000), "1700000000000.bin");
    }
}
