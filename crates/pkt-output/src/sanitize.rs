//! File and folder name sanitizing.

/// Longest sanitized name, in characters.
pub const MAX_NAME_LEN: usize = 60;

/// Used when nothing survives sanitizing.
pub const FALLBACK_NAME: &str = "Untitled";

/// Makes `name` safe as a file or folder name on every platform.
///
/// Keeps ASCII letters, digits, `-`, `_` and spaces; everything else becomes
/// `_`. Runs of `_` collapse to one, leading and trailing spaces and
/// underscores are trimmed, and the result is cut to [`MAX_NAME_LEN`].
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        let ch = if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ' ') {
            ch
        } else {
            '_'
        };
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch);
    }

    let trimmed = trim_name(&out);
    // Only ASCII remains, so byte and char counts agree.
    let truncated = trim_name(&trimmed[..trimmed.len().min(MAX_NAME_LEN)]);
    if truncated.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        truncated.to_string()
    }
}

fn trim_name(name: &str) -> &str {
    name.trim_matches(|c| c == ' ' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_filename("Field Trip: Zoo/Aquarium"), "Field Trip_ Zoo_Aquarium");
        assert_eq!(sanitize_filename("  __Ann Lee__ "), "Ann Lee");
        assert_eq!(sanitize_filename("a***b"), "a_b");
        assert_eq!(sanitize_filename("José Núñez"), "Jos_ N_ez");
    }

    #[test]
    fn test_truncate_and_fallback() {
        let long = "x".repeat(80);
        assert_eq!(sanitize_filename(&long).len(), MAX_NAME_LEN);
        assert_eq!(sanitize_filename("///"), FALLBACK_NAME);
        assert_eq!(sanitize_filename(""), FALLBACK_NAME);
    }
}
