use crate::error::{GlanceError, Result};

/// X usernames are at most 15 characters
pub const MAX_HANDLE_LEN: usize = 15;

/// Trim, drop one leading `@`, and lowercase
pub fn normalize_handle(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed);
    trimmed.trim().to_lowercase()
}

/// Normalize and reject anything that can't be an X username
pub fn validate_handle(raw: &str) -> Result<String> {
    let handle = normalize_handle(raw);

    if handle.is_empty() {
        return Err(GlanceError::Validation("Handle is required".to_string()));
    }
    if handle.len() > MAX_HANDLE_LEN
        || !handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(GlanceError::Validation(format!("Invalid handle: {}", raw.trim())));
    }

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_variants_agree() {
        assert_eq!(normalize_handle("@Foo"), "foo");
        assert_eq!(normalize_handle("foo"), "foo");
        assert_eq!(normalize_handle("FOO"), "foo");
        assert_eq!(normalize_handle("  @ Foo "), "foo");
    }

    #[test]
    fn test_only_one_marker_is_stripped() {
        assert_eq!(normalize_handle("@@foo"), "@foo");
        assert!(validate_handle("@@foo").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_handles() {
        assert!(matches!(validate_handle(""), Err(GlanceError::Validation(_))));
        assert!(matches!(validate_handle("  @ "), Err(GlanceError::Validation(_))));
        assert!(validate_handle("has space").is_err());
        assert!(validate_handle("dash-name").is_err());
        assert!(validate_handle("a_really_long_handle").is_err());
    }

    #[test]
    fn test_validate_accepts_usernames() {
        assert_eq!(validate_handle("@Rust_Lang").unwrap(), "rust_lang");
        assert_eq!(validate_handle("abcdefghij12345").unwrap(), "abcdefghij12345");
    }
}
