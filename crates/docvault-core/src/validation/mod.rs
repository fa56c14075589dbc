//! Input validation
//!
//! Checks that run before any network call. Failures are `AppError::Validation`.

use crate::error::AppError;

/// Trim a display name and reject it if nothing is left.
pub fn validate_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("File name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Require a non-blank value for the named field, returning it trimmed.
pub fn require_non_empty(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Blank descriptions are stored as null.
pub fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// Split a comma-separated tag list, trimming entries and dropping empty ones.
pub fn parse_tags(input: &str) -> Vec<String> {
    normalize_tags(input.split(','))
}

/// Trim tags and drop empty ones, keeping display order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  report.pdf ").unwrap(), "report.pdf");
    }

    #[test]
    fn test_validate_name_rejects_blank() {
        assert!(matches!(validate_name(""), Err(AppError::Validation(_))));
        assert!(matches!(validate_name(" \t "), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_require_non_empty_names_field() {
        let err = require_non_empty("Email", "  ").unwrap_err();
        assert!(err.to_string().contains("Email is required"));
        assert_eq!(require_non_empty("Email", " a@b.c ").unwrap(), "a@b.c");
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description(None), None);
        assert_eq!(normalize_description(Some("   ")), None);
        assert_eq!(
            normalize_description(Some(" quarterly numbers ")),
            Some("quarterly numbers".to_string())
        );
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("finance, 2024 ,, q1 ,"), vec!["finance", "2024", "q1"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_normalize_tags_keeps_order() {
        let tags = normalize_tags(vec!["  b", "a ", ""]);
        assert_eq!(tags, vec!["b", "a"]);
    }
}
