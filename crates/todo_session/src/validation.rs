//! Input validation for list names and todo text.
//!
//! Validators are pure: they never touch the session bag. Callers run them
//! before any repository mutation.

use crate::error::ValidationError;
use crate::structs::List;
use std::ops::RangeInclusive;

/// Accepted length, in characters, for list names and todo text.
pub const NAME_LENGTH: RangeInclusive<usize> = 1..=100;

fn has_valid_length(text: &str) -> bool {
    NAME_LENGTH.contains(&text.chars().count())
}

/// Check a (already trimmed) list name against the length bounds and the
/// names of `existing_lists`. Matching is exact and case-sensitive.
pub fn validate_list_name(name: &str, existing_lists: &[List]) -> Result<(), ValidationError> {
    if !has_valid_length(name) {
        return Err(ValidationError::ListNameLength);
    }
    if existing_lists.iter().any(|list| list.name == name) {
        return Err(ValidationError::ListNameTaken);
    }
    Ok(())
}

pub fn validate_todo_text(text: &str) -> Result<(), ValidationError> {
    if has_valid_length(text) {
        Ok(())
    } else {
        Err(ValidationError::TodoTextLength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_name_length_bounds() {
        let lists = Vec::new();
        assert_eq!(
            validate_list_name("", &lists),
            Err(ValidationError::ListNameLength)
        );
        assert_eq!(
            validate_list_name(&"a".repeat(101), &lists),
            Err(ValidationError::ListNameLength)
        );
        assert!(validate_list_name("a", &lists).is_ok());
        assert!(validate_list_name(&"a".repeat(100), &lists).is_ok());
    }

    #[test]
    fn test_list_name_length_counts_chars() {
        // 100 two-byte characters is still 100 characters
        assert!(validate_list_name(&"é".repeat(100), &[]).is_ok());
    }

    #[test]
    fn test_list_name_must_be_unique() {
        let lists = vec![List::new(1, "Work")];
        assert_eq!(
            validate_list_name("Work", &lists),
            Err(ValidationError::ListNameTaken)
        );
        assert!(validate_list_name("work", &lists).is_ok());
    }

    #[test]
    fn test_length_is_checked_before_uniqueness() {
        let lists = vec![List::new(1, "")];
        assert_eq!(
            validate_list_name("", &lists),
            Err(ValidationError::ListNameLength)
        );
    }

    #[test]
    fn test_todo_text_bounds() {
        assert_eq!(validate_todo_text(""), Err(ValidationError::TodoTextLength));
        assert_eq!(
            validate_todo_text(&"x".repeat(101)),
            Err(ValidationError::TodoTextLength)
        );
        assert!(validate_todo_text("x").is_ok());
        assert!(validate_todo_text(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::ListNameLength.to_string(),
            "List name must be between 1 and 100 characters."
        );
        assert_eq!(
            ValidationError::ListNameTaken.to_string(),
            "List name must be unique."
        );
        assert_eq!(
            ValidationError::TodoTextLength.to_string(),
            "Todo must be between 1 and 100 characters."
        );
    }
}
