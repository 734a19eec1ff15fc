//! Local content checks, run before anything is sent to the store.

use crate::error::{Result, ValidationError};

/// Reject content that is empty once surrounding whitespace is removed.
///
/// The content itself is stored as typed; trimming only decides validity.
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_empty_and_blank() {
        assert_eq!(validate_content(""), Err(ValidationError::EmptyContent));
        assert_eq!(validate_content("   "), Err(ValidationError::EmptyContent));
        assert_eq!(validate_content("\n\t "), Err(ValidationError::EmptyContent));
    }

    #[test]
    fn test_accepts_text() {
        assert!(validate_content("hi").is_ok());
        assert!(validate_content("  padded  ").is_ok());
    }

    proptest! {
        #[test]
        fn test_whitespace_only_is_rejected(ws in "[ \t\r\n]{0,16}") {
            prop_assert_eq!(validate_content(&ws), Err(ValidationError::EmptyContent));
        }

        #[test]
        fn test_any_visible_char_is_accepted(
            pre in "[ \t]{0,4}",
            body in "[a-zA-Z0-9!?.]{1,32}",
            post in "[ \t]{0,4}",
        ) {
            let content = format!("{pre}{body}{post}");
            prop_assert!(validate_content(&content).is_ok());
        }
    }
}
