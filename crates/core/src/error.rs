//! Errors raised by domain rules.
//!
//! Both variants describe bad user input, and their `Display` text is meant
//! to be shown back to the user in a flash message.

use crate::booking::INVALID_DATES_MESSAGE;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A submitted field broke a rule; the message names the field.
    #[error("{0}")]
    Validation(String),

    /// A stay's dates did not parse, or check-out is not after check-in.
    #[error("{}", INVALID_DATES_MESSAGE)]
    InvalidDates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_user_facing_message() {
        assert_eq!(
            CoreError::Validation("Title is required".into()).to_string(),
            "Title is required"
        );
        assert_eq!(CoreError::InvalidDates.to_string(), "Invalid dates");
    }
}
