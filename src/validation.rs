use crate::error::{FeedbackError, Result};
use crate::models::NewFeedback;

/// Valid rating range, inclusive
pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

const MAX_NAME_LEN: usize = 100;
const MAX_COMMENT_LEN: usize = 10_000;
const MAX_EMAIL_LEN: usize = 254;
const MAX_ADDRESS_LEN: usize = 500;

/// Validation utilities for submission input and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a full submission before any classification work.
    ///
    /// Required fields are checked in a fixed order: guest name, outlet
    /// reference, comment text, phone, email, rating. The first failure is
    /// returned; nothing external is called for an incomplete submission.
    pub fn validate_submission(feedback: &NewFeedback) -> Result<()> {
        Self::validate_guest_name(&feedback.guest_name)?;
        Self::validate_outlet_id(&feedback.outlet_id)?;
        Self::validate_comment_text(&feedback.comment_text)?;
        Self::validate_phone(&feedback.phone)?;
        Self::validate_email(&feedback.email)?;
        Self::validate_rating(feedback.rating)?;

        if let Some(address) = &feedback.address {
            Self::validate_address(address)?;
        }

        Ok(())
    }

    /// Validate guest name
    pub fn validate_guest_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(invalid("guest name is required"));
        }

        if name.len() > MAX_NAME_LEN {
            return Err(invalid("guest name too long (max 100 characters)"));
        }

        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(invalid("guest name contains invalid characters"));
        }

        Ok(())
    }

    /// Validate the outlet reference.
    ///
    /// The reference is opaque; only presence is checked here, existence is
    /// the taxonomy administration's concern.
    pub fn validate_outlet_id(outlet_id: &str) -> Result<()> {
        if outlet_id.trim().is_empty() {
            return Err(invalid("outlet reference is required"));
        }

        Ok(())
    }

    /// Validate comment text
    pub fn validate_comment_text(comment_text: &str) -> Result<()> {
        if comment_text.trim().is_empty() {
            return Err(invalid("comment text is required"));
        }

        if comment_text.len() > MAX_COMMENT_LEN {
            return Err(invalid("comment text too long (max 10000 characters)"));
        }

        Ok(())
    }

    /// Validate phone number format
    pub fn validate_phone(phone: &str) -> Result<()> {
        let trimmed = phone.trim();
        if trimmed.is_empty() {
            return Err(invalid("phone number is required"));
        }

        // Digits plus common formatting characters only
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
        {
            return Err(invalid("phone number contains invalid characters"));
        }

        if trimmed.rfind('+').is_some_and(|position| position != 0) {
            return Err(invalid("phone number may only start with +"));
        }

        let digits = trimmed.chars().filter(char::is_ascii_digit).count();
        if !(7..=15).contains(&digits) {
            return Err(invalid("phone number must be between 7 and 15 digits"));
        }

        Ok(())
    }

    /// Validate email format
    pub fn validate_email(email: &str) -> Result<()> {
        if email.trim().is_empty() {
            return Err(invalid("email is required"));
        }

        if email.len() > MAX_EMAIL_LEN {
            return Err(invalid("email too long (max 254 characters)"));
        }

        let Some((local_part, domain_part)) = email.split_once('@') else {
            return Err(invalid("email must contain @ symbol"));
        };

        if domain_part.contains('@') {
            return Err(invalid("email must have exactly one @ symbol"));
        }

        if local_part.is_empty() || local_part.len() > 64 {
            return Err(invalid("email local part invalid"));
        }

        if domain_part.is_empty() || !domain_part.contains('.') {
            return Err(invalid("email domain invalid"));
        }

        Ok(())
    }

    /// Validate the star rating
    pub fn validate_rating(rating: Option<i32>) -> Result<()> {
        match rating {
            None => Err(invalid("rating is required")),
            Some(value) if !RATING_RANGE.contains(&value) => {
                Err(invalid("rating must be between 1 and 5"))
            }
            Some(_) => Ok(()),
        }
    }

    /// Validate the optional postal address
    pub fn validate_address(address: &str) -> Result<()> {
        if address.len() > MAX_ADDRESS_LEN {
            return Err(invalid("address too long (max 500 characters)"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> FeedbackError {
    FeedbackError::Validation(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> NewFeedback {
        NewFeedback {
            guest_name: "Maria Santos".to_string(),
            outlet_id: "outlet-01".to_string(),
            rating: Some(4),
            comment_text: "Lovely breakfast spread".to_string(),
            phone: "+6581234567".to_string(),
            email: "maria@example.com".to_string(),
            address: None,
        }
    }

    #[test]
    fn test_valid_submission_passes() {
        assert!(InputValidator::validate_submission(&submission()).is_ok());
    }

    #[test]
    fn test_missing_email_is_validation_error() {
        let mut feedback = submission();
        feedback.email = String::new();
        let error = InputValidator::validate_submission(&feedback)
            .expect_err("missing email must be rejected");
        assert!(error.is_validation());
    }

    #[test]
    fn test_missing_rating_is_rejected() {
        let mut feedback = submission();
        feedback.rating = None;
        assert!(InputValidator::validate_submission(&feedback).is_err());
    }

    #[test]
    fn test_out_of_range_rating_is_rejected() {
        assert!(InputValidator::validate_rating(Some(0)).is_err());
        assert!(InputValidator::validate_rating(Some(6)).is_err());
        assert!(InputValidator::validate_rating(Some(1)).is_ok());
        assert!(InputValidator::validate_rating(Some(5)).is_ok());
    }

    #[test]
    fn test_phone_rejects_letters() {
        assert!(InputValidator::validate_phone("+1234567890abc").is_err());
    }

    #[test]
    fn test_phone_accepts_formatting() {
        assert!(InputValidator::validate_phone("+1 (555) 123-4567").is_ok());
    }

    #[test]
    fn test_email_needs_single_at_and_domain_dot() {
        assert!(InputValidator::validate_email("plainaddress").is_err());
        assert!(InputValidator::validate_email("a@b@c.com").is_err());
        assert!(InputValidator::validate_email("user@nodot").is_err());
        assert!(InputValidator::validate_email("user@mail.example.com").is_ok());
    }
}
