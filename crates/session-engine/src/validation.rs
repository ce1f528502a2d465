//! Client-side form validation for the account pages.
//!
//! Validation failures block submission locally; nothing here ever reaches
//! the network.

use thiserror::Error;

/// Minimum identifier length.
pub const MIN_USER_ID_LEN: usize = 3;

/// Identifiers that are never available for registration.
const RESERVED_USER_IDS: &[&str] = &["admin", "administrator", "root", "system", "hili"];

/// Client-side validation failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("identifier must be at least 3 characters")]
    IdentifierTooShort,

    #[error("identifier may only contain letters and digits")]
    IdentifierCharset,

    #[error("enter a valid email address")]
    EmailShape,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("verify your email address first")]
    EmailNotVerified,
}

/// Check an identifier for length and charset.
pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    if user_id.chars().count() < MIN_USER_ID_LEN {
        return Err(ValidationError::IdentifierTooShort);
    }
    if !user_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::IdentifierCharset);
    }
    Ok(())
}

/// Basic email shape check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let (local, domain) = email.split_once('@').ok_or(ValidationError::EmailShape)?;
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.contains(char::is_whitespace)
        || email.matches('@').count() != 1
    {
        return Err(ValidationError::EmailShape);
    }
    Ok(())
}

/// Local availability check for an identifier.
///
/// `None` means the check cannot run yet (the identifier fails basic
/// validation, so the action stays disabled); `Some(false)` means locally
/// known unavailable. True uniqueness is enforced by the registration
/// endpoint; this only catches reserved names early.
pub fn user_id_available(user_id: &str) -> Option<bool> {
    validate_user_id(user_id).ok()?;
    Some(!RESERVED_USER_IDS.contains(&user_id.to_ascii_lowercase().as_str()))
}

/// Draft of the registration form, checked before submission.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationDraft<'a> {
    pub user_id: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
    pub email: &'a str,
    pub email_verified: bool,
}

/// Gate the registration submit. The first failing check wins.
pub fn validate_registration(draft: &RegistrationDraft<'_>) -> Result<(), ValidationError> {
    validate_user_id(draft.user_id)?;
    validate_email(draft.email)?;
    if draft.password != draft.password_confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if !draft.email_verified {
        return Err(ValidationError::EmailNotVerified);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_identifier_rejected() {
        assert_eq!(
            validate_user_id("ab"),
            Err(ValidationError::IdentifierTooShort)
        );
        assert!(validate_user_id("abc").is_ok());
    }

    #[test]
    fn test_identifier_charset() {
        assert_eq!(
            validate_user_id("al-ice"),
            Err(ValidationError::IdentifierCharset)
        );
        assert_eq!(
            validate_user_id("alice!"),
            Err(ValidationError::IdentifierCharset)
        );
        assert!(validate_user_id("alice99").is_ok());
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("user@example.com").is_ok());
        assert_eq!(validate_email("user"), Err(ValidationError::EmailShape));
        assert_eq!(validate_email("user@"), Err(ValidationError::EmailShape));
        assert_eq!(
            validate_email("user@example"),
            Err(ValidationError::EmailShape)
        );
        assert_eq!(
            validate_email("user@.example.com"),
            Err(ValidationError::EmailShape)
        );
        assert_eq!(
            validate_email("us er@example.com"),
            Err(ValidationError::EmailShape)
        );
        assert_eq!(
            validate_email("user@@example.com"),
            Err(ValidationError::EmailShape)
        );
    }

    #[test]
    fn test_availability_check_disabled_below_minimum() {
        assert_eq!(user_id_available("ab"), None);
        assert_eq!(user_id_available("a!"), None);
    }

    #[test]
    fn test_reserved_identifiers_unavailable() {
        assert_eq!(user_id_available("admin"), Some(false));
        assert_eq!(user_id_available("Admin"), Some(false));
        assert_eq!(user_id_available("root"), Some(false));
        assert_eq!(user_id_available("alice"), Some(true));
    }

    #[test]
    fn test_registration_gates() {
        let base = RegistrationDraft {
            user_id: "alice",
            password: "secret",
            password_confirm: "secret",
            email: "alice@example.com",
            email_verified: true,
        };
        assert!(validate_registration(&base).is_ok());

        assert_eq!(
            validate_registration(&RegistrationDraft {
                user_id: "ab",
                ..base
            }),
            Err(ValidationError::IdentifierTooShort)
        );
        assert_eq!(
            validate_registration(&RegistrationDraft {
                email: "nope",
                ..base
            }),
            Err(ValidationError::EmailShape)
        );
        assert_eq!(
            validate_registration(&RegistrationDraft {
                password_confirm: "other",
                ..base
            }),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_registration(&RegistrationDraft {
                email_verified: false,
                ..base
            }),
            Err(ValidationError::EmailNotVerified)
        );
    }
}
