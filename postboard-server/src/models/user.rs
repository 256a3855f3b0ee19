//! User input validation

use super::ValidationError;

/// Maximum length for email addresses (RFC 5321 path limit)
const MAX_EMAIL_LEN: usize = 254;

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Create a new email, trimming surrounding whitespace.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 254 characters
    ///
    /// Uniqueness is enforced by the store, not here.
    ///
    /// # Example
    /// ```
    /// use postboard_server::models::Email;
    ///
    /// assert!(Email::new("a@x.com").is_ok());
    /// assert!(Email::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "Email" });
        }

        if trimmed.chars().count() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "Email",
                max: MAX_EMAIL_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Validate an email that the request may have omitted entirely.
    pub fn required(s: Option<&str>) -> Result<Self, ValidationError> {
        Self::new(s.unwrap_or_default())
    }

    /// Get the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fields for a user about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: Email,
    pub name: Option<String>,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<Email>,
    pub name: Option<String>,
}
