use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Email value object for a staff account
///
/// # Invariants
/// - Surrounding whitespace is trimmed
/// - Must contain '@' character
/// - Must be at least 3 characters long
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Returns
    /// * `Ok(Email)` - If email is valid
    /// * `Err(String)` - If email is invalid
    ///
    /// # Example
    /// ```
    /// use shop_staff_api::domain::staff::value_objects::Email;
    ///
    /// let email = Email::new(" clerk@shop.test ").expect("valid email");
    /// assert_eq!(email.as_str(), "clerk@shop.test");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, String> {
        let email = email.as_ref().trim();
        if email.contains('@') && email.len() >= 3 {
            Ok(Email(email.to_string()))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a staff id received over the wire.
///
/// An id that is not a UUID cannot name any stored record, so callers treat
/// `None` the same as a lookup miss.
pub fn parse_staff_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email() {
        assert!(Email::new("owner@shop.test").is_ok());
    }

    #[test]
    fn valid_email_minimum_length() {
        assert!(Email::new("a@b").is_ok());
    }

    #[test]
    fn email_is_trimmed() {
        let email = Email::new("  cashier@shop.test\n").unwrap();
        assert_eq!(email.as_str(), "cashier@shop.test");
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("cashier.shop.test").is_err());
    }

    #[test]
    fn invalid_email_too_short() {
        assert!(Email::new(" a@ ").is_err());
    }

    #[test]
    fn email_deserialize_rejects_invalid() {
        let parsed: Result<Email, _> = serde_json::from_str("\"nope\"");
        assert!(parsed.is_err());

        let parsed: Email = serde_json::from_str("\"x@y.z\"").unwrap();
        assert_eq!(format!("{}", parsed), "x@y.z");
    }

    #[test]
    fn staff_id_parsing() {
        let id = Uuid::new_v4();
        assert_eq!(parse_staff_id(&id.to_string()), Some(id));
        assert_eq!(parse_staff_id("507f1f77bcf86cd799439011"), None);
        assert_eq!(parse_staff_id(""), None);
    }
}
