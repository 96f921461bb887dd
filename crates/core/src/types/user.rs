//! Session user record and auth token.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::UserId;

/// The signed-in user as returned by the login endpoint.
///
/// Fields the client does not model are kept in `extra` and written back
/// untouched, so a stored record survives a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub phone_number: String,
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Create a user with the required identity fields.
    #[must_use]
    pub fn new(
        id: impl Into<UserId>,
        phone_number: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            phone_number: phone_number.into(),
            country_code: country_code.into(),
            name: None,
            email: None,
            image: None,
            extra: Map::new(),
        }
    }

    /// Phone number with its country code, e.g. `+91 9998887777`.
    #[must_use]
    pub fn international_phone(&self) -> String {
        let code = self.country_code.trim_start_matches('+');
        format!("+{code} {}", self.phone_number)
    }

    /// Name for greetings, falling back to the phone number.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.phone_number)
    }
}

/// Errors that can occur when parsing an [`AuthToken`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthTokenError {
    /// The token is empty or whitespace only.
    #[error("auth token cannot be empty")]
    Blank,
}

/// Opaque bearer credential issued by the API.
///
/// `Debug` never prints the token value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Parse a token, rejecting blank input.
    ///
    /// The value is kept exactly as given; surrounding whitespace is not
    /// stripped because the server compares tokens byte for byte.
    ///
    /// # Errors
    ///
    /// Returns [`AuthTokenError::Blank`] if the input has no non-whitespace
    /// characters.
    pub fn parse(token: impl Into<String>) -> Result<Self, AuthTokenError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AuthTokenError::Blank);
        }
        Ok(Self(token))
    }

    /// The raw token, for `Authorization` headers and storage.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_keeps_unknown_fields() {
        let raw = r#"{"id":"u1","phoneNumber":"555","countryCode":"1","referralCode":"XY12","kycDone":true}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.extra.get("referralCode"), Some(&Value::from("XY12")));

        let written: Value = serde_json::to_value(&user).unwrap();
        let original: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(written, original);
    }

    #[test]
    fn test_user_requires_phone_and_country_code() {
        assert!(serde_json::from_str::<User>(r#"{"id":"u1"}"#).is_err());
    }

    #[test]
    fn test_international_phone() {
        let mut user = User::new("1", "9998887777", "+91");
        assert_eq!(user.international_phone(), "+91 9998887777");
        user.country_code = "91".to_string();
        assert_eq!(user.international_phone(), "+91 9998887777");
    }

    #[test]
    fn test_display_name_fallback() {
        let mut user = User::new("1", "9998887777", "91");
        assert_eq!(user.display_name(), "9998887777");
        user.name = Some("  ".to_string());
        assert_eq!(user.display_name(), "9998887777");
        user.name = Some("Asha".to_string());
        assert_eq!(user.display_name(), "Asha");
    }

    #[test]
    fn test_token_rejects_blank() {
        assert_eq!(AuthToken::parse(""), Err(AuthTokenError::Blank));
        assert_eq!(AuthToken::parse(" \t\n"), Err(AuthTokenError::Blank));
        assert_eq!(AuthToken::parse("tok123").unwrap().expose(), "tok123");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::parse("super-secret").unwrap();
        assert!(!format!("{token:?}").contains("super-secret"));
    }
}
