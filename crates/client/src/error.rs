//! Unified error handling with Sentry integration.
//!
//! Each module owns its error enum; [`ClientError`] gathers them for hosts
//! that want one type. The Sentry helpers attach the signed-in user and a
//! trail of user actions to any error that is later captured. Without an
//! initialised Sentry client they do nothing.

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::LoginError;
use crate::config::ConfigError;

/// Application-level error type for the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Login error: {0}")]
    Login(#[from] LoginError),
}

impl ClientError {
    /// Whether this error is worth reporting to Sentry.
    ///
    /// User mistakes and expected auth states are not.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Api(err) => err.is_server_side(),
            Self::Config(_) => true,
            Self::Login(LoginError::VerificationFailed | LoginError::Serialize(_)) => true,
            Self::Login(LoginError::EmptyToken) => false,
        }
    }

    /// Log the error and capture it to Sentry when reportable.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Client error");
        } else {
            tracing::warn!(error = %self, "Client error");
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Set the Sentry user context from a user ID.
///
/// Called after a successful login to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("compare", "Added property", Some(&[("property_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data.unwrap_or_default() {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
