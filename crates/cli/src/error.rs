//! CLI error type.

use cohort_client::ClientError;
use cohort_client::api::ApiError;
use cohort_client::auth::LoginError;
use cohort_client::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Log the error, capturing client errors to Sentry where reportable.
    pub fn report(&self) {
        match self {
            Self::Client(err) => err.report(),
            Self::Output(err) => tracing::error!(error = %err, "Command failed"),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Client(err.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Client(err.into())
    }
}

impl From<LoginError> for CliError {
    fn from(err: LoginError) -> Self {
        Self::Client(err.into())
    }
}
