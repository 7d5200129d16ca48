//! Error types for the console facade.

use cybershield_auth::AuthError;
use cybershield_config::ConfigError;
use thiserror::Error;

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Errors surfaced by [`crate::Console`].
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The configuration cannot be turned into a console.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A sign-in, sign-up or lifecycle call failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ConsoleError {
    /// Text suitable for showing to the operator.
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.to_string(),
            Self::Auth(err) => err.user_message(),
        }
    }
}
