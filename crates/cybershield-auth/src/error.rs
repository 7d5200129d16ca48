//! Error types for the identity resolver.

use thiserror::Error;

use crate::provider::ProviderError;

/// Provider message for rejected credentials.
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

/// Provider message fragment for accounts awaiting email confirmation.
pub const EMAIL_NOT_CONFIRMED: &str = "Email not confirmed";

const CREDENTIALS_REJECTED_TEXT: &str =
    "Invalid email or password. Please verify your credentials.";
const EMAIL_NOT_CONFIRMED_TEXT: &str = "Access Denied: Please check your inbox and confirm your email address before logging in.";
const EMPTY_PROVIDER_TEXT: &str = "Access Denied: Check your clearance level.";

/// Errors surfaced by [`IdentityResolver`](crate::IdentityResolver).
///
/// Absence of a session is never an error, and authorization denials are
/// decisions, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Provider rejected the email/password pair.
    #[error("{0}")]
    CredentialsRejected(ProviderError),

    /// Account exists but its email address is unconfirmed.
    #[error("{0}")]
    EmailNotConfirmed(ProviderError),

    /// Unrecognized sign-in failure, carried verbatim.
    #[error(transparent)]
    Provider(ProviderError),

    /// Provider refused the sign-up (duplicate email, weak password,
    /// network), carried verbatim.
    #[error("{0}")]
    Registration(String),

    /// Sign-up form failed local validation; the provider was not called.
    #[error("{0}")]
    InvalidRegistration(String),

    /// A sign-in or sign-up is already outstanding.
    #[error("another sign-in or sign-up is already in progress")]
    OperationInFlight,

    /// `initialize` was called a second time.
    #[error("identity resolver already initialized")]
    AlreadyInitialized,
}

impl AuthError {
    /// Classifies a sign-in failure. The provider error is kept as is;
    /// operator wording is applied by [`AuthError::user_message`].
    pub fn from_sign_in(err: ProviderError) -> Self {
        if err.message == INVALID_CREDENTIALS {
            AuthError::CredentialsRejected(err)
        } else if err.message.contains(EMAIL_NOT_CONFIRMED) {
            AuthError::EmailNotConfirmed(err)
        } else {
            AuthError::Provider(err)
        }
    }

    /// Text suitable for display next to the form that failed.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::CredentialsRejected(_) => CREDENTIALS_REJECTED_TEXT.to_string(),
            AuthError::EmailNotConfirmed(_) => EMAIL_NOT_CONFIRMED_TEXT.to_string(),
            AuthError::Provider(err) if err.message.trim().is_empty() => {
                EMPTY_PROVIDER_TEXT.to_string()
            }
            AuthError::Registration(message) if message.trim().is_empty() => {
                "Registration request failed.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, AuthError>;
