//! Operator registration requests.

use cybershield_rbac::Role;
use serde_json::Value;

use crate::error::{AuthError, Result};
use crate::provider::SignUp;
use crate::session::SessionMetadata;

/// Registration form as submitted by a prospective operator.
///
/// The chosen department doubles as the operator's role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub department: Role,
    pub mobile: Option<String>,
}

impl RegistrationRequest {
    /// Creates a request whose confirmation matches the password.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        department: Role,
    ) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            email: email.into(),
            confirm_password: password.clone(),
            password,
            department,
            mobile: None,
        }
    }

    pub fn with_confirmation(mut self, confirm_password: impl Into<String>) -> Self {
        self.confirm_password = confirm_password.into();
        self
    }

    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self
    }

    /// Checks the form before anything reaches the provider.
    ///
    /// Password strength is left to the provider.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(AuthError::InvalidRegistration(
                "Operator callsign is required.".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(AuthError::InvalidRegistration(
                "A valid email address is required.".to_string(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::InvalidRegistration(
                "Passphrases do not match.".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the provider payload. Role and department travel as metadata.
    pub fn to_sign_up(&self) -> SignUp {
        let mut metadata = SessionMetadata::default()
            .with_username(self.username.trim())
            .with_role(self.department)
            .with_department(self.department.as_str());

        if let Some(mobile) = &self.mobile {
            metadata
                .extra
                .insert("mobile".to_string(), Value::String(mobile.clone()));
        }

        SignUp {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            metadata,
        }
    }
}
