//! Sessions as issued by the external auth provider.

use std::collections::BTreeMap;

use cybershield_rbac::Role;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Operator metadata attached to a session.
///
/// The provider hands this over as an open JSON mapping. Known keys are
/// typed; anything else lands in `extra` and is ignored by normalization.
/// Values of the wrong shape (a numeric username, an unknown role tag)
/// read as absent instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_role",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub department: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SessionMetadata {
    /// Reads metadata from a raw provider payload.
    ///
    /// Never fails: a payload that is not an object yields empty metadata.
    pub fn from_json(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().ok(),
        _ => None,
    })
}

/// Session issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Provider-assigned user ID.
    pub user_id: String,

    pub email: Option<String>,

    #[serde(default)]
    pub metadata: SessionMetadata,
}

impl Session {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: Some(email.into()),
            metadata: SessionMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: SessionMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Session change notification.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    UserUpdated(Session),
    /// Explicit sign-out, expiry, or sign-out from another client.
    SignedOut,
}

impl SessionEvent {
    /// Session carried by the event, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionEvent::SignedIn(session)
            | SessionEvent::TokenRefreshed(session)
            | SessionEvent::UserUpdated(session) => Some(session),
            SessionEvent::SignedOut => None,
        }
    }

    /// Short event name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::SignedIn(_) => "signed_in",
            SessionEvent::TokenRefreshed(_) => "token_refreshed",
            SessionEvent::UserUpdated(_) => "user_updated",
            SessionEvent::SignedOut => "signed_out",
        }
    }
}
