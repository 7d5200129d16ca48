//! Application-level operator identity derived from a session.

use chrono::{DateTime, Utc};
use cybershield_rbac::Role;
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Username used when neither metadata nor email yields one.
pub const FALLBACK_USERNAME: &str = "operator";

/// The operator currently driving the console.
///
/// Replaced wholesale on every session change; never edited field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Provider-assigned user ID.
    pub id: String,
    /// Display label.
    pub username: String,
    /// Empty when the session carries no email.
    pub email: String,
    pub role: Role,
    /// Always `true` for a live session; the provider exposes no
    /// deactivation signal.
    pub is_active: bool,
    /// Normalization time, not the provider's last sign-in.
    pub last_login: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Defaults applied while normalizing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub default_role: Role,
    pub fallback_username: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            default_role: Role::DEFAULT,
            fallback_username: FALLBACK_USERNAME.to_string(),
        }
    }
}

/// Maps a session to an identity, stamping `last_login` with the current time.
///
/// Username resolution: metadata `username`, else the email local part,
/// else `options.fallback_username`. Role resolution: metadata `role`,
/// else `options.default_role`. Empty strings count as absent.
pub fn normalize(session: &Session, options: &NormalizeOptions) -> Identity {
    normalize_at(session, options, Utc::now())
}

/// [`normalize`] with an explicit clock reading.
pub fn normalize_at(session: &Session, options: &NormalizeOptions, now: DateTime<Utc>) -> Identity {
    let email = session.email.clone().unwrap_or_default();

    let username = non_empty(session.metadata.username.as_deref())
        .or_else(|| non_empty(email.split('@').next()))
        .unwrap_or(&options.fallback_username)
        .to_string();

    Identity {
        id: session.user_id.clone(),
        username,
        email,
        role: session.metadata.role.unwrap_or(options.default_role),
        is_active: true,
        last_login: now,
        department: session.metadata.department.clone(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionMetadata;
    use proptest::prelude::*;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_metadata_username_wins() {
        let session = Session::new("u-1", "alice@x.com")
            .with_metadata(SessionMetadata::default().with_username("ace"));
        let identity = normalize_at(&session, &NormalizeOptions::default(), fixed_now());
        assert_eq!(identity.username, "ace");
    }

    #[test]
    fn test_email_local_part_fallback() {
        let session = Session::new("u-1", "alice@x.com");
        let identity = normalize_at(&session, &NormalizeOptions::default(), fixed_now());
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.email, "alice@x.com");
    }

    #[test]
    fn test_fixed_fallback_username() {
        let session = Session {
            user_id: "u-2".to_string(),
            email: None,
            metadata: SessionMetadata::default(),
        };
        let identity = normalize_at(&session, &NormalizeOptions::default(), fixed_now());
        assert_eq!(identity.username, FALLBACK_USERNAME);
        assert_eq!(identity.email, "");
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let session = Session::new("u-3", "@x.com")
            .with_metadata(SessionMetadata::default().with_username(""));
        let identity = normalize_at(&session, &NormalizeOptions::default(), fixed_now());
        assert_eq!(identity.username, FALLBACK_USERNAME);
    }

    #[test]
    fn test_default_role_and_custom_options() {
        let options = NormalizeOptions {
            default_role: Role::Int,
            fallback_username: "analyst".to_string(),
        };
        let session = Session {
            user_id: "u-4".to_string(),
            email: None,
            metadata: SessionMetadata::default(),
        };
        let identity = normalize_at(&session, &options, fixed_now());
        assert_eq!(identity.role, Role::Int);
        assert_eq!(identity.username, "analyst");
    }

    #[test]
    fn test_identity_shape() {
        let session = Session::new("u-5", "root@ops.io").with_metadata(SessionMetadata::from_json(
            json!({ "username": "root", "role": "SYS", "department": "SYS" }),
        ));
        let identity = normalize_at(&session, &NormalizeOptions::default(), fixed_now());

        assert_eq!(
            identity,
            Identity {
                id: "u-5".to_string(),
                username: "root".to_string(),
                email: "root@ops.io".to_string(),
                role: Role::Sys,
                is_active: true,
                last_login: fixed_now(),
                department: Some("SYS".to_string()),
            }
        );
    }

    #[test]
    fn test_identity_serializes_camel_case() {
        let session = Session::new("u-6", "kim@ops.io");
        let identity = normalize_at(&session, &NormalizeOptions::default(), fixed_now());
        let value = serde_json::to_value(&identity).unwrap();

        assert_eq!(value["isActive"], json!(true));
        assert_eq!(value["role"], json!("SOC"));
        assert!(value.get("lastLogin").is_some());
        assert!(value.get("department").is_none());
    }

    #[test]
    fn test_whitespace_username_is_kept() {
        let session = Session::new("u-1", "alice@x.com")
            .with_metadata(SessionMetadata::default().with_username(" "));
        let identity = normalize_at(&session, &NormalizeOptions::default(), fixed_now());
        assert_eq!(identity.username, " ");
    }

    #[test]
    fn test_empty_username_falls_back_to_email() {
        let session = Session::new("u-1", "alice@x.com")
            .with_metadata(SessionMetadata::default().with_username(""));
        let identity = normalize_at(&session, &NormalizeOptions::default(), fixed_now());
        assert_eq!(identity.username, "alice");
    }

    proptest! {
        #[test]
        fn username_metadata_always_wins(username in ".+", local in "[a-z]{1,10}") {
            let session = Session::new("u", format!("{local}@x.com"))
                .with_metadata(SessionMetadata::default().with_username(username.clone()));
            prop_assert_eq!(normalize(&session, &NormalizeOptions::default()).username, username);
        }

        #[test]
        fn email_local_part_without_metadata(local in "[a-z][a-z0-9.]{0,15}", domain in "[a-z]{1,10}\\.[a-z]{2,3}") {
            let session = Session::new("u", format!("{local}@{domain}"));
            prop_assert_eq!(normalize(&session, &NormalizeOptions::default()).username, local);
        }

        #[test]
        fn missing_role_gets_default(local in "[a-z]{1,10}") {
            let session = Session::new("u", format!("{local}@x.com"));
            let identity = normalize(&session, &NormalizeOptions::default());
            prop_assert_eq!(identity.role, Role::DEFAULT);
            prop_assert!(identity.is_active);
        }
    }
}
