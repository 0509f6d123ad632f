//! Signed-in user context.
//!
//! Populated when a session starts, cleared on logout, and handed to the
//! components that need it rather than read from ambient globals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const SESSION_STORAGE_KEY: &str = "legalflow.session.user";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "photoURL")]
    pub photo_url: Option<String>,
}

impl SessionUser {
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage unavailable: {0}")]
    Storage(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionContext {
    user: Option<SessionUser>,
}

impl SessionContext {
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn begin(&mut self, user: SessionUser) {
        tracing::info!(user = %user.name, "session started");
        self.user = Some(user);
    }

    pub fn end(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(user = %user.name, "session ended");
        }
    }

    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|user| user.name.as_str())
            .unwrap_or("User")
    }

    pub fn display_role(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|user| user.role.as_deref())
            .unwrap_or("Role")
    }

    pub fn initials(&self) -> String {
        self.user
            .as_ref()
            .map(SessionUser::initials)
            .unwrap_or_default()
    }
}

#[cfg(target_arch = "wasm32")]
pub fn restore_user() -> Option<SessionUser> {
    LocalStorage::get(SESSION_STORAGE_KEY).ok()
}

#[cfg(target_arch = "wasm32")]
pub fn persist_user(user: &SessionUser) -> Result<(), SessionError> {
    LocalStorage::set(SESSION_STORAGE_KEY, user)
        .map_err(|err| SessionError::Storage(err.to_string()))
}

#[cfg(target_arch = "wasm32")]
pub fn forget_user() {
    LocalStorage::delete(SESSION_STORAGE_KEY);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn restore_user() -> Option<SessionUser> {
    Some(crate::fixtures::staff::sample_session_user())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn persist_user(_user: &SessionUser) -> Result<(), SessionError> {
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn forget_user() {}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            name: "Jordan  Lee Avery".into(),
            role: None,
            photo_url: None,
        }
    }

    #[test]
    fn initials_take_first_letter_of_each_name_part() {
        assert_eq!(user().initials(), "JLA");
    }

    #[test]
    fn lifecycle_begin_then_end() {
        let mut session = SessionContext::default();
        assert_eq!(session.display_name(), "User");
        assert_eq!(session.display_role(), "Role");

        session.begin(user());
        assert!(session.is_signed_in());
        assert_eq!(session.display_name(), "Jordan  Lee Avery");
        assert_eq!(session.display_role(), "Role");

        session.end();
        assert!(!session.is_signed_in());
        assert_eq!(session.initials(), "");
    }

    #[test]
    fn accepts_photo_url_alias_from_auth_payload() {
        let user: SessionUser =
            serde_json::from_str(r#"{"name":"Kim","photoURL":"/kim.png"}"#).unwrap();
        assert_eq!(user.photo_url.as_deref(), Some("/kim.png"));
    }
}
