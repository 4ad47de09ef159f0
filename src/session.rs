use crate::errors::PortalError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "portal_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminSession {
    #[default]
    LoggedOut,
    LoggedIn,
}

impl AdminSession {
    /// Exact comparison against the configured secret. A wrong password
    /// leaves the caller holding its current state.
    pub fn login(self, secret: &str, supplied: &str) -> Result<AdminSession, PortalError> {
        if supplied == secret {
            Ok(AdminSession::LoggedIn)
        } else {
            Err(PortalError::Auth)
        }
    }

    pub fn logout(self) -> AdminSession {
        AdminSession::LoggedOut
    }

    pub fn is_logged_in(self) -> bool {
        self == AdminSession::LoggedIn
    }
}

/// Admin sessions keyed by the opaque token stored in the session cookie.
/// Tokens never expire; they live until logout or process exit.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, AdminSession>>>,
}

impl SessionRegistry {
    pub async fn get(&self, token: Option<&str>) -> AdminSession {
        match token {
            Some(token) => self
                .sessions
                .read()
                .await
                .get(token)
                .copied()
                .unwrap_or_default(),
            None => AdminSession::LoggedOut,
        }
    }

    /// Runs the login transition and, on success, returns a fresh token.
    pub async fn login(&self, secret: &str, supplied: &str) -> Result<String, PortalError> {
        let session = AdminSession::LoggedOut.login(secret, supplied)?;
        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone(), session);
        Ok(token)
    }

    pub async fn logout(&self, token: Option<&str>) -> AdminSession {
        if let Some(token) = token {
            if let Some(session) = self.sessions.write().await.remove(token) {
                return session.logout();
            }
        }
        AdminSession::LoggedOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_logs_in() {
        let state = AdminSession::default();
        assert_eq!(state, AdminSession::LoggedOut);
        assert_eq!(state.login("admin123", "admin123"), Ok(AdminSession::LoggedIn));
    }

    #[test]
    fn wrong_password_is_auth_error() {
        for attempt in ["", "admin", "Admin123", "admin123 "] {
            assert_eq!(
                AdminSession::LoggedOut.login("admin123", attempt),
                Err(PortalError::Auth)
            );
        }
    }

    #[test]
    fn logout_returns_to_logged_out() {
        assert_eq!(AdminSession::LoggedIn.logout(), AdminSession::LoggedOut);
        assert_eq!(AdminSession::LoggedOut.logout(), AdminSession::LoggedOut);
    }

    #[tokio::test]
    async fn registry_tracks_tokens() {
        let registry = SessionRegistry::default();
        assert!(registry.login("pw", "nope").await.is_err());

        let token = registry.login("pw", "pw").await.unwrap();
        assert!(registry.get(Some(&token)).await.is_logged_in());
        assert!(!registry.get(Some("forged")).await.is_logged_in());
        assert!(!registry.get(None).await.is_logged_in());

        assert_eq!(registry.logout(Some(&token)).await, AdminSession::LoggedOut);
        assert!(!registry.get(Some(&token)).await.is_logged_in());
    }
}
