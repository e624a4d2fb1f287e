use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::store::SessionStore;
use crate::error::Result;
use crate::types::{LoginResponse, User};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// Every key a session writes; cleared together
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

/// Coarse session state derived from storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Explicit session context shared by the transport and all service clients
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    /// Bind a session to its backing store. Any tokens already in the store
    /// (from an earlier run) are picked up as-is.
    pub fn create(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Persist tokens and user from a successful login
    pub fn authenticate(&self, login: &LoginResponse) -> Result<()> {
        let user = serde_json::to_string(&login.user)?;
        self.store.set_many(&[
            (ACCESS_TOKEN_KEY, login.access.as_str()),
            (REFRESH_TOKEN_KEY, login.refresh.as_str()),
            (USER_KEY, user.as_str()),
        ])?;
        info!("Session authenticated as {}", login.user.username);
        Ok(())
    }

    /// Replace the access token after a refresh exchange
    pub fn refresh(&self, access: &SecretString) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, access.expose_secret())?;
        debug!("Access token refreshed");
        Ok(())
    }

    /// Clear tokens and user in one step
    pub fn destroy(&self) -> Result<()> {
        self.store.remove_many(&SESSION_KEYS)?;
        info!("Session cleared");
        Ok(())
    }

    pub fn access_token(&self) -> Result<Option<SecretString>> {
        self.secret(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<SecretString>> {
        self.secret(REFRESH_TOKEN_KEY)
    }

    fn secret(&self, key: &str) -> Result<Option<SecretString>> {
        Ok(self
            .store
            .get(key)?
            .filter(|v| !v.is_empty())
            .map(|v| SecretString::new(v.into())))
    }

    /// Cached user; a corrupt entry reads as absent
    pub fn current_user(&self) -> Result<Option<User>> {
        let Some(raw) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Ignoring unreadable cached user: {}", e);
                Ok(None)
            }
        }
    }

    /// Replace the cached user (after `/auth/me/`)
    pub fn update_user(&self, user: &User) -> Result<()> {
        self.store.set(USER_KEY, &serde_json::to_string(user)?)
    }

    /// Authenticated means an access token is present
    pub fn is_authenticated(&self) -> bool {
        matches!(self.access_token(), Ok(Some(_)))
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }
}
