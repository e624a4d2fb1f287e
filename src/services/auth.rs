//! Login, logout and current-user calls

use secrecy::ExposeSecret;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::Result;
use crate::transport::{ApiRequest, ApiTransport};
use crate::types::{LoginRequest, LoginResponse, User};

pub struct AuthService {
    transport: Arc<ApiTransport>,
}

impl AuthService {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    /// Exchange credentials for tokens and store them in the session
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = ApiRequest::post(
            "/auth/login/",
            &LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            },
        )?
        .without_refresh();

        let response: LoginResponse = self.transport.send(request).await?;
        self.transport.session().authenticate(&response)?;
        Ok(response)
    }

    /// Blacklist the refresh token (best effort) and always clear the session
    pub async fn logout(&self) -> Result<()> {
        let session = self.transport.session();

        let refresh = session.refresh_token().unwrap_or_else(|e| {
            warn!("Could not read refresh token: {}", e);
            None
        });
        if let Some(refresh) = refresh {
            let body = json!({ "refresh": refresh.expose_secret() });
            let result = match ApiRequest::post("/auth/logout/", &body) {
                Ok(request) => self.transport.send_empty(request.without_refresh()).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                warn!("Logout call failed: {}", e);
            }
        }

        session.destroy()?;
        info!("Logged out");
        Ok(())
    }

    /// Fetch the authenticated user and refresh the cached copy
    pub async fn me(&self) -> Result<User> {
        let user: User = self.transport.send(ApiRequest::get("/auth/me/")).await?;
        self.transport.session().update_user(&user)?;
        Ok(user)
    }

    pub fn stored_user(&self) -> Result<Option<User>> {
        self.transport.session().current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.transport.session().is_authenticated()
    }
}
