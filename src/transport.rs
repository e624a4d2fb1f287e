//! Authenticated HTTP transport
//!
//! Every service client sends through one [`ApiTransport`]. It attaches the
//! session's bearer token and, when a call comes back 401, exchanges the
//! refresh token once and replays the request. A failed exchange wipes the
//! session and sends the client to `/login`.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{AppraiseError, Result};
use crate::router::{Navigator, Route};
use crate::session::Session;

pub const REFRESH_PATH: &str = "/token/refresh/";

/// Re-playable description of one API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    retried: bool,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn patch<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        Self::new(Method::PATCH, path).with_body(body)
    }

    fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Opt out of the refresh flow (login and similar calls, where a 401
    /// means bad credentials rather than an expired token)
    pub fn without_refresh(mut self) -> Self {
        self.retried = true;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

/// HTTP transport shared by all service clients
pub struct ApiTransport {
    client: Client,
    base_url: String,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
}

impl ApiTransport {
    pub fn new(
        config: &ClientConfig,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("appraise/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send and decode a JSON response
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(request).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send and ignore the response body
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.execute(request).await?;
        Ok(())
    }

    /// Send with auth and the one-shot refresh retry; non-success statuses
    /// come back as errors.
    pub async fn execute(&self, request: ApiRequest) -> Result<Response> {
        let token = self.session.access_token()?;
        let response = self.dispatch(&request, token.as_ref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !request.retried {
            return self.on_unauthorized(request, response).await;
        }

        Self::check(response).await
    }

    /// Inject the bearer credential when a token is available
    pub fn attach_auth(builder: RequestBuilder, token: Option<&SecretString>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&SecretString>) -> Result<Response> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(Self::attach_auth(builder, token).send().await?)
    }

    async fn on_unauthorized(&self, mut request: ApiRequest, response: Response) -> Result<Response> {
        request.retried = true;
        let original = Self::check(response)
            .await
            .err()
            .unwrap_or_else(|| AppraiseError::Unauthorized("Unauthorized".to_string()));

        let Some(refresh) = self.session.refresh_token()? else {
            warn!("401 on {} with no refresh token; ending session", request.path);
            self.force_logout();
            return Err(original);
        };

        match self.exchange(&refresh).await {
            Ok(access) => {
                self.session.refresh(&access)?;
                info!("Retrying {} {} with refreshed token", request.method, request.path);
                let retried = self.dispatch(&request, Some(&access)).await?;
                Self::check(retried).await
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                self.force_logout();
                Err(e)
            }
        }
    }

    /// `POST /token/refresh/` outside the auth flow
    async fn exchange(&self, refresh: &SecretString) -> Result<SecretString> {
        let url = format!("{}{}", self.base_url, REFRESH_PATH);
        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest {
                refresh: refresh.expose_secret(),
            })
            .send()
            .await?;

        let body: RefreshResponse = Self::check(response).await?.json().await?;
        Ok(SecretString::new(body.access.into()))
    }

    fn force_logout(&self) {
        if let Err(e) = self.session.destroy() {
            warn!("Failed to clear session: {}", e);
        }
        self.navigator.navigate(Route::Login);
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!("Request failed with {}: {}", status, body);
        Err(AppraiseError::from_response_body(status, &body))
    }
}
