//! Shared helper functions for CLI commands
//!
//! Builds the client stack (config, persisted session, navigator, API
//! client) and applies the route guard before a command touches the API.

use appraise_core::{
    error::{AppraiseError, Result},
    router::{self, History, Navigator, Route},
    session::{FileSessionStore, Session},
    ApiClient, ClientConfig,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs to talk to the backend
pub struct Context {
    pub config: ClientConfig,
    pub client: ApiClient,
    pub history: Arc<History>,
}

impl Context {
    /// Resolve configuration and open the persisted session
    pub fn build(config_file: Option<&Path>, api_url: Option<&str>) -> Result<Self> {
        let config = load_config(config_file, api_url)?;
        let session_dir = config.session_dir()?;
        let store = FileSessionStore::new(&session_dir)?;

        let session = Arc::new(Session::create(Arc::new(store)));
        let history = Arc::new(History::default());
        let navigator: Arc<dyn Navigator> = history.clone();
        let client = ApiClient::new(&config, session, navigator)?;
        debug!("Using API at {}", config.api_url);

        Ok(Self {
            config,
            client,
            history,
        })
    }

    /// Enter `route` through the authentication guard.
    ///
    /// Fails with `NotAuthenticated` when the guard redirects to login.
    pub fn enter(&self, route: Route) -> Result<Route> {
        let target = router::guard(route, self.client.session());
        self.history.navigate(target);
        if target == Route::Login && route != Route::Login {
            return Err(AppraiseError::NotAuthenticated);
        }
        Ok(target)
    }

    /// Tell the user when the session was dropped during the command
    pub fn report_forced_logout(&self) {
        let visited = self.history.visited();
        if visited.len() > 1 && self.history.current() == Route::Login {
            eprintln!("Session expired. Run `appraise login` to sign in again.");
        }
    }
}

/// Config file, environment, then the `--api-url` flag
pub fn load_config(config_file: Option<&Path>, api_url: Option<&str>) -> Result<ClientConfig> {
    let config = match config_file {
        Some(path) => ClientConfig::load_from(Some(path))?,
        None => ClientConfig::load()?,
    };
    match api_url {
        Some(url) => config.with_api_url(url),
        None => Ok(config),
    }
}

/// Read one line from stdin after printing `prompt`
pub fn prompt_line(prompt: &str) -> Result<String> {
    use std::io::Write;

    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Truncate text for table cells
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Alpha", 10), "Alpha");
        assert_eq!(truncate("Knowledge of roles", 10), "Knowled...");
    }
}
