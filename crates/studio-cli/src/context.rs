//! Shared state for command execution.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use tracing::warn;

use studio_core::{ApiUrl, LoginRedirect};
use studio_http::{AuthClient, ClientConfig};
use studio_store::FileTokenStore;

/// Remembers the login redirect so the CLI can tell the operator to sign in again.
#[derive(Debug, Default)]
pub struct CliRedirect {
    route: Mutex<Option<String>>,
}

impl LoginRedirect for CliRedirect {
    fn redirect_to_login(&self, route: &str) {
        warn!(route, "Session cleared; login required");
        *self.route.lock().unwrap_or_else(PoisonError::into_inner) = Some(route.to_string());
    }
}

/// The authenticated client plus the file store it writes to.
pub struct Context {
    pub client: AuthClient,
    pub store: Arc<FileTokenStore>,
    redirect: Arc<CliRedirect>,
}

impl Context {
    pub fn new(api: &str, store_path: Option<PathBuf>) -> Result<Self> {
        let api = ApiUrl::new(api).context("Invalid API URL")?;
        let path = match store_path {
            Some(path) => path,
            None => default_session_path()?,
        };

        let store = Arc::new(FileTokenStore::new(path));
        let redirect = Arc::new(CliRedirect::default());
        let client = AuthClient::with_redirect(
            ClientConfig::new(api).with_user_agent(concat!(
                "studio-cli/",
                env!("STUDIO_VERSION")
            )),
            store.clone(),
            redirect.clone(),
        )
        .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            store,
            redirect,
        })
    }

    /// The login route, if a command ended the session.
    pub fn redirected_to(&self) -> Option<String> {
        self.redirect
            .route
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fail early when no session is stored.
    pub async fn require_session(&self) -> Result<()> {
        let signed_in = self
            .client
            .is_authenticated()
            .await
            .context("Failed to read session")?;
        anyhow::ensure!(signed_in, "No active session. Run 'studio login' first.");
        Ok(())
    }
}

/// Get the default session file path.
fn default_session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "studio").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("session.json"))
}
