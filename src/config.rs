use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.universe.com/";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub id: String,
    pub secret: String,
}

/// Paths relative to the base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub access_token: String,
    pub guestlists: String,
    pub current_user: String,
    pub listings: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            access_token: "oauth/token".to_string(),
            guestlists: "api/v2/guestlists".to_string(),
            current_user: "api/v2/current_user".to_string(),
            listings: "api/v2/listings".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub base_path: String,
    pub endpoints: Endpoints,
    /// Overrides the file store location used by the binary.
    pub storage_path: Option<PathBuf>,
}

impl Config {
    pub fn new(credentials: Credentials, base_path: impl Into<String>) -> Result<Self> {
        let base_path = base_path.into();
        validate_base_path(&base_path)?;

        Ok(Self {
            credentials,
            base_path,
            endpoints: Endpoints::default(),
            storage_path: None,
        })
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let credentials = Credentials {
            id: std::env::var("UNIVERSE_CLIENT_ID").context("UNIVERSE_CLIENT_ID is not set")?,
            secret: std::env::var("UNIVERSE_CLIENT_SECRET")
                .context("UNIVERSE_CLIENT_SECRET is not set")?,
        };

        let base_path =
            std::env::var("UNIVERSE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(credentials, base_path).context("Invalid UNIVERSE_BASE_URL")?;

        if let Ok(token_path) = std::env::var("UNIVERSE_TOKEN_PATH") {
            config.endpoints.access_token = token_path;
        }
        config.storage_path = std::env::var_os("UNIVERSE_STORAGE_PATH").map(PathBuf::from);

        Ok(config)
    }

    /// Token endpoint URL; joined literally like every other request URL.
    pub fn token_url(&self) -> String {
        [self.base_path.as_str(), self.endpoints.access_token.as_str()].concat()
    }
}

fn validate_base_path(base_path: &str) -> Result<()> {
    let url = Url::parse(base_path).with_context(|| format!("not a URL: {}", base_path))?;
    if url.cannot_be_a_base() {
        bail!("{} cannot be used as a base URL", base_path);
    }
    if !base_path.ends_with('/') {
        bail!("{} must end with '/'", base_path);
    }
    Ok(())
}
