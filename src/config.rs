use std::env;

/// Runtime configuration for the ShipStation client.
/// Values are sourced from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_secret: String,
    pub api_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Disables TLS certificate and hostname verification. Off by default;
    /// only enable against test endpoints with self-signed certificates.
    pub accept_invalid_certs: bool,
}

/// Production API endpoint. Paths are concatenated onto this verbatim.
pub const DEFAULT_API_URL: &str = "https://ssapi.shipstation.com/";

impl Config {
    /// Build a configuration from explicit credentials and defaults for
    /// everything else. Credentials are not validated; empty strings are
    /// accepted and will simply fail server-side.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: default_user_agent(),
            timeout_secs: 30,
            accept_invalid_certs: false,
        }
    }

    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - SHIPSTATION_API_KEY [required]
    /// - SHIPSTATION_API_SECRET [required]
    /// - SHIPSTATION_API_URL (default: https://ssapi.shipstation.com/)
    /// - SHIPSTATION_HTTP_TIMEOUT_SECS (default: 30)
    /// - SHIPSTATION_USER_AGENT (default: shipstation-client/<version>)
    /// - SHIPSTATION_ACCEPT_INVALID_CERTS (default: false)
    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("SHIPSTATION_API_KEY")
            .map_err(|_| "Missing SHIPSTATION_API_KEY".to_string())?;
        let api_secret = env::var("SHIPSTATION_API_SECRET")
            .map_err(|_| "Missing SHIPSTATION_API_SECRET".to_string())?;

        let api_url =
            env::var("SHIPSTATION_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = env::var("SHIPSTATION_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);
        let user_agent =
            env::var("SHIPSTATION_USER_AGENT").unwrap_or_else(|_| default_user_agent());
        let accept_invalid_certs = env::var("SHIPSTATION_ACCEPT_INVALID_CERTS")
            .map(|s| matches!(s.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            api_key,
            api_secret,
            api_url,
            user_agent,
            timeout_secs,
            accept_invalid_certs,
        })
    }

    /// Override the base endpoint, e.g. to point at a mock server.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

fn default_user_agent() -> String {
    format!("shipstation-client/{}", env!("CARGO_PKG_VERSION"))
}
