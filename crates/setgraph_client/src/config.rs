use secrecy::SecretString;

pub const DEFAULT_BASE_URL: &str = "https://api.setgraph.app";

/// Environment-sourced settings. Credentials are optional here; the CLI
/// prompts for whatever is missing.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self {
            base_url: get("SETGRAPH_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            email: get("SETGRAPH_EMAIL"),
            password: get("SETGRAPH_PASSWORD").map(|p| SecretString::new(p.into())),
        }
    }
}
