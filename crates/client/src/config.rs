//! Client construction parameters.

use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::tokens::TokenScope;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "INVESTPRO_API_URL";

/// Production backend base URL, used when the environment provides none.
pub const DEFAULT_API_URL: &str = "https://investpro-company.com/api";

/// Conventional refresh endpoint of the backend.
pub const REFRESH_ENDPOINT: &str = "auth/token/refresh/";

/// Paths exempt from bearer-header injection on the customer client.
/// Login/register calls must not carry a stale token that could trigger
/// a spurious 401-driven logout.
pub const CUSTOMER_PUBLIC_PATHS: &[&str] = &[
    "customer/login/",
    "customer/register/",
    "customer/login",
    "customer/register",
    "auth/login/",
    "auth/signup/",
];

/// Pulls a new access token out of a refresh response body. Returning
/// `None` falls back to the conventional top-level `access` field.
pub type AccessTokenExtractor = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Immutable configuration of one client instance. The scope is fixed
/// for the lifetime of the client.
#[derive(Clone)]
pub struct ConnectionConfig {
    pub api_url: Url,
    pub scope: TokenScope,
    public_paths: BTreeSet<String>,
    pub refresh_endpoint: Option<String>,
    pub extract_access_token: Option<AccessTokenExtractor>,
}

impl ConnectionConfig {
    #[must_use]
    pub fn new(api_url: Url, scope: TokenScope) -> Self {
        Self {
            api_url,
            scope,
            public_paths: BTreeSet::new(),
            refresh_endpoint: None,
            extract_access_token: None,
        }
    }

    /// Customer-scope configuration with the platform's public paths.
    #[must_use]
    pub fn customer(api_url: Url) -> Self {
        Self::new(api_url, TokenScope::Customer).with_public_paths(CUSTOMER_PUBLIC_PATHS.iter().copied())
    }

    /// Admin-scope configuration. The admin surface has no public paths;
    /// its login call tolerates a stale bearer header.
    #[must_use]
    pub fn admin(api_url: Url) -> Self {
        Self::new(api_url, TokenScope::Admin)
    }

    /// Replace the public-path set. Leading slashes are stripped so the
    /// set matches however callers spell their request paths.
    #[must_use]
    pub fn with_public_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        self.public_paths = paths
            .into_iter()
            .map(|path| path.as_ref().trim_start_matches('/').to_owned())
            .collect();
        self
    }

    /// Enable silent refresh against the given endpoint path.
    #[must_use]
    pub fn with_refresh_endpoint(mut self, path: impl Into<String>) -> Self {
        self.refresh_endpoint = Some(path.into());
        self
    }

    /// Override how the new access token is extracted from a refresh
    /// response.
    #[must_use]
    pub fn with_access_token_extractor<F>(mut self, extract: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.extract_access_token = Some(Arc::new(extract));
        self
    }

    #[must_use]
    pub fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.contains(path.trim_start_matches('/'))
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("api_url", &self.api_url)
            .field("scope", &self.scope)
            .field("public_paths", &self.public_paths)
            .field("refresh_endpoint", &self.refresh_endpoint)
            .field(
                "extract_access_token",
                &self.extract_access_token.as_ref().map(|_| "<closure>"),
            )
            .finish()
    }
}

/// Backend base URL: the `INVESTPRO_API_URL` environment variable when
/// set, the production URL otherwise.
pub fn api_url_from_env() -> Result<Url, url::ParseError> {
    let raw = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
    Url::parse(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths_match_with_and_without_leading_slash() {
        let config = ConnectionConfig::customer(Url::parse(DEFAULT_API_URL).unwrap());

        assert!(config.is_public_path("customer/login/"));
        assert!(config.is_public_path("/customer/login/"));
        assert!(config.is_public_path("//customer/register"));
        assert!(!config.is_public_path("customer/profile/"));
    }

    #[test]
    fn admin_config_has_no_public_paths() {
        let config = ConnectionConfig::admin(Url::parse(DEFAULT_API_URL).unwrap());
        assert!(!config.is_public_path("admin/login/"));
    }
}
