use std::time::Duration;

/// Process-environment key for the explicitly injected environment name.
pub const ENV_ENVIRONMENT: &str = "HDM_ENVIRONMENT";

/// Process-environment key for the explicitly injected API base URL.
pub const ENV_API_BASE_URL: &str = "HDM_API_BASE_URL";

/// Deployment environments recognized by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Homologation,
    Production,
}

impl Environment {
    /// Parse an explicitly injected environment name.
    ///
    /// Only the three recognized names resolve; anything else falls through
    /// to host inspection.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "development" => Some(Self::Development),
            "homologation" => Some(Self::Homologation),
            "production" => Some(Self::Production),
            _ => None,
        }
    }

    /// Classify a host name the way the deployed frontends are named.
    pub fn from_host(host: &str) -> Self {
        if host.contains("localhost") || host.contains("127.0.0.1") {
            Self::Development
        } else if host.contains("hom") || host.contains("staging") {
            Self::Homologation
        } else {
            Self::Production
        }
    }

    /// Static fallback API base URL for this environment.
    pub fn fallback_api_url(self) -> &'static str {
        match self {
            Self::Development => "https://dev-api.hosteldamel.com",
            Self::Homologation => "https://hom-api.hosteldamel.com",
            Self::Production => "https://api.hosteldamel.com",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Homologation => "homologation",
            Self::Production => "production",
        }
    }
}

/// Resolved deployment configuration.
///
/// Computed once at application start and handed to the components that need
/// it; immutable afterwards. Resolution never fails: every missing signal
/// has a defined default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub environment: Environment,
    pub api_url: String,
}

impl EnvironmentConfig {
    /// Resolve from explicit overrides and an optional host context.
    ///
    /// Precedence: a recognized explicit environment name wins over host
    /// inspection; an explicit API URL wins over the fallback table. Without
    /// any host context the environment is `Development`.
    pub fn resolve(
        explicit_env: Option<&str>,
        explicit_api_url: Option<&str>,
        host: Option<&str>,
    ) -> Self {
        let environment = explicit_env
            .and_then(Environment::from_name)
            .or_else(|| host.map(Environment::from_host))
            .unwrap_or(Environment::Development);

        let api_url = explicit_api_url
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| environment.fallback_api_url().to_string());

        Self {
            environment,
            api_url,
        }
    }

    /// Resolve from `HDM_ENVIRONMENT` / `HDM_API_BASE_URL` in the process
    /// environment, plus an optional host context.
    pub fn from_process_env(host: Option<&str>) -> Self {
        let explicit_env = std::env::var(ENV_ENVIRONMENT).ok();
        let explicit_url = std::env::var(ENV_API_BASE_URL).ok();
        Self::resolve(explicit_env.as_deref(), explicit_url.as_deref(), host)
    }
}

/// HTTP client timeouts.
#[derive(Debug, Clone)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            request: Duration::from_secs(30),
        }
    }
}

/// Configuration for [`crate::client::ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api_url: String,

    /// Connect/request timeouts applied at client construction.
    pub timeouts: HttpTimeouts,

    /// Custom user agent (optional).
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(environment: &EnvironmentConfig) -> Self {
        Self::with_api_url(environment.api_url.clone())
    }

    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeouts: HttpTimeouts::default(),
            user_agent: Some("hdm-client".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_environment_wins_over_host() {
        let config = EnvironmentConfig::resolve(Some("homologation"), None, Some("localhost:5173"));
        assert_eq!(config.environment, Environment::Homologation);
        assert_eq!(config.api_url, "https://hom-api.hosteldamel.com");
    }

    #[test]
    fn unrecognized_explicit_name_falls_through_to_host() {
        let config = EnvironmentConfig::resolve(Some("qa"), None, Some("localhost"));
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn host_classification() {
        assert_eq!(
            Environment::from_host("127.0.0.1:8080"),
            Environment::Development
        );
        assert_eq!(
            Environment::from_host("hom.hosteldamel.com"),
            Environment::Homologation
        );
        assert_eq!(
            Environment::from_host("staging.hosteldamel.com"),
            Environment::Homologation
        );
        assert_eq!(
            Environment::from_host("www.hosteldamel.com"),
            Environment::Production
        );
    }

    #[test]
    fn missing_host_defaults_to_development() {
        let config = EnvironmentConfig::resolve(None, None, None);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.api_url, "https://dev-api.hosteldamel.com");
    }

    #[test]
    fn explicit_api_url_overrides_fallback_table() {
        let config =
            EnvironmentConfig::resolve(Some("production"), Some("http://127.0.0.1:3000"), None);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn empty_explicit_api_url_is_ignored() {
        let config = EnvironmentConfig::resolve(Some("production"), Some(""), None);
        assert_eq!(config.api_url, "https://api.hosteldamel.com");
    }

    #[test]
    fn fallback_table_keyed_by_environment() {
        assert_eq!(
            Environment::Development.fallback_api_url(),
            "https://dev-api.hosteldamel.com"
        );
        assert_eq!(
            Environment::Homologation.fallback_api_url(),
            "https://hom-api.hosteldamel.com"
        );
        assert_eq!(
            Environment::Production.fallback_api_url(),
            "https://api.hosteldamel.com"
        );
    }
}
