//! ==============================================================================
//! config.rs - request configuration for RequestView
//! ==============================================================================
//!
//! the dashboard ships with one demo signup baked in. everything the
//! request needs (endpoint, payload, credential policy) lives here so the
//! view can be pointed at a different backend or driven by tests.
//!
//! the api base can be overridden at build time:
//!     SIGNUP_API_BASE=https://signup-api.example.workers.dev trunk build
//!
//! ==============================================================================

use shared::SignupRequest;
use web_sys::RequestCredentials;

/// Local backend used when no build-time override is given
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
pub const SIGNUP_PATH: &str = "/api/v1/user/any/signup";

/// Whether cookies travel with the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialPolicy {
    #[default]
    Include,
    SameOrigin,
    Omit,
}

impl From<CredentialPolicy> for RequestCredentials {
    fn from(policy: CredentialPolicy) -> Self {
        match policy {
            CredentialPolicy::Include => RequestCredentials::Include,
            CredentialPolicy::SameOrigin => RequestCredentials::SameOrigin,
            CredentialPolicy::Omit => RequestCredentials::Omit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub url: String,
    pub payload: SignupRequest,
    pub credentials: CredentialPolicy,
}

impl RequestConfig {
    pub fn new(api_base: &str, payload: SignupRequest) -> Self {
        Self {
            url: signup_url(api_base),
            payload,
            credentials: CredentialPolicy::Include,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        let base = option_env!("SIGNUP_API_BASE").unwrap_or(DEFAULT_API_BASE);
        Self::new(base, demo_payload())
    }
}

/// The demo account the dashboard registers on mount
pub fn demo_payload() -> SignupRequest {
    SignupRequest::new(
        "test02",
        "qwer123123",
        "test02@naver.com",
        "test02",
        "010-1234-1234",
    )
}

fn signup_url(api_base: &str) -> String {
    format!("{}{}", api_base.trim_end_matches('/'), SIGNUP_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_url_joins_base() {
        assert_eq!(
            signup_url("http://localhost:8080"),
            "http://localhost:8080/api/v1/user/any/signup"
        );
        // trailing slash on the base is tolerated
        assert_eq!(
            signup_url("https://api.example.dev/"),
            "https://api.example.dev/api/v1/user/any/signup"
        );
    }

    #[test]
    fn test_default_includes_credentials() {
        let config = RequestConfig::new(DEFAULT_API_BASE, demo_payload());
        assert_eq!(config.credentials, CredentialPolicy::Include);
        assert_eq!(config.payload.id, "test02");
    }
}
