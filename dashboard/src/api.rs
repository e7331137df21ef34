//! ==============================================================================
//! api.rs - API client for the signup endpoint
//! ==============================================================================

use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;
use thiserror::Error;

use crate::config::{CredentialPolicy, RequestConfig};

// ==============================================================================
// request / failure types
// ==============================================================================

/// A fully encoded POST, ready for a transport
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub credentials: CredentialPolicy,
}

/// Anything that keeps the request from producing a JSON body.
/// The view only ever shows the `Display` text.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestFailure {
    #[error("{0}")]
    Network(String),
    #[error("Request failed with status code {code}")]
    Status { code: u16, status_text: String },
    #[error("{0}")]
    Parse(String),
    #[error("could not encode request body: {0}")]
    Encode(String),
}

impl RequestFailure {
    fn network(err: gloo_net::Error) -> Self {
        RequestFailure::Network(err.to_string())
    }
}

/// Build the signup POST described by `config`
pub fn signup_request(config: &RequestConfig) -> Result<OutboundRequest, RequestFailure> {
    let body = serde_json::to_string(&config.payload)
        .map_err(|e| RequestFailure::Encode(e.to_string()))?;

    Ok(OutboundRequest {
        url: config.url.clone(),
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body,
        credentials: config.credentials,
    })
}

// ==============================================================================
// transports
// ==============================================================================

/// Sends a request and hands back the parsed JSON body
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: &OutboundRequest) -> Result<Value, RequestFailure>;
}

/// Browser fetch via gloo-net
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<Value, RequestFailure> {
        let mut builder = Request::post(&request.url).credentials(request.credentials.into());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .body(request.body.clone())
            .map_err(RequestFailure::network)?
            .send()
            .await
            .map_err(RequestFailure::network)?;

        check_status(response.ok(), response.status(), response.status_text())?;

        response
            .json::<Value>()
            .await
            .map_err(|e| RequestFailure::Parse(e.to_string()))
    }
}

/// Only 2xx responses go on to body parsing
fn check_status(ok: bool, code: u16, status_text: String) -> Result<(), RequestFailure> {
    if ok {
        Ok(())
    } else {
        Err(RequestFailure::Status { code, status_text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{demo_payload, DEFAULT_API_BASE};

    #[test]
    fn test_signup_request_matches_demo_constants() {
        let config = RequestConfig::new(DEFAULT_API_BASE, demo_payload());
        let request = signup_request(&config).unwrap();

        assert_eq!(request.url, "http://localhost:8080/api/v1/user/any/signup");
        assert_eq!(
            request.body,
            r#"{"id":"test02","pw":"qwer123123","email":"test02@naver.com","nickname":"test02","phone":"010-1234-1234"}"#
        );
        assert_eq!(
            request.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert_eq!(request.credentials, CredentialPolicy::Include);
    }

    #[test]
    fn test_check_status_passes_2xx() {
        assert_eq!(check_status(true, 200, "OK".to_string()), Ok(()));
        assert_eq!(check_status(true, 204, "No Content".to_string()), Ok(()));
    }

    #[test]
    fn test_check_status_conflict() {
        let failure = check_status(false, 409, "Conflict".to_string()).unwrap_err();
        assert_eq!(
            failure,
            RequestFailure::Status {
                code: 409,
                status_text: "Conflict".to_string(),
            }
        );
        assert_eq!(failure.to_string(), "Request failed with status code 409");
    }

    #[test]
    fn test_check_status_server_error() {
        let failure = check_status(false, 500, "Internal Server Error".to_string()).unwrap_err();
        assert!(matches!(failure, RequestFailure::Status { code: 500, .. }));
        assert_eq!(failure.to_string(), "Request failed with status code 500");
    }

    #[test]
    fn test_network_failure_message_is_verbatim() {
        let failure = RequestFailure::Network("Network Error".to_string());
        assert_eq!(failure.to_string(), "Network Error");
    }
}
