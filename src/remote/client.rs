//! HTTP transport for the airline GraphQL API.
//!
//! # Security
//!
//! The optional bearer token is held in a [`SecretBox`] and only exposed
//! while building the request header. The header value is wrapped in
//! [`RedactedHeader`] so it renders as `[REDACTED]` if it ever reaches a log.

use std::error::Error as _;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use reqwest::header;
use secrecy::{ExposeSecret, SecretBox};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{AerodeskError, GraphQlError, Result};

use super::graphql::{ErrorExtensions, GraphQlResponse};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn bearer(token: &str) -> Self {
        Self {
            value: format!("Bearer {token}"),
        }
    }

    fn as_header_value(&self) -> Result<header::HeaderValue> {
        let mut value = header::HeaderValue::from_str(&self.value).map_err(|_| {
            AerodeskError::Config("API token contains characters not allowed in a header".into())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Client for the airline GraphQL endpoint
pub struct GraphQlClient {
    client: Client,
    endpoint: Url,
    token: Option<SecretBox<String>>,
    timeout: Duration,
}

impl fmt::Debug for GraphQlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQlClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GraphQlClient {
    /// Create a client for `endpoint` with the given request timeout
    pub fn new(endpoint: Url, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| AerodeskError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            token: token.map(|t| SecretBox::new(Box::new(t))),
            timeout,
        })
    }

    /// Create a client from the loaded configuration and environment
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_url()?,
            config.api_token(),
            config.request_timeout(),
        )
    }

    /// Execute a GraphQL operation and return the response data.
    ///
    /// Transport failures map to [`AerodeskError::Network`] or
    /// [`AerodeskError::Timeout`]. Anything the server answered with, an
    /// HTTP error status, GraphQL errors or a malformed body, maps to an API
    /// error.
    pub(super) async fn execute<ResponseData, Vars>(
        &self,
        operation: cynic::Operation<ResponseData, Vars>,
    ) -> Result<ResponseData>
    where
        ResponseData: serde::de::DeserializeOwned + 'static,
        Vars: serde::Serialize,
    {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/json"),
            )
            .json(&operation);

        if let Some(token) = &self.token {
            let auth_header = RedactedHeader::bearer(token.expose_secret());
            debug!(authorization = %auth_header, "attaching bearer token");
            request = request.header(header::AUTHORIZATION, auth_header.as_header_value()?);
        }

        debug!(endpoint = %self.endpoint, "sending GraphQL request");
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        // GraphQL servers commonly report validation errors with a 4xx status
        // and a regular error body, so try to decode before checking status.
        let result: GraphQlResponse<ResponseData, ErrorExtensions> =
            match serde_json::from_slice(&body) {
                Ok(result) => result,
                Err(_) if !status.is_success() => {
                    return Err(AerodeskError::Api(format!("HTTP {status}")));
                }
                Err(e) => {
                    return Err(AerodeskError::Api(format!("malformed response: {e}")));
                }
            };

        // Handle GraphQL errors - preserve individual error details
        if let Some(errors) = result.errors
            && !errors.is_empty()
        {
            let structured_errors: Vec<GraphQlError> = errors
                .iter()
                .map(|e| {
                    let code = e.extensions.as_ref().and_then(|ext| ext.code.clone());
                    let path = e.path.as_ref().map(|p| {
                        p.iter()
                            .map(|segment| match segment {
                                cynic::GraphQlErrorPathSegment::Field(name) => name.clone(),
                                cynic::GraphQlErrorPathSegment::Index(idx) => idx.to_string(),
                            })
                            .collect::<Vec<_>>()
                            .join(".")
                    });
                    GraphQlError {
                        message: e.message.clone(),
                        code,
                        path,
                    }
                })
                .collect();

            return Err(AerodeskError::GraphQlErrors {
                errors: structured_errors,
                partial_data: result.data.is_some(),
            });
        }

        if !status.is_success() {
            return Err(AerodeskError::Api(format!("HTTP {status}")));
        }

        result
            .data
            .ok_or_else(|| AerodeskError::Api("no data in response".to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> AerodeskError {
        if err.is_timeout() {
            return AerodeskError::Timeout(self.timeout);
        }
        AerodeskError::Network(error_chain(&err))
    }
}

/// Render an error with its sources, e.g. "error sending request: connection refused"
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_header_display() {
        let header = RedactedHeader::bearer("secret-token");
        assert_eq!(format!("{header}"), "[REDACTED]");
        assert!(!format!("{header:?}").contains("secret-token"));
    }

    #[test]
    fn test_redacted_header_value_is_sensitive() {
        let value = RedactedHeader::bearer("abc").as_header_value().unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let result = RedactedHeader::bearer("bad\ntoken").as_header_value();
        assert!(matches!(result, Err(AerodeskError::Config(_))));
    }

    #[test]
    fn test_client_debug_hides_token() {
        let client = GraphQlClient::new(
            Url::parse("http://localhost:4000/graphql").unwrap(),
            Some("hunter2".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("localhost:4000"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        use super::super::graphql::{AllAirportsQuery, QueryBuilder};

        // Port 1 is reserved and refuses connections on loopback
        let client = GraphQlClient::new(
            Url::parse("http://127.0.0.1:1/graphql").unwrap(),
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        let err = client
            .execute(AllAirportsQuery::build(()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AerodeskError::Network(_) | AerodeskError::Timeout(_)
        ));
    }
}
