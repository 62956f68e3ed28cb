//! HTTP transport used to send SOAP requests
//!
//! [`Transport`] is the seam between the SOAP logic and the network. The
//! default implementation, [`ReqwestTransport`], shares one `reqwest` connection
//! pool across every call and decompresses gzip/deflate responses.

use crate::error::{Result, SoapError};
use crate::request::SoapRequest;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (100 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 100;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("pmosoap/", env!("CARGO_PKG_VERSION"));

/// Something able to POST a [`SoapRequest`] and return the raw answer
///
/// Implementations must be safe for concurrent use: one instance is shared by
/// every clone of a [`SoapClient`](crate::SoapClient).
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send the request and return the response untouched
    ///
    /// Non-success HTTP statuses are not errors.
    async fn send(&self, request: SoapRequest) -> Result<SoapResponse>;
}

/// Raw HTTP response to a SOAP call
#[derive(Debug, Clone)]
pub struct SoapResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl SoapResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes (already decompressed by the transport)
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// [`Transport`] backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with default settings
    ///
    /// gzip and deflate decompression are enabled, timeout is
    /// [`DEFAULT_REQUEST_TIMEOUT_SECS`].
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the transport
    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    /// Create a transport with a custom reqwest::Client
    ///
    /// Useful for sharing HTTP connection pools or custom TLS settings
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Get the internal HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: SoapRequest) -> Result<SoapResponse> {
        let url = request.endpoint().clone();
        let content_type = request.content_type().to_string();
        let headers = request.headers().clone();

        let response = self
            .client
            .post(url)
            .headers(headers)
            .header(CONTENT_TYPE, content_type)
            .body(request.into_body())
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        debug!(status = %status, bytes = body.len(), "SOAP response received");

        Ok(SoapResponse::new(status, headers, body))
    }
}

/// Builder for configuring a [`ReqwestTransport`]
#[derive(Debug)]
pub struct TransportBuilder {
    client: Option<Client>,
    timeout: Duration,
    user_agent: String,
    gzip: bool,
    deflate: bool,
    proxy: Option<String>,
    title_case_headers: bool,
}

impl Default for TransportBuilder {
    fn default() -> Self {
        Self {
            client: None,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            gzip: true,
            deflate: true,
            proxy: None,
            title_case_headers: false,
        }
    }
}

impl TransportBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client, every other setting is then ignored
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable automatic gzip decompression
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    /// Enable or disable automatic deflate decompression
    pub fn deflate(mut self, enabled: bool) -> Self {
        self.deflate = enabled;
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Write HTTP/1 header names in title case (`Soapaction`, `Content-Type`)
    ///
    /// Header names are lowercase on the wire otherwise. Off by default.
    pub fn title_case_headers(mut self, enabled: bool) -> Self {
        self.title_case_headers = enabled;
        self
    }

    /// Build the transport
    pub fn build(self) -> Result<ReqwestTransport> {
        let client = if let Some(client) = self.client {
            client
        } else {
            let mut builder = Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .gzip(self.gzip)
                .deflate(self.deflate);

            if self.title_case_headers {
                builder = builder.http1_title_case_headers();
            }

            if let Some(proxy_url) = &self.proxy {
                let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                    SoapError::invalid_argument(format!("invalid proxy '{}': {}", proxy_url, e))
                })?;
                builder = builder.proxy(proxy);
            }

            builder.build()?
        };

        Ok(ReqwestTransport { client })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = TransportBuilder::new();
        assert_eq!(
            builder.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert!(builder.gzip);
        assert!(builder.deflate);
        assert!(builder.proxy.is_none());
        assert!(!builder.title_case_headers);
        assert!(builder.user_agent.starts_with("pmosoap/"));
    }

    #[test]
    fn test_builder_invalid_proxy() {
        let err = ReqwestTransport::builder()
            .proxy("not a proxy url")
            .build()
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_builder_title_case_headers() {
        let builder = TransportBuilder::new().title_case_headers(true);
        assert!(builder.title_case_headers);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_response_accessors() {
        let response = SoapResponse::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            HeaderMap::new(),
            b"<Fault/>".to_vec(),
        );
        assert!(!response.is_success());
        assert_eq!(response.status().as_u16(), 500);
        assert_eq!(response.text(), "<Fault/>");
        assert_eq!(response.into_body(), b"<Fault/>".to_vec());
    }
}
