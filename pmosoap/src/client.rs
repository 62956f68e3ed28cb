//! SOAP client facade
//!
//! [`SoapClient`] validates the call, builds the envelope, assembles the HTTP
//! request and hands it to its [`Transport`]. One call, one POST: there is no
//! retry and the response comes back as the transport returned it.
//!
//! # Example
//!
//! ```no_run
//! use pmosoap::{SoapClient, SoapVersion, fragment};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SoapClient::new()?;
//!
//!     let response = client
//!         .call(
//!             "https://sscweb.gsfc.nasa.gov/WS/helio/1/HeliocentricTrajectoriesService",
//!             SoapVersion::Soap11,
//!         )
//!         .body(fragment(r#"<getAllObjects xmlns="http://helio.spdf.gsfc.nasa.gov/"/>"#)?)
//!         .send()
//!         .await?;
//!
//!     println!("{}: {}", response.status(), response.text());
//!     Ok(())
//! }
//! ```

use crate::error::{Result, SoapError};
use crate::message::SoapMessage;
use crate::request::SoapRequest;
use crate::serializer::{QuickXmlSerializer, XmlSerializer};
use crate::transport::{ReqwestTransport, SoapResponse, Transport};
use crate::version::SoapVersion;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;
use xmltree::Element;

/// Anything a SOAP endpoint can be taken from
pub trait IntoEndpoint {
    fn into_endpoint(self) -> Result<Url>;
}

impl IntoEndpoint for Url {
    fn into_endpoint(self) -> Result<Url> {
        check_scheme(self)
    }
}

impl IntoEndpoint for &Url {
    fn into_endpoint(self) -> Result<Url> {
        check_scheme(self.clone())
    }
}

impl IntoEndpoint for &str {
    fn into_endpoint(self) -> Result<Url> {
        parse_endpoint(self)
    }
}

impl IntoEndpoint for String {
    fn into_endpoint(self) -> Result<Url> {
        parse_endpoint(&self)
    }
}

impl IntoEndpoint for &String {
    fn into_endpoint(self) -> Result<Url> {
        parse_endpoint(self)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(SoapError::invalid_argument("endpoint cannot be empty"));
    }

    let url = Url::parse(endpoint).map_err(|e| {
        SoapError::invalid_argument(format!("invalid endpoint '{}': {}", endpoint, e))
    })?;
    check_scheme(url)
}

fn check_scheme(url: Url) -> Result<Url> {
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(SoapError::invalid_argument(format!(
            "unsupported endpoint scheme '{}' in {}",
            scheme, url
        ))),
    }
}

/// SOAP client sharing one transport across all calls
///
/// Cloning is cheap: clones share the same transport (and connection pool).
#[derive(Debug, Clone)]
pub struct SoapClient {
    transport: Arc<dyn Transport>,
    default_version: SoapVersion,
}

impl SoapClient {
    /// Create a client over a default [`ReqwestTransport`]
    ///
    /// gzip and deflate responses are decompressed automatically.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(ReqwestTransport::new()?))
    }

    /// Create a client over a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self::with_shared_transport(Arc::new(transport))
    }

    /// Create a client over a transport shared with other components
    pub fn with_shared_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            default_version: SoapVersion::default(),
        }
    }

    /// Set the version used by [`call_default`](Self::call_default)
    pub fn with_default_version(mut self, version: SoapVersion) -> Self {
        self.default_version = version;
        self
    }

    pub fn default_version(&self) -> SoapVersion {
        self.default_version
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Send a message to `endpoint`
    ///
    /// # Errors
    ///
    /// - [`SoapError::InvalidArgument`] for an invalid endpoint, no body
    ///   fragment or an action that cannot be sent; nothing is sent then
    /// - transport errors as reported by the transport
    pub async fn post(
        &self,
        endpoint: impl IntoEndpoint,
        message: SoapMessage,
    ) -> Result<SoapResponse> {
        let request = Self::prepare(endpoint, message)?;
        self.dispatch(request).await
    }

    /// Send a message to `endpoint`, giving up when `cancel` fires
    ///
    /// The in-flight HTTP request is dropped on cancellation and
    /// [`SoapError::Cancelled`] is returned.
    pub async fn post_with_cancellation(
        &self,
        endpoint: impl IntoEndpoint,
        message: SoapMessage,
        cancel: &CancellationToken,
    ) -> Result<SoapResponse> {
        let request = Self::prepare(endpoint, message)?;
        let endpoint = request.endpoint().clone();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(endpoint = %endpoint, "SOAP call cancelled");
                Err(SoapError::Cancelled)
            }
            result = self.dispatch(request) => result,
        }
    }

    /// Send a single body fragment
    pub async fn post_body(
        &self,
        endpoint: impl IntoEndpoint,
        version: SoapVersion,
        body: Element,
        action: Option<&str>,
    ) -> Result<SoapResponse> {
        let mut message = SoapMessage::new(version).with_body(body);
        if let Some(action) = action {
            message = message.with_action(action);
        }
        self.post(endpoint, message).await
    }

    /// Serialize `body` with [`QuickXmlSerializer`] and send it
    pub async fn post_object<B: Serialize + ?Sized>(
        &self,
        endpoint: impl IntoEndpoint,
        version: SoapVersion,
        body: &B,
        action: Option<&str>,
    ) -> Result<SoapResponse> {
        let bodies = std::slice::from_ref(&body);
        self.post_objects_using(endpoint, version, bodies, action, &QuickXmlSerializer)
            .await
    }

    /// Serialize every body with `serializer` and send them in order
    ///
    /// An empty `bodies` slice is rejected before anything is serialized.
    pub async fn post_objects_using<B, S>(
        &self,
        endpoint: impl IntoEndpoint,
        version: SoapVersion,
        bodies: &[B],
        action: Option<&str>,
        serializer: &S,
    ) -> Result<SoapResponse>
    where
        B: Serialize,
        S: XmlSerializer,
    {
        if bodies.is_empty() {
            return Err(SoapError::invalid_argument(
                "bodies cannot be empty, a SOAP message needs at least one body element",
            ));
        }

        let mut message = SoapMessage::new(version);
        for body in bodies {
            message = message.with_body_object_using(body, serializer)?;
        }
        if let Some(action) = action {
            message = message.with_action(action);
        }
        self.post(endpoint, message).await
    }

    /// Start building a call to `endpoint`
    pub fn call(&self, endpoint: impl IntoEndpoint, version: SoapVersion) -> SoapCall<'_> {
        SoapCall {
            client: self,
            endpoint: endpoint.into_endpoint(),
            message: Ok(SoapMessage::new(version)),
            cancellation: None,
        }
    }

    /// Start building a call using the client's default version
    pub fn call_default(&self, endpoint: impl IntoEndpoint) -> SoapCall<'_> {
        self.call(endpoint, self.default_version)
    }

    fn prepare(endpoint: impl IntoEndpoint, message: SoapMessage) -> Result<SoapRequest> {
        let endpoint = endpoint.into_endpoint()?;

        debug!(
            endpoint = %endpoint,
            version = %message.version,
            action = message.action.as_deref().unwrap_or(""),
            bodies = message.bodies.len(),
            headers = message.headers.len(),
            "Preparing SOAP call"
        );

        message.into_request(endpoint)
    }

    async fn dispatch(&self, request: SoapRequest) -> Result<SoapResponse> {
        let endpoint = request.endpoint().clone();
        let response = self.transport.send(request).await?;
        debug!(endpoint = %endpoint, status = %response.status(), "SOAP call completed");
        Ok(response)
    }
}

/// Builder for a single SOAP call, see [`SoapClient::call`]
///
/// Errors (invalid endpoint, failed serialization) are kept until
/// [`send`](SoapCall::send) and nothing is sent when one occurred.
#[derive(Debug)]
pub struct SoapCall<'a> {
    client: &'a SoapClient,
    endpoint: Result<Url>,
    message: Result<SoapMessage>,
    cancellation: Option<CancellationToken>,
}

impl SoapCall<'_> {
    pub fn body(self, body: Element) -> Self {
        self.map(|m| Ok(m.with_body(body)))
    }

    pub fn bodies(self, bodies: impl IntoIterator<Item = Element>) -> Self {
        self.map(|m| Ok(m.with_bodies(bodies)))
    }

    pub fn header(self, header: Element) -> Self {
        self.map(|m| Ok(m.with_header(header)))
    }

    pub fn headers(self, headers: impl IntoIterator<Item = Element>) -> Self {
        self.map(|m| Ok(m.with_headers(headers)))
    }

    pub fn action(self, action: impl Into<String>) -> Self {
        self.map(|m| Ok(m.with_action(action)))
    }

    /// Add a serialized body object
    pub fn body_object<T: Serialize + ?Sized>(self, value: &T) -> Self {
        self.map(|m| m.with_body_object(value))
    }

    pub fn body_object_using<T, S>(self, value: &T, serializer: &S) -> Self
    where
        T: Serialize + ?Sized,
        S: XmlSerializer,
    {
        self.map(|m| m.with_body_object_using(value, serializer))
    }

    /// Add a serialized header object
    pub fn header_object<T: Serialize + ?Sized>(self, value: &T) -> Self {
        self.map(|m| m.with_header_object(value))
    }

    pub fn header_object_using<T, S>(self, value: &T, serializer: &S) -> Self
    where
        T: Serialize + ?Sized,
        S: XmlSerializer,
    {
        self.map(|m| m.with_header_object_using(value, serializer))
    }

    /// Cancel the call when `token` fires
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Send the call
    pub async fn send(self) -> Result<SoapResponse> {
        let endpoint = self.endpoint?;
        let message = self.message?;

        match self.cancellation {
            Some(token) => {
                self.client
                    .post_with_cancellation(endpoint, message, &token)
                    .await
            }
            None => self.client.post(endpoint, message).await,
        }
    }

    fn map(mut self, f: impl FnOnce(SoapMessage) -> Result<SoapMessage>) -> Self {
        self.message = self.message.and_then(f);
        self
    }
}
