//! Blocking SOAP client
//!
//! Wraps the async [`SoapClient`](crate::SoapClient) in a private current-thread
//! Tokio runtime. It must not be used from inside an async context: calling
//! it from a Tokio task panics, like any nested `block_on`.
//!
//! ```no_run
//! use pmosoap::{SoapVersion, blocking, fragment};
//!
//! let client = blocking::SoapClient::new()?;
//! let response = client.post_body(
//!     "https://example.com/soap",
//!     SoapVersion::Soap11,
//!     fragment("<Ping/>")?,
//!     Some("urn:Ping"),
//! )?;
//! println!("{}", response.status());
//! # Ok::<(), pmosoap::SoapError>(())
//! ```

use crate::client::IntoEndpoint;
use crate::error::Result;
use crate::message::SoapMessage;
use crate::transport::{SoapResponse, Transport};
use crate::version::SoapVersion;
use serde::Serialize;
use tokio::runtime::{Builder, Runtime};
use tokio_util::sync::CancellationToken;
use xmltree::Element;

/// Synchronous counterpart of [`crate::SoapClient`]
#[derive(Debug)]
pub struct SoapClient {
    inner: crate::SoapClient,
    runtime: Runtime,
}

impl SoapClient {
    /// Create a blocking client over a default transport
    pub fn new() -> Result<Self> {
        Self::with_client(crate::SoapClient::new()?)
    }

    /// Create a blocking client over a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Result<Self> {
        Self::with_client(crate::SoapClient::with_transport(transport))
    }

    /// Wrap an existing async client; the transport is shared with it
    pub fn with_client(inner: crate::SoapClient) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, runtime })
    }

    /// The wrapped async client
    pub fn inner(&self) -> &crate::SoapClient {
        &self.inner
    }

    /// See [`crate::SoapClient::post`]
    pub fn post(&self, endpoint: impl IntoEndpoint, message: SoapMessage) -> Result<SoapResponse> {
        self.runtime.block_on(self.inner.post(endpoint, message))
    }

    /// See [`crate::SoapClient::post_with_cancellation`]
    pub fn post_with_cancellation(
        &self,
        endpoint: impl IntoEndpoint,
        message: SoapMessage,
        cancel: &CancellationToken,
    ) -> Result<SoapResponse> {
        self.runtime
            .block_on(self.inner.post_with_cancellation(endpoint, message, cancel))
    }

    /// See [`crate::SoapClient::post_body`]
    pub fn post_body(
        &self,
        endpoint: impl IntoEndpoint,
        version: SoapVersion,
        body: Element,
        action: Option<&str>,
    ) -> Result<SoapResponse> {
        self.runtime
            .block_on(self.inner.post_body(endpoint, version, body, action))
    }

    /// See [`crate::SoapClient::post_object`]
    pub fn post_object<B: Serialize + ?Sized>(
        &self,
        endpoint: impl IntoEndpoint,
        version: SoapVersion,
        body: &B,
        action: Option<&str>,
    ) -> Result<SoapResponse> {
        self.runtime
            .block_on(self.inner.post_object(endpoint, version, body, action))
    }
}
