//! # pmosoap - SOAP over HTTP client
//!
//! This crate sends SOAP 1.1 and SOAP 1.2 calls over HTTP. The caller provides
//! the body (and optionally header) content as XML elements; the crate wraps
//! them in the right envelope, sets the content type and the SOAP action the
//! way the protocol version expects, and POSTs the result. The HTTP response
//! is returned as received: status codes are not interpreted and SOAP faults
//! are not parsed.
//!
//! ## Architecture
//!
//! - [`MessageConfiguration`] : namespace and media type of a [`SoapVersion`]
//! - [`SoapEnvelope`] : `Envelope` / `Header` / `Body` tree
//! - [`SoapRequest`] : HTTP request (content type, `SOAPAction` or `action` parameter)
//! - [`Transport`] : network seam, [`ReqwestTransport`] by default
//! - [`XmlSerializer`] : serde objects to XML elements, [`QuickXmlSerializer`] by default
//! - [`SoapClient`] : async facade, [`blocking::SoapClient`] for sync code
//!
//! ## Wire format
//!
//! ```text
//! POST <endpoint>
//! Content-Type: text/xml; charset=utf-8                     (SOAP 1.1)
//! SOAPAction: <action>                                      (SOAP 1.1, with action)
//! Content-Type: application/soap+xml; charset=utf-8; action="<action>"   (SOAP 1.2)
//!
//! <soapenv:Envelope xmlns:soapenv="<namespace>">
//!   <soapenv:Header>...</soapenv:Header>                    (only with headers)
//!   <soapenv:Body>...</soapenv:Body>
//! </soapenv:Envelope>
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pmosoap::{SoapClient, SoapMessage, SoapVersion, fragment};
//! use pmosoap::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SoapClient::new()?;
//!     let cancel = CancellationToken::new();
//!
//!     let message = SoapMessage::new(SoapVersion::Soap12)
//!         .with_header(fragment("<Trace>42</Trace>")?)
//!         .with_body(fragment(r#"<GetQuote xmlns="urn:quotes"><Symbol>PMO</Symbol></GetQuote>"#)?)
//!         .with_action("urn:quotes/GetQuote");
//!
//!     let response = client
//!         .post_with_cancellation("https://example.com/soap", message, &cancel)
//!         .await?;
//!
//!     println!("{} {}", response.status(), response.text());
//!     Ok(())
//! }
//! ```

pub mod blocking;
pub mod client;
pub mod configuration;
pub mod envelope;
pub mod error;
pub mod message;
pub mod request;
pub mod serializer;
pub mod transport;
pub mod version;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

// Re-exports
pub use client::{IntoEndpoint, SoapCall, SoapClient};
pub use configuration::{
    MessageConfiguration, SOAP_CHARSET, SOAP11_MEDIA_TYPE, SOAP11_NAMESPACE, SOAP12_MEDIA_TYPE,
    SOAP12_NAMESPACE,
};
pub use envelope::{ENVELOPE_PREFIX, SoapEnvelope, fragment};
pub use error::{Result, SoapError};
pub use message::SoapMessage;
pub use request::{ACTION_PARAMETER, SOAP_ACTION_HEADER, SoapRequest};
pub use serializer::{QuickXmlSerializer, XmlSerializer};
pub use transport::{ReqwestTransport, SoapResponse, Transport, TransportBuilder};
pub use version::SoapVersion;

pub use tokio_util::sync::CancellationToken;
pub use xmltree::Element;

#[cfg(feature = "pmoconfig")]
pub use config_ext::SoapConfigExt;
