//! Caller-side description of one SOAP call

use crate::configuration::MessageConfiguration;
use crate::envelope::SoapEnvelope;
use crate::error::Result;
use crate::request::SoapRequest;
use crate::serializer::{QuickXmlSerializer, XmlSerializer};
use crate::version::SoapVersion;
use serde::Serialize;
use url::Url;
use xmltree::Element;

/// Content of a SOAP call: version, fragments and optional action
///
/// Fragments keep the order in which they were added.
///
/// ```
/// use pmosoap::{SoapMessage, SoapVersion, fragment};
///
/// let message = SoapMessage::new(SoapVersion::Soap12)
///     .with_body(fragment("<GetQuote><Symbol>PMO</Symbol></GetQuote>")?)
///     .with_action("urn:GetQuote");
///
/// assert_eq!(message.bodies.len(), 1);
/// assert!(message.headers.is_empty());
/// # Ok::<(), pmosoap::SoapError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SoapMessage {
    /// Protocol version
    pub version: SoapVersion,

    /// Body fragments, at least one is required to send the message
    pub bodies: Vec<Element>,

    /// Header fragments; none means no `Header` element
    pub headers: Vec<Element>,

    /// SOAP action
    pub action: Option<String>,
}

impl SoapMessage {
    /// Crée un message vide pour une version donnée
    pub fn new(version: SoapVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: Element) -> Self {
        self.bodies.push(body);
        self
    }

    pub fn with_bodies(mut self, bodies: impl IntoIterator<Item = Element>) -> Self {
        self.bodies.extend(bodies);
        self
    }

    pub fn with_header(mut self, header: Element) -> Self {
        self.headers.push(header);
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = Element>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Serialize `value` with [`QuickXmlSerializer`] and add it as a body fragment
    pub fn with_body_object<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        self.with_body_object_using(value, &QuickXmlSerializer)
    }

    /// Serialize `value` with `serializer` and add it as a body fragment
    pub fn with_body_object_using<T, S>(self, value: &T, serializer: &S) -> Result<Self>
    where
        T: Serialize + ?Sized,
        S: XmlSerializer,
    {
        Ok(self.with_body(serializer.to_element(value)?))
    }

    /// Serialize `value` with [`QuickXmlSerializer`] and add it as a header fragment
    pub fn with_header_object<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        self.with_header_object_using(value, &QuickXmlSerializer)
    }

    /// Serialize `value` with `serializer` and add it as a header fragment
    pub fn with_header_object_using<T, S>(self, value: &T, serializer: &S) -> Result<Self>
    where
        T: Serialize + ?Sized,
        S: XmlSerializer,
    {
        Ok(self.with_header(serializer.to_element(value)?))
    }

    /// Build the envelope of this message
    ///
    /// Fails with an invalid-argument error when there is no body fragment.
    pub fn into_envelope(self) -> Result<SoapEnvelope> {
        let config = MessageConfiguration::resolve(self.version);
        SoapEnvelope::build(config.namespace_uri(), self.bodies, self.headers)
    }

    /// Resolve the configuration, build the envelope and assemble the request
    pub fn into_request(self, endpoint: Url) -> Result<SoapRequest> {
        let config = MessageConfiguration::resolve(self.version);
        let envelope = SoapEnvelope::build(config.namespace_uri(), self.bodies, self.headers)?;

        SoapRequest::assemble(endpoint, envelope.to_xml()?, &config, self.action.as_deref())
    }
}
