//! Per-version message configuration (namespace and media type)

use crate::version::SoapVersion;

/// Envelope namespace for SOAP 1.1
pub const SOAP11_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Envelope namespace for SOAP 1.2
pub const SOAP12_NAMESPACE: &str = "http://www.w3.org/2003/05/soap-envelope";

/// Media type of a SOAP 1.1 request
pub const SOAP11_MEDIA_TYPE: &str = "text/xml";

/// Media type of a SOAP 1.2 request
pub const SOAP12_MEDIA_TYPE: &str = "application/soap+xml";

/// Charset every request body is encoded with
pub const SOAP_CHARSET: &str = "utf-8";

/// Namespace and media type resolved from a [`SoapVersion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageConfiguration {
    version: SoapVersion,
    namespace_uri: &'static str,
    media_type: &'static str,
}

impl MessageConfiguration {
    /// Resolve the configuration of a protocol version
    pub fn resolve(version: SoapVersion) -> Self {
        let (namespace_uri, media_type) = match version {
            SoapVersion::Soap11 => (SOAP11_NAMESPACE, SOAP11_MEDIA_TYPE),
            SoapVersion::Soap12 => (SOAP12_NAMESPACE, SOAP12_MEDIA_TYPE),
        };

        Self {
            version,
            namespace_uri,
            media_type,
        }
    }

    pub fn version(&self) -> SoapVersion {
        self.version
    }

    /// Envelope namespace URI
    pub fn namespace_uri(&self) -> &'static str {
        self.namespace_uri
    }

    /// Media type without parameters
    pub fn media_type(&self) -> &'static str {
        self.media_type
    }
}

impl From<SoapVersion> for MessageConfiguration {
    fn from(version: SoapVersion) -> Self {
        Self::resolve(version)
    }
}
