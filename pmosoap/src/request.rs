//! Assembly of the HTTP request carrying a SOAP envelope
//!
//! The SOAP action travels differently depending on the protocol version:
//!
//! - SOAP 1.1: `SOAPAction: <action>` request header
//! - SOAP 1.2: `action="<action>"` parameter of the `Content-Type` header
//!
//! Never both, and nothing at all when no action is given.

use crate::configuration::{MessageConfiguration, SOAP_CHARSET};
use crate::error::{Result, SoapError};
use crate::version::SoapVersion;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

/// Name of the SOAP 1.1 action header
pub const SOAP_ACTION_HEADER: &str = "SOAPAction";

/// Name of the SOAP 1.2 content-type parameter carrying the action
pub const ACTION_PARAMETER: &str = "action";

/// An HTTP POST request ready to be handed to a [`Transport`](crate::Transport)
#[derive(Debug, Clone)]
pub struct SoapRequest {
    endpoint: Url,
    version: SoapVersion,
    body: String,
    media_type: &'static str,
    content_type: String,
    action: Option<String>,
    headers: HeaderMap,
}

impl SoapRequest {
    /// Assemble a request from a serialized envelope
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Target URL
    /// * `envelope` - Envelope text, sent as UTF-8
    /// * `config` - Configuration of the protocol version
    /// * `action` - Optional SOAP action
    ///
    /// # Errors
    ///
    /// Returns [`SoapError::InvalidArgument`] when the action cannot be carried
    /// in an HTTP header (control characters, or a double quote for SOAP 1.2).
    pub fn assemble(
        endpoint: Url,
        envelope: String,
        config: &MessageConfiguration,
        action: Option<&str>,
    ) -> Result<Self> {
        let mut content_type = format!("{}; charset={}", config.media_type(), SOAP_CHARSET);
        let mut headers = HeaderMap::new();

        if let Some(action) = action {
            match config.version() {
                SoapVersion::Soap11 => {
                    let value = HeaderValue::from_str(action).map_err(|_| {
                        SoapError::invalid_argument(format!(
                            "SOAP action '{}' is not a valid header value",
                            action.escape_debug()
                        ))
                    })?;
                    headers.insert(HeaderName::from_static("soapaction"), value);
                }
                SoapVersion::Soap12 => {
                    if action.contains('"') {
                        return Err(SoapError::invalid_argument(format!(
                            "SOAP action '{}' cannot contain a double quote",
                            action
                        )));
                    }
                    content_type.push_str(&format!("; {}=\"{}\"", ACTION_PARAMETER, action));
                }
            }
        }

        // Le Content-Type doit rester un header HTTP valide
        HeaderValue::from_str(&content_type).map_err(|_| {
            SoapError::invalid_argument(format!(
                "content type '{}' is not a valid header value",
                content_type.escape_debug()
            ))
        })?;

        Ok(Self {
            endpoint,
            version: config.version(),
            body: envelope,
            media_type: config.media_type(),
            content_type,
            action: action.map(str::to_string),
            headers,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn version(&self) -> SoapVersion {
        self.version
    }

    /// Envelope text
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Body bytes as sent on the wire
    pub fn into_body(self) -> Vec<u8> {
        self.body.into_bytes()
    }

    /// Media type without parameters
    pub fn media_type(&self) -> &str {
        self.media_type
    }

    pub fn charset(&self) -> &'static str {
        SOAP_CHARSET
    }

    /// Full `Content-Type` value, parameters included
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Extra request headers (everything but `Content-Type`)
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAKE_ENDPOINT: &str = "https://example.com/soap";
    const FAKE_ACTION: &str = "https://example.com/soap/action";

    fn assemble(version: SoapVersion, action: Option<&str>) -> Result<SoapRequest> {
        SoapRequest::assemble(
            Url::parse(FAKE_ENDPOINT).unwrap(),
            "<soapenv:Envelope/>".to_string(),
            &MessageConfiguration::resolve(version),
            action,
        )
    }

    #[test]
    fn test_soap11_without_action() {
        let request = assemble(SoapVersion::Soap11, None).unwrap();
        assert_eq!(request.content_type(), "text/xml; charset=utf-8");
        assert_eq!(request.media_type(), "text/xml");
        assert_eq!(request.charset(), "utf-8");
        assert!(request.headers().is_empty());
        assert!(request.action().is_none());
    }

    #[test]
    fn test_soap11_action_header() {
        let request = assemble(SoapVersion::Soap11, Some(FAKE_ACTION)).unwrap();
        assert_eq!(request.content_type(), "text/xml; charset=utf-8");
        assert_eq!(
            request.headers().get(SOAP_ACTION_HEADER).unwrap(),
            FAKE_ACTION
        );
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn test_soap12_without_action() {
        let request = assemble(SoapVersion::Soap12, None).unwrap();
        assert_eq!(request.content_type(), "application/soap+xml; charset=utf-8");
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_soap12_action_parameter() {
        let request = assemble(SoapVersion::Soap12, Some(FAKE_ACTION)).unwrap();
        assert_eq!(
            request.content_type(),
            "application/soap+xml; charset=utf-8; action=\"https://example.com/soap/action\""
        );
        assert!(request.headers().get(SOAP_ACTION_HEADER).is_none());
        assert_eq!(request.action(), Some(FAKE_ACTION));
    }

    #[test]
    fn test_invalid_actions() {
        let err = assemble(SoapVersion::Soap11, Some("bad\r\naction")).unwrap_err();
        assert!(err.is_invalid_argument());

        let err = assemble(SoapVersion::Soap12, Some("say \"hi\"")).unwrap_err();
        assert!(err.is_invalid_argument());

        let err = assemble(SoapVersion::Soap12, Some("bad\naction")).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_body_bytes() {
        let request = assemble(SoapVersion::Soap11, None).unwrap();
        assert_eq!(request.body(), "<soapenv:Envelope/>");
        assert_eq!(request.endpoint().as_str(), FAKE_ENDPOINT);
        assert_eq!(request.into_body(), b"<soapenv:Envelope/>".to_vec());
    }
}
