//! Error types for the SOAP client

/// Result type alias for SOAP operations
pub type Result<T> = std::result::Result<T, SoapError>;

/// Errors that can occur when building or sending a SOAP call
///
/// HTTP status codes are never turned into errors: a `500` carrying a SOAP
/// fault is returned to the caller as a normal [`SoapResponse`](crate::SoapResponse).
#[derive(Debug, thiserror::Error)]
pub enum SoapError {
    /// The caller supplied an argument the call cannot be built from
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP request failed in the default transport
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A custom transport reported a failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call was cancelled before the transport completed
    #[error("SOAP call cancelled")]
    Cancelled,

    /// Envelope could not be written as XML
    #[error("XML write error: {0}")]
    Xml(#[from] xmltree::Error),

    /// An XML fragment could not be parsed
    #[error("XML parse error: {0}")]
    XmlParse(#[from] xmltree::ParseError),

    /// An object could not be serialized into an XML element
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Configuration error (from pmoconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// The blocking runtime could not be started
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl SoapError {
    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a transport error for custom [`Transport`](crate::Transport) implementations
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Vérifie si l'appel a été annulé
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SoapError::Cancelled)
    }

    /// Vérifie si l'erreur provient d'un argument invalide
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SoapError::InvalidArgument(_))
    }

    /// Whether the failure happened on the network side
    pub fn is_transport(&self) -> bool {
        matches!(self, SoapError::Http(_) | SoapError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(SoapError::Cancelled.is_cancelled());
        assert!(!SoapError::Cancelled.is_transport());

        let err = SoapError::invalid_argument("bodies cannot be empty");
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Invalid argument: bodies cannot be empty");

        let err = SoapError::transport("connection reset");
        assert!(err.is_transport());
        assert!(!err.is_cancelled());
    }
}
