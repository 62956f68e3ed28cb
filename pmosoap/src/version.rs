//! SOAP protocol versions

use crate::error::{Result, SoapError};
use std::fmt;
use std::str::FromStr;

/// SOAP protocol version used to build a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SoapVersion {
    /// SOAP 1.1 (`text/xml`, `SOAPAction` header)
    #[default]
    Soap11,
    /// SOAP 1.2 (`application/soap+xml`, `action` content-type parameter)
    Soap12,
}

impl SoapVersion {
    /// Version number as written in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            SoapVersion::Soap11 => "1.1",
            SoapVersion::Soap12 => "1.2",
        }
    }
}

impl fmt::Display for SoapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SOAP {}", self.as_str())
    }
}

impl FromStr for SoapVersion {
    type Err = SoapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1.1" | "11" | "soap11" | "soap1.1" | "soap 1.1" => Ok(SoapVersion::Soap11),
            "1.2" | "12" | "soap12" | "soap1.2" | "soap 1.2" => Ok(SoapVersion::Soap12),
            other => Err(SoapError::invalid_argument(format!(
                "unsupported SOAP version '{}'",
                other
            ))),
        }
    }
}
