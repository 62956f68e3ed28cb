//! Object to XML element serialization

use crate::envelope::fragment;
use crate::error::{Result, SoapError};
use serde::Serialize;
use xmltree::Element;

/// Converts an arbitrary value into an XML element
///
/// The mapping of fields to elements and attributes belongs to the
/// implementation; the SOAP client only wraps the resulting element.
pub trait XmlSerializer {
    fn to_element<T: Serialize + ?Sized>(&self, value: &T) -> Result<Element>;
}

/// [`XmlSerializer`] using the serde support of `quick-xml`
///
/// The root element is named after the type (or its `#[serde(rename)]`);
/// fields renamed with a leading `@` become attributes, which is how a payload
/// declares its namespace:
///
/// ```
/// use pmosoap::{QuickXmlSerializer, XmlSerializer};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct GetWeather {
///     #[serde(rename = "@xmlns")]
///     xmlns: &'static str,
///     city: String,
/// }
///
/// let element = QuickXmlSerializer.to_element(&GetWeather {
///     xmlns: "http://example.com/weather",
///     city: "Grenoble".to_string(),
/// })?;
/// assert_eq!(element.name, "GetWeather");
/// assert_eq!(element.namespace.as_deref(), Some("http://example.com/weather"));
/// # Ok::<(), pmosoap::SoapError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickXmlSerializer;

impl XmlSerializer for QuickXmlSerializer {
    fn to_element<T: Serialize + ?Sized>(&self, value: &T) -> Result<Element> {
        let xml = quick_xml::se::to_string(value)
            .map_err(|e| SoapError::serialization(e.to_string()))?;
        fragment(&xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct FakeMethod;

    #[derive(Serialize)]
    #[serde(rename = "Login")]
    struct Credentials {
        #[serde(rename = "@realm")]
        realm: String,
        user: String,
        password: String,
    }

    #[test]
    fn test_unit_struct() {
        let element = QuickXmlSerializer.to_element(&FakeMethod).unwrap();
        assert_eq!(element.name, "FakeMethod");
        assert!(element.children.is_empty());
    }

    #[test]
    fn test_struct_fields() {
        let element = QuickXmlSerializer
            .to_element(&Credentials {
                realm: "intranet".to_string(),
                user: "alice".to_string(),
                password: "s3cret".to_string(),
            })
            .unwrap();

        assert_eq!(element.name, "Login");
        assert_eq!(
            element.attributes.get("realm").map(String::as_str),
            Some("intranet")
        );
        assert_eq!(
            element.get_child("user").unwrap().get_text().as_deref(),
            Some("alice")
        );
        assert_eq!(
            element.get_child("password").unwrap().get_text().as_deref(),
            Some("s3cret")
        );
    }

    #[test]
    fn test_unsupported_value() {
        // Un scalaire seul n'a pas de nom d'élément racine
        let err = QuickXmlSerializer.to_element(&42u32).unwrap_err();
        assert!(matches!(
            err,
            SoapError::Serialization(_) | SoapError::XmlParse(_)
        ));
    }
}
