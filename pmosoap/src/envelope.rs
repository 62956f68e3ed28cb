//! Construction of SOAP envelopes
//!
//! The envelope is an `xmltree` tree: `Envelope`, an optional `Header` and a
//! mandatory `Body`, all three qualified with the protocol namespace under the
//! `soapenv` prefix. Caller fragments are moved in, in the order given; the
//! only change made to them is declaring namespaces they use without binding.

use crate::error::{Result, SoapError};
use xmltree::{Element, EmitterConfig, Namespace, XMLNode};

/// Prefix bound to the envelope namespace on the root element
pub const ENVELOPE_PREFIX: &str = "soapenv";

/// A SOAP envelope ready to be serialized
#[derive(Debug, Clone)]
pub struct SoapEnvelope {
    root: Element,
}

impl SoapEnvelope {
    /// Build an envelope from body and header fragments
    ///
    /// # Arguments
    ///
    /// * `namespace_uri` - Envelope namespace (see [`MessageConfiguration`](crate::MessageConfiguration))
    /// * `bodies` - Body fragments, at least one
    /// * `headers` - Header fragments; when empty no `Header` element is emitted
    ///
    /// # Errors
    ///
    /// Returns [`SoapError::InvalidArgument`] when `bodies` is empty.
    pub fn build<B, H>(namespace_uri: &str, bodies: B, headers: H) -> Result<Self>
    where
        B: IntoIterator<Item = Element>,
        H: IntoIterator<Item = Element>,
    {
        let bodies: Vec<Element> = bodies.into_iter().collect();
        if bodies.is_empty() {
            return Err(SoapError::invalid_argument(
                "bodies cannot be empty, a SOAP message needs at least one body element",
            ));
        }
        let headers: Vec<Element> = headers.into_iter().collect();

        // Envelope
        let mut envelope = soap_element("Envelope", namespace_uri);
        let mut namespaces = Namespace::empty();
        namespaces.put(ENVELOPE_PREFIX, namespace_uri);
        envelope.namespaces = Some(namespaces);

        // Header, seulement s'il y a du contenu
        if !headers.is_empty() {
            envelope
                .children
                .push(XMLNode::Element(wrap("Header", namespace_uri, headers)));
        }

        // Body
        envelope
            .children
            .push(XMLNode::Element(wrap("Body", namespace_uri, bodies)));

        Ok(Self { root: envelope })
    }

    /// Envelope namespace URI
    pub fn namespace_uri(&self) -> &str {
        self.root.namespace.as_deref().unwrap_or_default()
    }

    /// The `Header` element, if any header fragment was supplied
    pub fn header(&self) -> Option<&Element> {
        self.soap_child("Header")
    }

    /// The `Body` element
    pub fn body(&self) -> Option<&Element> {
        self.soap_child("Body")
    }

    /// Header fragments in insertion order
    pub fn header_fragments(&self) -> impl Iterator<Item = &Element> {
        self.header().into_iter().flat_map(child_elements)
    }

    /// Body fragments in insertion order
    pub fn body_fragments(&self) -> impl Iterator<Item = &Element> {
        self.body().into_iter().flat_map(child_elements)
    }

    /// Root `Envelope` element
    pub fn as_element(&self) -> &Element {
        &self.root
    }

    pub fn into_element(self) -> Element {
        self.root
    }

    /// Serialize the envelope as compact UTF-8 XML, without XML declaration
    pub fn to_xml(&self) -> Result<String> {
        let mut buf = Vec::new();
        let config = EmitterConfig::new()
            .write_document_declaration(false)
            .perform_indent(false);
        self.root.write_with_config(&mut buf, config)?;

        String::from_utf8(buf)
            .map_err(|e| SoapError::serialization(format!("envelope is not valid UTF-8: {}", e)))
    }

    fn soap_child(&self, name: &str) -> Option<&Element> {
        child_elements(&self.root)
            .find(|e| e.name == name && e.namespace == self.root.namespace)
    }
}

/// Parse an XML fragment from text
///
/// ```
/// let body = pmosoap::fragment(r#"<getAllObjects xmlns="http://helio.spdf.gsfc.nasa.gov/"/>"#)?;
/// assert_eq!(body.name, "getAllObjects");
/// # Ok::<(), pmosoap::SoapError>(())
/// ```
pub fn fragment(xml: &str) -> Result<Element> {
    Ok(Element::parse(xml.as_bytes())?)
}

fn soap_element(name: &str, namespace_uri: &str) -> Element {
    let mut element = Element::new(name);
    element.prefix = Some(ENVELOPE_PREFIX.to_string());
    element.namespace = Some(namespace_uri.to_string());
    element
}

fn wrap(name: &str, namespace_uri: &str, fragments: Vec<Element>) -> Element {
    let mut element = soap_element(name, namespace_uri);
    let mut scope = vec![(ENVELOPE_PREFIX.to_string(), namespace_uri.to_string())];
    element
        .children
        .extend(fragments.into_iter().map(|mut fragment| {
            bind_namespaces(&mut fragment, &mut scope);
            XMLNode::Element(fragment)
        }));
    element
}

/// Déclare les namespaces utilisés par un fragment mais jamais liés
///
/// xmltree n'écrit que `Element::namespaces`. Seules des déclarations sont
/// ajoutées : noms, préfixes et namespaces restent inchangés.
fn bind_namespaces(element: &mut Element, scope: &mut Vec<(String, String)>) {
    let mark = scope.len();

    if let Some(namespaces) = &element.namespaces {
        for (prefix, uri) in namespaces {
            scope.push((prefix.to_string(), uri.to_string()));
        }
    }

    if let Some(uri) = element.namespace.clone() {
        let prefix = element.prefix.clone().unwrap_or_default();
        let bound = scope
            .iter()
            .rev()
            .find(|(p, _)| *p == prefix)
            .map(|(_, u)| u.as_str());

        if bound != Some(uri.as_str()) {
            element
                .namespaces
                .get_or_insert_with(Namespace::empty)
                .put(prefix.clone(), uri.clone());
            scope.push((prefix, uri));
        }
    }

    for child in element.children.iter_mut() {
        if let XMLNode::Element(child) = child {
            bind_namespaces(child, scope);
        }
    }

    scope.truncate(mark);
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(XMLNode::as_element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{SOAP11_NAMESPACE, SOAP12_NAMESPACE};

    fn names<'a>(elements: impl Iterator<Item = &'a Element>) -> Vec<String> {
        elements.map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_build_body_only() {
        let envelope =
            SoapEnvelope::build(SOAP11_NAMESPACE, vec![Element::new("FakeMethod")], vec![])
                .unwrap();

        assert_eq!(envelope.namespace_uri(), SOAP11_NAMESPACE);
        assert!(envelope.header().is_none());
        assert_eq!(names(envelope.body_fragments()), vec!["FakeMethod"]);

        let root = envelope.as_element();
        assert_eq!(root.name, "Envelope");
        assert_eq!(root.prefix.as_deref(), Some("soapenv"));
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_build_keeps_order() {
        let bodies = vec![
            Element::new("Second"),
            Element::new("First"),
            Element::new("Second"),
        ];
        let headers = vec![Element::new("Auth"), Element::new("Trace")];

        let envelope = SoapEnvelope::build(SOAP12_NAMESPACE, bodies, headers).unwrap();

        assert_eq!(
            names(envelope.body_fragments()),
            vec!["Second", "First", "Second"]
        );
        assert_eq!(names(envelope.header_fragments()), vec!["Auth", "Trace"]);

        // Header précède Body
        let children = names(envelope.as_element().children.iter().filter_map(XMLNode::as_element));
        assert_eq!(children, vec!["Header", "Body"]);
    }

    #[test]
    fn test_build_empty_bodies() {
        for namespace in [SOAP11_NAMESPACE, SOAP12_NAMESPACE] {
            let err = SoapEnvelope::build(namespace, Vec::new(), vec![Element::new("H")])
                .unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn test_to_xml() {
        let envelope = SoapEnvelope::build(
            SOAP12_NAMESPACE,
            vec![Element::new("FakeMethod")],
            vec![Element::new("FakeHeader")],
        )
        .unwrap();

        let xml = envelope.to_xml().unwrap();

        assert!(!xml.starts_with("<?xml"));
        assert!(xml.starts_with("<soapenv:Envelope"));
        assert!(xml.contains("xmlns:soapenv=\"http://www.w3.org/2003/05/soap-envelope\""));
        assert_eq!(xml.matches("xmlns:soapenv=").count(), 1);
        assert!(xml.contains("<soapenv:Header>"));
        assert!(xml.contains("<soapenv:Body>"));
        assert!(xml.find("FakeHeader").unwrap() < xml.find("FakeMethod").unwrap());
    }

    #[test]
    fn test_to_xml_reparses() {
        let body = fragment(r#"<u:Play xmlns:u="urn:test"><Speed>1</Speed></u:Play>"#).unwrap();
        let envelope = SoapEnvelope::build(SOAP11_NAMESPACE, vec![body], vec![]).unwrap();

        let parsed = Element::parse(envelope.to_xml().unwrap().as_bytes()).unwrap();
        assert_eq!(parsed.name, "Envelope");
        assert_eq!(parsed.namespace.as_deref(), Some(SOAP11_NAMESPACE));

        let body = parsed.get_child("Body").unwrap();
        let play = body.get_child("Play").unwrap();
        assert_eq!(play.namespace.as_deref(), Some("urn:test"));
        assert_eq!(
            play.get_child("Speed").unwrap().get_text().as_deref(),
            Some("1")
        );
    }

    fn qualified(name: &str, prefix: Option<&str>, namespace: &str) -> Element {
        let mut element = Element::new(name);
        element.prefix = prefix.map(str::to_string);
        element.namespace = Some(namespace.to_string());
        element
    }

    fn reparse(envelope: &SoapEnvelope) -> Element {
        Element::parse(envelope.to_xml().unwrap().as_bytes()).unwrap()
    }

    #[test]
    fn test_undeclared_default_namespace_is_bound() {
        let mut ping = qualified("Ping", None, "urn:ping");
        ping.children
            .push(XMLNode::Element(qualified("Speed", None, "urn:ping")));

        let envelope = SoapEnvelope::build(SOAP11_NAMESPACE, vec![ping], vec![]).unwrap();

        // Une seule déclaration, héritée par Speed
        let xml = envelope.to_xml().unwrap();
        assert_eq!(xml.matches("xmlns=\"urn:ping\"").count(), 1);

        let parsed = reparse(&envelope);
        let ping = parsed.get_child("Body").unwrap().get_child("Ping").unwrap();
        assert_eq!(ping.namespace.as_deref(), Some("urn:ping"));
        assert_eq!(ping.prefix, None);
        assert_eq!(
            ping.get_child("Speed").unwrap().namespace.as_deref(),
            Some("urn:ping")
        );
    }

    #[test]
    fn test_undeclared_prefix_is_bound() {
        let body = qualified("Ping", Some("m"), "urn:m");
        let header = qualified("Trace", Some("t"), "urn:trace");

        let envelope =
            SoapEnvelope::build(SOAP12_NAMESPACE, vec![body], vec![header]).unwrap();

        let xml = envelope.to_xml().unwrap();
        assert!(xml.contains("xmlns:m=\"urn:m\""));
        assert!(xml.contains("xmlns:t=\"urn:trace\""));

        let parsed = reparse(&envelope);
        let ping = parsed.get_child("Body").unwrap().get_child("Ping").unwrap();
        assert_eq!(ping.prefix.as_deref(), Some("m"));
        assert_eq!(ping.namespace.as_deref(), Some("urn:m"));

        let trace = parsed.get_child("Header").unwrap().get_child("Trace").unwrap();
        assert_eq!(trace.namespace.as_deref(), Some("urn:trace"));
    }

    #[test]
    fn test_envelope_prefix_reused_by_fragment() {
        let body = qualified("Ping", Some(ENVELOPE_PREFIX), "urn:other");

        let envelope = SoapEnvelope::build(SOAP11_NAMESPACE, vec![body], vec![]).unwrap();

        let parsed = reparse(&envelope);
        assert_eq!(parsed.namespace.as_deref(), Some(SOAP11_NAMESPACE));
        let ping = parsed.get_child("Body").unwrap().get_child("Ping").unwrap();
        assert_eq!(ping.namespace.as_deref(), Some("urn:other"));
    }

    #[test]
    fn test_declared_namespaces_are_not_repeated() {
        let body = fragment(r#"<u:Play xmlns:u="urn:test"><u:Speed>1</u:Speed></u:Play>"#).unwrap();
        let envelope = SoapEnvelope::build(SOAP11_NAMESPACE, vec![body], vec![]).unwrap();

        let xml = envelope.to_xml().unwrap();
        assert_eq!(xml.matches("xmlns:u=").count(), 1);
    }

    #[test]
    fn test_fragment_parse_error() {
        assert!(matches!(
            fragment("<unclosed>"),
            Err(SoapError::XmlParse(_))
        ));
    }
}
