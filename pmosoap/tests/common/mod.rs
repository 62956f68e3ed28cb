//! Shared fixtures for pmosoap integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use pmosoap::{Element, Result, SoapRequest, SoapResponse, Transport};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const FAKE_ENDPOINT: &str = "https://example.com/soap";
pub const FAKE_ACTION: &str = "https://example.com/soap/action";

pub const FAKE_REQUEST_NO_HEADER: &str = r#"
    <soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
        <soapenv:Body>
            <FakeMethod />
        </soapenv:Body>
    </soapenv:Envelope>"#;

pub const FAKE_REQUEST_WITH_HEADER: &str = r#"
    <soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
        <soapenv:Header>
            <FakeHeader />
        </soapenv:Header>
        <soapenv:Body>
            <FakeMethod />
        </soapenv:Body>
    </soapenv:Envelope>"#;

/// A request as seen by the transport
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: Url,
    pub content_type: String,
    pub headers: HeaderMap,
    pub body: String,
}

/// Transport keeping every call it receives
#[derive(Debug)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    status: StatusCode,
    delay: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Self::build(StatusCode::OK, None)
    }

    pub fn with_status(status: u16) -> Arc<Self> {
        Self::build(StatusCode::from_u16(status).unwrap(), None)
    }

    /// Transport that takes `delay` before answering
    pub fn slow(delay: Duration) -> Arc<Self> {
        Self::build(StatusCode::OK, Some(delay))
    }

    fn build(status: StatusCode, delay: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            status,
            delay,
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn single_call(&self) -> RecordedCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call");
        calls.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: SoapRequest) -> Result<SoapResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: request.endpoint().clone(),
            content_type: request.content_type().to_string(),
            headers: request.headers().clone(),
            body: request.body().to_string(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(SoapResponse::new(
            self.status,
            HeaderMap::new(),
            b"<ok/>".to_vec(),
        ))
    }
}

/// Media type part of a content type
pub fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

/// Value of a content type parameter, as written (quotes kept)
pub fn content_type_param(content_type: &str, name: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim().to_string())
}

/// Structure of an element: names, namespaces, attributes, text and children
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<Shape>,
}

pub fn shape(element: &Element) -> Shape {
    Shape {
        namespace: element.namespace.clone(),
        name: element.name.clone(),
        attributes: element
            .attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        text: element
            .get_text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        children: element
            .children
            .iter()
            .filter_map(|node| node.as_element())
            .map(shape)
            .collect(),
    }
}

/// Parse XML text and return its structure
pub fn parse_shape(xml: &str) -> Shape {
    shape(&Element::parse(xml.as_bytes()).unwrap())
}
