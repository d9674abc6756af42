use async_trait::async_trait;
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// How the payload is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    UrlEncoded,
    Json,
}

/// Remote operations the onboarding flow calls. Adapters map these to URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Registers the seller and mails a fresh code. Also used to resend.
    Registration,
    VerifyEmailOtp,
}

/// Ordered string pairs sent as a form body or a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload(Vec<(String, String)>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    pub payload: Payload,
    pub encoding: Encoding,
}

impl GatewayRequest {
    pub fn post_form(endpoint: Endpoint, payload: Payload) -> Self {
        Self {
            method: Method::Post,
            endpoint,
            payload,
            encoding: Encoding::UrlEncoded,
        }
    }
}

/// Why a gateway call did not succeed. The controllers treat every variant
/// the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Request could not be built: {0}")]
    InvalidRequest(String),
}

#[async_trait]
pub trait RequestGateway: Send + Sync {
    async fn request(&self, request: GatewayRequest) -> Result<(), GatewayError>;
}
