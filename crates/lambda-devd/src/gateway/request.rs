//! Transport-neutral request and response shapes.

use std::collections::BTreeMap;

/// HTTP status used for every locally detected failure.
pub const ERROR_STATUS: u16 = 502;

/// An inbound request as delivered by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayRequest {
    /// Uppercase HTTP method.
    pub method: String,
    /// Raw request path, without the query string.
    pub path: String,
    /// Decoded query pairs in arrival order.
    pub query: Vec<(String, String)>,
    /// Header pairs in arrival order, names lowercase.
    pub headers: Vec<(String, String)>,
    /// Request body as text; empty when none was sent.
    pub body: String,
}

impl GatewayRequest {
    /// Creates a request with no query, headers or body.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Appends a query pair.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Status, headers and body to send back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    /// HTTP status code, within `100..=999`.
    pub status: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Response body.
    pub body: String,
}

impl GatewayResponse {
    /// Builds a response.
    #[must_use]
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Builds the fixed-shape failure response: status 502, no headers and
    /// `message` as the body.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ERROR_STATUS, BTreeMap::new(), message)
    }
}
