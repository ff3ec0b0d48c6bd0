//! Canonical invocation event built from a matched request.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::gateway::GatewayRequest;
use crate::routing::PathTemplate;

/// Header whose presence selects the build image. It never reaches the
/// function.
pub const BUILD_MARKER_HEADER: &str = "x-docker-built";

/// Value of the envelope's `resource` field.
pub const PROXY_RESOURCE: &str = "/{proxy+}";

/// Runtime image flavour requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageVariant {
    /// The plain runtime image.
    #[default]
    Runtime,
    /// The image with build tooling installed.
    Build,
}

/// Event handed to the function as its single JSON argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEnvelope {
    /// Raw request body, never decoded.
    pub body: String,
    /// Always [`PROXY_RESOURCE`].
    pub resource: String,
    /// Request path as received.
    pub path: String,
    /// Uppercase HTTP method.
    pub http_method: String,
    /// Always `false`.
    pub is_base64_encoded: bool,
    /// Query parameters; the last value wins for repeated keys.
    pub query_string_parameters: BTreeMap<String, String>,
    /// Values captured by the template's parameter segments.
    pub path_parameters: BTreeMap<String, String>,
    /// Request headers without the build marker; the last value wins for
    /// repeated names.
    pub headers: BTreeMap<String, String>,
}

/// Builds the envelope for `request` matched against `template`.
///
/// The build marker header is consumed here: its presence selects
/// [`ImageVariant::Build`] and it is left out of the envelope's headers.
/// Everything else is copied verbatim.
#[must_use]
pub fn build_envelope(
    request: GatewayRequest,
    template: &PathTemplate,
) -> (InvocationEnvelope, ImageVariant) {
    let GatewayRequest {
        method,
        path,
        query,
        headers,
        body,
    } = request;

    let mut variant = ImageVariant::Runtime;
    let mut header_map = BTreeMap::new();
    for (name, value) in headers {
        if name.eq_ignore_ascii_case(BUILD_MARKER_HEADER) {
            variant = ImageVariant::Build;
        } else {
            header_map.insert(name, value);
        }
    }

    let envelope = InvocationEnvelope {
        body,
        resource: String::from(PROXY_RESOURCE),
        path_parameters: template.capture(&path),
        path,
        http_method: method,
        is_base64_encoded: false,
        query_string_parameters: query.into_iter().collect(),
        headers: header_map,
    };
    (envelope, variant)
}
