//! HTTP front end built on axum.
//!
//! Every method and path is routed to a single fallback handler that converts
//! the request into a [`GatewayRequest`], runs [`Gateway::handle`] on the
//! blocking pool and renders the [`GatewayResponse`].

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::Response;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::gateway::{Gateway, GatewayRequest, GatewayResponse};

const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// Builds the router serving every request through `gateway`.
#[must_use]
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new().fallback(handle_request).with_state(gateway)
}

/// Serves `router` on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns the I/O error that stopped the accept loop.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn handle_request(
    State(gateway): State<Arc<Gateway>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = gateway_request(&method, &uri, &headers, &body);
    let path = request.path.clone();
    let response = match tokio::task::spawn_blocking(move || gateway.handle(request)).await {
        Ok(response) => response,
        Err(error) => {
            warn!(
                target: TRANSPORT_TARGET,
                method = %method,
                path = %path,
                error = %error,
                "request handler did not complete"
            );
            GatewayResponse::error(format!("Request handler did not complete: {error}"))
        }
    };
    info!(
        target: TRANSPORT_TARGET,
        method = %method,
        path = %path,
        status = response.status,
        "request completed"
    );
    http_response(response)
}

/// Converts the parts of an axum request into a [`GatewayRequest`].
///
/// The body is decoded lossily as UTF-8. Query pairs are percent-decoded in
/// arrival order and header values that are not visible ASCII are decoded
/// lossily.
#[must_use]
pub fn gateway_request(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &[u8],
) -> GatewayRequest {
    let query = uri
        .query()
        .map(|raw| {
            url::form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();
    let header_pairs = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    GatewayRequest {
        method: method.as_str().to_owned(),
        path: uri.path().to_owned(),
        query,
        headers: header_pairs,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

/// Renders a [`GatewayResponse`] as an axum response.
///
/// Headers whose name or value HTTP cannot carry are skipped with a warning.
#[must_use]
pub fn http_response(response: GatewayResponse) -> Response {
    let GatewayResponse {
        status,
        headers,
        body,
    } = response;
    let status_code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut rendered = Response::new(Body::from(body));
    *rendered.status_mut() = status_code;
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(header_name), Ok(header_value)) => {
                rendered.headers_mut().append(header_name, header_value);
            }
            _ => warn!(
                target: TRANSPORT_TARGET,
                header = %name,
                "skipping response header that HTTP cannot carry"
            ),
        }
    }
    rendered
}
