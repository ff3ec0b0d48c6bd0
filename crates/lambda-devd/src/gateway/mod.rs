//! Request handling from match to translated response.
//!
//! [`Gateway::handle`] runs each request through the same linear sequence:
//! match the route, build the envelope, dispatch it, translate the output.
//! Any failure along the way becomes a 502 response carrying the error's
//! message, so a request can never take the server down.

mod errors;
mod request;

use std::sync::Arc;

use lambda_dev_config::Config;
use lambda_dev_invoker::InvocationExecutor;
use tracing::{debug, warn};

pub use self::errors::GatewayError;
pub use self::request::{ERROR_STATUS, GatewayRequest, GatewayResponse};

use crate::dispatch::{Dispatcher, RuntimeSettings};
use crate::event::build_envelope;
use crate::routing::RouteTable;
use crate::translate::translate;

const GATEWAY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::gateway");

/// Immutable request handler shared by every connection.
#[derive(Debug, Clone)]
pub struct Gateway {
    routes: RouteTable,
    dispatcher: Dispatcher,
}

impl Gateway {
    /// Builds a gateway from its parts.
    #[must_use]
    pub const fn new(routes: RouteTable, dispatcher: Dispatcher) -> Self {
        Self { routes, dispatcher }
    }

    /// Builds a gateway from configuration, invoking functions through
    /// `executor`.
    #[must_use]
    pub fn from_config(config: &Config, executor: Arc<dyn InvocationExecutor>) -> Self {
        Self::new(
            RouteTable::from_declarations(&config.routes),
            Dispatcher::new(RuntimeSettings::from_config(config), executor),
        )
    }

    /// Configured routes.
    #[must_use]
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Serves one request. Blocks while the function runs.
    #[must_use]
    pub fn handle(&self, request: GatewayRequest) -> GatewayResponse {
        let method = request.method.clone();
        let path = request.path.clone();
        match self.try_handle(request) {
            Ok(response) => response,
            Err(error) => {
                warn!(
                    target: GATEWAY_TARGET,
                    method = %method,
                    path = %path,
                    kind = error.kind(),
                    error = %error,
                    "responding with gateway error"
                );
                error.to_response()
            }
        }
    }

    /// Serves one request, surfacing failures as [`GatewayError`] values.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RouteNotFound`] when no route matches,
    /// [`GatewayError::InvokerFailure`] when the function cannot be run and
    /// the translation errors described on
    /// [`translate`](crate::translate::translate).
    pub fn try_handle(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let Some(matched) = self.routes.match_route(&request.method, &request.path) else {
            return Err(GatewayError::RouteNotFound {
                method: request.method,
                path: request.path,
            });
        };
        debug!(
            target: GATEWAY_TARGET,
            method = %request.method,
            path = %request.path,
            template = matched.template.as_str(),
            handler = matched.handler,
            "route matched"
        );

        let (envelope, variant) = build_envelope(request, matched.template);
        let raw = self.dispatcher.dispatch(matched.handler, &envelope, variant)?;
        translate(&raw)
    }
}

#[cfg(test)]
mod tests;
