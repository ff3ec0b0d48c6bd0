//! Local development gateway for Lambda-style functions.
//!
//! `lambda-devd` accepts HTTP requests, matches each one against a table of
//! method and path templates, and runs the matched handler once in a
//! throwaway `lambci/lambda` container. The request travels to the function
//! as an API Gateway style proxy event; the function's printed JSON becomes
//! the HTTP response.
//!
//! The request path is split into stages, each in its own module:
//!
//! 1. [`routing`] finds the first route matching the method and path.
//! 2. [`event`] builds the [`InvocationEnvelope`](event::InvocationEnvelope)
//!    and decides which image variant to run.
//! 3. [`dispatch`] serialises the envelope and hands it to an
//!    [`InvocationExecutor`](lambda_dev_invoker::InvocationExecutor).
//! 4. [`translate`] validates the output and builds the response.
//!
//! [`gateway`] strings the stages together and turns every failure into a
//! 502 response. [`transport`] exposes the gateway over HTTP with axum.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lambda_devd::{
//!     StructuredHealthReporter, SystemConfigLoader, bootstrap_with, docker_executor,
//!     shutdown_signal,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let daemon = bootstrap_with(
//!     &SystemConfigLoader,
//!     Arc::new(StructuredHealthReporter::new()),
//!     docker_executor,
//! )?;
//! daemon.serve(shutdown_signal()).await?;
//! # Ok(())
//! # }
//! ```

mod bootstrap;
pub mod dispatch;
pub mod event;
pub mod gateway;
mod health;
pub mod routing;
mod telemetry;
pub mod translate;
pub mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, ServeError, StaticConfigLoader, SystemConfigLoader,
    bootstrap_with, docker_executor, shutdown_signal,
};
pub use gateway::{Gateway, GatewayError, GatewayRequest, GatewayResponse};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
