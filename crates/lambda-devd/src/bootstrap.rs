//! Daemon bootstrap orchestration.

use std::future::Future;
use std::io;
use std::sync::Arc;

use lambda_dev_config::{Config, ConfigError};
use lambda_dev_invoker::{DockerExecutor, InvocationExecutor};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::warn;

use crate::gateway::Gateway;
use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport;

const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bootstrap");

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's [`ConfigError`].
    fn load(&self) -> Result<Config, Arc<ConfigError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<ConfigError>> {
        Config::load().map_err(Arc::new)
    }
}

/// Loader returning a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<ConfigError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<ConfigError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

impl BootstrapError {
    /// Returns the clap error when flag parsing (including `--help`) stopped
    /// the bootstrap.
    #[must_use]
    pub fn cli_error(&self) -> Option<&clap::Error> {
        match self {
            Self::Configuration { source } => source.as_cli(),
            Self::Telemetry { .. } => None,
        }
    }
}

/// Errors raised while serving.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The listener could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Requested `host:port`.
        address: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
    /// The accept loop failed.
    #[error("server failed: {source}")]
    Serve {
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
}

/// A bootstrapped gateway, ready to serve.
pub struct Daemon {
    config: Config,
    gateway: Arc<Gateway>,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Daemon {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Shared request handler.
    #[must_use]
    pub fn gateway(&self) -> Arc<Gateway> {
        Arc::clone(&self.gateway)
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::Bind`] when the address cannot be bound and
    /// [`ServeError::Serve`] when the accept loop fails.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = self.config.listen_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServeError::Bind {
                address: address.clone(),
                source: Arc::new(source),
            })?;
        self.serve_on(listener, shutdown).await
    }

    /// Serves on an already bound `listener` until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::Serve`] when the accept loop fails.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let serve_error = |source: io::Error| ServeError::Serve {
            source: Arc::new(source),
        };
        let local = listener.local_addr().map_err(serve_error)?;
        self.reporter.listener_ready(local);
        transport::serve(listener, transport::router(self.gateway), shutdown)
            .await
            .map_err(serve_error)?;
        self.reporter.shutdown_complete();
        Ok(())
    }
}

/// Builds the production executor for `config`.
#[must_use]
pub fn docker_executor(config: &Config) -> Arc<dyn InvocationExecutor> {
    Arc::new(DockerExecutor::new(config.docker_binary.as_str()))
}

/// Resolves when the process receives Ctrl-C.
///
/// If the signal handler cannot be installed the future never resolves, so
/// the server keeps running.
pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(
            target: BOOTSTRAP_TARGET,
            error = %error,
            "failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
}

/// Bootstraps the daemon using the supplied collaborators.
///
/// `executor` builds the invocation backend from the loaded configuration.
///
/// # Errors
///
/// Returns a [`BootstrapError`] when configuration or telemetry setup fails;
/// the reporter is told about the failure first.
pub fn bootstrap_with<F>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    executor: F,
) -> Result<Daemon, BootstrapError>
where
    F: FnOnce(&Config) -> Arc<dyn InvocationExecutor>,
{
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config.logging) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let gateway = Arc::new(Gateway::from_config(&config, executor(&config)));
    reporter.bootstrap_succeeded(&config);

    Ok(Daemon {
        config,
        gateway,
        telemetry,
        reporter,
    })
}
