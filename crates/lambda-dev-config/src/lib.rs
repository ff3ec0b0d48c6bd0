//! Shared configuration for the `lambda-devd` gateway.
//!
//! Settings are loaded through `ortho_config` from four layers, highest
//! precedence first: command-line flags, `LAMBDA_DEV_*` environment
//! variables, a TOML file (`--config-path`, `LAMBDA_DEV_CONFIG_PATH`, or
//! `lambda-dev.toml` discovered in the usual places), and built-in defaults.
//! The merged [`Settings`] are then validated into an immutable [`Config`]
//! that the daemon hands to its components at construction time; nothing
//! reads settings from global state afterwards.
//!
//! The route table is declared as `[[routes]]` tables whose order is
//! preserved.

mod defaults;
mod environment;
mod error;
mod logging;
mod routes;
mod settings;

use std::env;
use std::ffi::OsString;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;

pub use defaults::{
    DEFAULT_DOCKER_BINARY, DEFAULT_HOST, DEFAULT_IMAGE_REPOSITORY, DEFAULT_LOG_FILTER,
    DEFAULT_PORT, DEFAULT_TASK_PATH, default_docker_binary, default_log_filter,
    default_log_format,
};
pub use environment::{EnvAssignment, EnvAssignmentParseError};
pub use error::ConfigError;
pub use logging::{LogFormat, LogFormatParseError, LogSettings};
pub use routes::RouteDeclaration;
pub use settings::Settings;

/// Where the function sources come from inside each container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSource {
    /// Absolute host directory bind-mounted into the container.
    Directory(Utf8PathBuf),
    /// Named volume (for example one managed by docker-sync) mounted without
    /// copying its contents.
    SyncVolume(String),
}

/// Fully resolved gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listener address.
    pub host: String,
    /// Listener port.
    pub port: u16,
    /// Runtime name used to select the container image.
    pub runtime: String,
    /// Source of the function code.
    pub task_source: TaskSource,
    /// Optional container network.
    pub network: Option<String>,
    /// Repository hosting the runtime images.
    pub image_repository: String,
    /// Container engine executable.
    pub docker_binary: Utf8PathBuf,
    /// Variables forwarded into every container.
    pub environment: Vec<EnvAssignment>,
    /// Route table in declaration order.
    pub routes: Vec<RouteDeclaration>,
    /// Logging options.
    pub logging: LogSettings,
}

impl Config {
    /// Builds a configuration with defaults for everything but the runtime
    /// and the task source.
    #[must_use]
    pub fn new(runtime: impl Into<String>, task_source: TaskSource) -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            runtime: runtime.into(),
            task_source,
            network: None,
            image_repository: String::from(DEFAULT_IMAGE_REPOSITORY),
            docker_binary: default_docker_binary(),
            environment: Vec::new(),
            routes: Vec::new(),
            logging: LogSettings::new(default_log_filter(), default_log_format()),
        }
    }

    /// Loads configuration from the process arguments and environment.
    ///
    /// # Errors
    ///
    /// See [`Config::load_from_iter`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_iter(env::args_os())
    }

    /// Loads configuration from an explicit argument list.
    ///
    /// The first item is the program name, as with [`std::env::args_os`].
    /// Environment variables and configuration files are read as usual.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a layer is rejected and the
    /// validation errors of [`Config::from_settings`] otherwise.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let settings = <Settings as OrthoConfig>::load_from_iter(args).map_err(ConfigError::Load)?;
        let working_dir = current_working_dir()?;
        Self::from_settings(settings, &working_dir)
    }

    /// Validates merged settings.
    ///
    /// Relative function directories are resolved against `working_dir`. A
    /// configured sync volume takes priority over the directory. Repeated
    /// environment keys keep the value from the highest layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRuntime`] when no layer names a runtime
    /// and [`ConfigError::InvalidRoute`] for malformed routes.
    pub fn from_settings(settings: Settings, working_dir: &Utf8Path) -> Result<Self, ConfigError> {
        let runtime = settings
            .runtime
            .filter(|runtime| !runtime.trim().is_empty())
            .ok_or(ConfigError::MissingRuntime)?;

        let task_source = settings
            .docker_sync
            .filter(|name| !name.trim().is_empty())
            .map_or_else(
                || TaskSource::Directory(resolve_directory(working_dir, &settings.path)),
                TaskSource::SyncVolume,
            );

        let routes = settings
            .routes
            .into_iter()
            .enumerate()
            .map(|(index, route)| route.normalise(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            host: settings.host,
            port: settings.port,
            runtime,
            task_source,
            network: settings
                .network
                .filter(|network| !network.trim().is_empty()),
            image_repository: settings.image_repository,
            docker_binary: settings.docker_binary,
            environment: environment::dedupe(settings.environment),
            routes,
            logging: LogSettings::new(settings.log_filter, settings.log_format),
        })
    }

    /// Log filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.logging.filter()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.logging.format()
    }

    /// `host:port` string suitable for binding a listener.
    #[must_use]
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Joins `relative` onto `working_dir`, dropping `.` components.
fn resolve_directory(working_dir: &Utf8Path, relative: &Utf8Path) -> Utf8PathBuf {
    working_dir
        .join(relative)
        .components()
        .filter(|component| !matches!(component, Utf8Component::CurDir))
        .collect()
}

fn current_working_dir() -> Result<Utf8PathBuf, ConfigError> {
    let path = env::current_dir().map_err(|source| ConfigError::WorkingDirectory { source })?;
    Utf8PathBuf::from_path_buf(path).map_err(|path| ConfigError::NonUtf8WorkingDirectory { path })
}
