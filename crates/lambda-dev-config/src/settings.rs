//! Layered settings as loaded by `ortho_config`.
//!
//! Each field may come from a command-line flag, a `LAMBDA_DEV_*`
//! environment variable, the `lambda-dev.toml` file, or the defaults declared
//! here, in that order of precedence. The values are raw: validation and path
//! resolution happen in [`crate::Config::from_settings`].

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_HOST, DEFAULT_IMAGE_REPOSITORY, DEFAULT_LOG_FILTER, DEFAULT_PORT, DEFAULT_TASK_PATH,
    default_docker_binary, default_log_format,
};
use crate::environment::EnvAssignment;
use crate::logging::LogFormat;
use crate::routes::RouteDeclaration;

/// Unvalidated gateway settings merged from every configuration layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "LAMBDA_DEV",
    discovery(
        app_name = "lambda-dev",
        env_var = "LAMBDA_DEV_CONFIG_PATH",
        config_file_name = "lambda-dev.toml",
        dotfile_name = ".lambda-dev.toml",
        project_file_name = "lambda-dev.toml",
        config_cli_visible = true,
    )
)]
pub struct Settings {
    /// Listener address.
    #[ortho_config(default = String::from(DEFAULT_HOST))]
    pub host: String,
    /// Listener port.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// Runtime name, for example `nodejs8.10` or `python3.6`.
    pub runtime: Option<String>,
    /// Function source directory mounted at `/var/task`.
    #[ortho_config(default = Utf8PathBuf::from(DEFAULT_TASK_PATH))]
    pub path: Utf8PathBuf,
    /// Named sync volume mounted instead of the source directory.
    pub docker_sync: Option<String>,
    /// Container network joined by each function container.
    pub network: Option<String>,
    /// Repository the runtime images are pulled from.
    #[ortho_config(default = String::from(DEFAULT_IMAGE_REPOSITORY))]
    pub image_repository: String,
    /// Container engine executable.
    #[ortho_config(default = default_docker_binary())]
    pub docker_binary: Utf8PathBuf,
    /// `KEY=VALUE` assignments forwarded to every function; `--env` repeats.
    #[serde(default)]
    #[ortho_config(default = Vec::new(), cli_long = "env", cli_short = 'e')]
    pub environment: Vec<EnvAssignment>,
    /// Log filter directive.
    #[ortho_config(default = String::from(DEFAULT_LOG_FILTER))]
    pub log_filter: String,
    /// Log output format (`json` or `compact`).
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Route table in declaration order. Only files and the environment can
    /// set it, and the highest layer that does replaces the rest.
    #[serde(default)]
    #[ortho_config(skip_cli, default = Vec::new(), merge_strategy = "replace")]
    pub routes: Vec<RouteDeclaration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            runtime: None,
            path: Utf8PathBuf::from(DEFAULT_TASK_PATH),
            docker_sync: None,
            network: None,
            image_repository: String::from(DEFAULT_IMAGE_REPOSITORY),
            docker_binary: default_docker_binary(),
            environment: Vec::new(),
            log_filter: String::from(DEFAULT_LOG_FILTER),
            log_format: default_log_format(),
            routes: Vec::new(),
        }
    }
}
