use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Address the HTTP listener binds to when none is configured.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port the HTTP listener binds to when none is configured.
pub const DEFAULT_PORT: u16 = 3000;

/// Image repository hosting the runtime images.
pub const DEFAULT_IMAGE_REPOSITORY: &str = "lambci/lambda";

/// Container engine executable used to launch functions.
pub const DEFAULT_DOCKER_BINARY: &str = "docker";

/// Function source directory, relative to the working directory.
pub const DEFAULT_TASK_PATH: &str = ".";

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the binaries.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binaries.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default container engine executable.
#[must_use]
pub fn default_docker_binary() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_DOCKER_BINARY)
}
