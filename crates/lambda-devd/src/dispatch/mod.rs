//! Hands envelopes to the function runtime.
//!
//! The [`Dispatcher`] owns the immutable [`RuntimeSettings`] derived from
//! configuration and turns each envelope into a structured
//! [`InvocationRequest`]. It never interprets what the function prints.

use std::sync::Arc;

use lambda_dev_config::{Config, EnvAssignment, TaskSource};
use lambda_dev_invoker::{
    InvocationExecutor, InvocationPayload, InvocationRequest, InvokerError, VolumeMount,
};
use tracing::debug;

use crate::event::{ImageVariant, InvocationEnvelope};

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Settings shared by every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    runtime: String,
    image_repository: String,
    task_source: TaskSource,
    network: Option<String>,
    environment: Vec<EnvAssignment>,
}

impl RuntimeSettings {
    /// Creates settings for `runtime` with no network and no environment.
    #[must_use]
    pub fn new(
        runtime: impl Into<String>,
        image_repository: impl Into<String>,
        task_source: TaskSource,
    ) -> Self {
        Self {
            runtime: runtime.into(),
            image_repository: image_repository.into(),
            task_source,
            network: None,
            environment: Vec::new(),
        }
    }

    /// Extracts the invocation settings from the daemon configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            runtime: config.runtime.clone(),
            image_repository: config.image_repository.clone(),
            task_source: config.task_source.clone(),
            network: config.network.clone(),
            environment: config.environment.clone(),
        }
    }

    /// Joins every container to `network`.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    /// Forwards `assignment` into every container.
    #[must_use]
    pub fn with_env(mut self, assignment: EnvAssignment) -> Self {
        self.environment.push(assignment);
        self
    }

    /// Image reference for `variant`.
    ///
    /// ```
    /// use lambda_dev_config::TaskSource;
    /// use lambda_devd::dispatch::RuntimeSettings;
    /// use lambda_devd::event::ImageVariant;
    ///
    /// let settings = RuntimeSettings::new(
    ///     "nodejs8.10",
    ///     "lambci/lambda",
    ///     TaskSource::SyncVolume("app-sync".into()),
    /// );
    /// assert_eq!(settings.image(ImageVariant::Runtime), "lambci/lambda:nodejs8.10");
    /// assert_eq!(settings.image(ImageVariant::Build), "lambci/lambda:build-nodejs8.10");
    /// ```
    #[must_use]
    pub fn image(&self, variant: ImageVariant) -> String {
        match variant {
            ImageVariant::Runtime => format!("{}:{}", self.image_repository, self.runtime),
            ImageVariant::Build => format!("{}:build-{}", self.image_repository, self.runtime),
        }
    }

    /// Mount for the function code.
    #[must_use]
    pub fn mount(&self) -> VolumeMount {
        match &self.task_source {
            TaskSource::Directory(directory) => VolumeMount::bind(directory.as_str()),
            TaskSource::SyncVolume(volume) => VolumeMount::named_volume(volume.as_str()),
        }
    }

    fn request(
        &self,
        variant: ImageVariant,
        handler: &str,
        payload: InvocationPayload,
    ) -> InvocationRequest {
        let base = InvocationRequest::new(self.image(variant), self.mount(), handler, payload);
        let with_env = self
            .environment
            .iter()
            .fold(base, |request, assignment| {
                request.with_env(assignment.key(), assignment.value())
            });
        match &self.network {
            Some(network) => with_env.with_network(network.as_str()),
            None => with_env,
        }
    }
}

/// Serialises envelopes and runs them through an [`InvocationExecutor`].
#[derive(Clone)]
pub struct Dispatcher {
    settings: RuntimeSettings,
    executor: Arc<dyn InvocationExecutor>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(settings: RuntimeSettings, executor: Arc<dyn InvocationExecutor>) -> Self {
        Self { settings, executor }
    }

    /// Settings applied to every invocation.
    #[must_use]
    pub const fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    /// Invokes `handler` with `envelope` and returns its standard output
    /// unparsed.
    ///
    /// # Errors
    ///
    /// Returns an [`InvokerError`] when the envelope cannot be serialised or
    /// the executor fails to produce output.
    pub fn dispatch(
        &self,
        handler: &str,
        envelope: &InvocationEnvelope,
        variant: ImageVariant,
    ) -> Result<String, InvokerError> {
        let payload = InvocationPayload::from_event(envelope)?;
        let request = self.settings.request(variant, handler, payload);
        debug!(
            target: DISPATCH_TARGET,
            handler,
            image = request.image(),
            mount = %request.mount(),
            "dispatching invocation"
        );
        self.executor
            .execute(&request)
            .map(lambda_dev_invoker::InvocationOutput::into_stdout)
    }
}
