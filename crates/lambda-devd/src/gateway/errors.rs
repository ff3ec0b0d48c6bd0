//! Failures the gateway turns into 502 responses.

use lambda_dev_invoker::InvokerError;
use thiserror::Error;

use super::request::GatewayResponse;

/// Errors detected while serving a request.
///
/// Each variant's message is the exact body of the 502 response sent to the
/// client.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// No route matches the method and path.
    #[error("No handler configured for {method} {path}")]
    RouteNotFound {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },

    /// The function's output is not a JSON object.
    #[error("Failed to parse JSON response from Lambda function: {raw}")]
    MalformedInvocationOutput {
        /// Output exactly as printed.
        raw: String,
    },

    /// The function returned a `body` that is neither a string nor null.
    #[error("Body from Lambda function is not a string: {body}")]
    InvalidBodyType {
        /// The offending body rendered as JSON.
        body: String,
    },

    /// The function returned a missing or unusable `statusCode`.
    #[error("Invalid statusCode from Lambda function: {value}")]
    InvalidStatusCode {
        /// The offending value rendered as JSON.
        value: String,
    },

    /// The function could not be run at all.
    #[error("Failed to invoke Lambda function: {source}")]
    InvokerFailure {
        /// Underlying invoker error.
        #[source]
        source: InvokerError,
    },
}

impl GatewayError {
    /// Renders the error as the 502 response body.
    #[must_use]
    pub fn to_response(&self) -> GatewayResponse {
        GatewayResponse::error(self.to_string())
    }

    /// Short machine-readable name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RouteNotFound { .. } => "route_not_found",
            Self::MalformedInvocationOutput { .. } => "malformed_invocation_output",
            Self::InvalidBodyType { .. } => "invalid_body_type",
            Self::InvalidStatusCode { .. } => "invalid_status_code",
            Self::InvokerFailure { .. } => "invoker_failure",
        }
    }
}

impl From<InvokerError> for GatewayError {
    fn from(source: InvokerError) -> Self {
        Self::InvokerFailure { source }
    }
}
