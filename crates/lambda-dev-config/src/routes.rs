//! Route declarations read from the configuration file.
//!
//! Routes are declared as a TOML array of tables so the file order survives
//! deserialisation; the gateway relies on that order to pick the first match
//! when two templates accept the same request path.
//!
//! ```toml
//! [[routes]]
//! method = "GET"
//! path = "/users/:id"
//! handler = "index.show"
//! ```

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One configured `(method, path template) -> handler` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDeclaration {
    method: String,
    path: String,
    handler: String,
}

impl RouteDeclaration {
    /// Creates a declaration without validating it.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            handler: handler.into(),
        }
    }

    /// HTTP method the route answers to.
    #[must_use]
    pub fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Path template, with `:name` segments marking parameters.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Handler identifier passed to the function runtime.
    #[must_use]
    pub fn handler(&self) -> &str {
        self.handler.as_str()
    }

    /// Validates the declaration and upper-cases its method.
    ///
    /// `index` is the zero-based position in the file and only feeds the
    /// error message.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRoute`] when the method is not an HTTP
    /// token or when the path or handler is empty.
    pub fn normalise(self, index: usize) -> Result<Self, ConfigError> {
        let method = self.method.trim();
        if method.is_empty() || !method.bytes().all(is_token_byte) {
            return Err(ConfigError::invalid_route(
                index,
                format!("method '{}' is not a valid HTTP method", self.method),
            ));
        }
        if self.path.trim().is_empty() {
            return Err(ConfigError::invalid_route(index, "path must not be empty"));
        }
        if self.handler.trim().is_empty() {
            return Err(ConfigError::invalid_route(
                index,
                "handler must not be empty",
            ));
        }
        Ok(Self {
            method: method.to_ascii_uppercase(),
            path: self.path,
            handler: self.handler,
        })
    }
}

/// `tchar` from RFC 9110 section 5.6.2.
const fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
