//! Error types for the client runtime.
//!
//! Every failure path in the runtime produces a [`ClientError`] with a
//! human-readable message. The three variants map to the points a request
//! can fail:
//!
//! - [`ClientError::Configuration`]: the request was rejected before
//!   dispatch (for example an empty URL); never offered to the recovery
//!   pipeline.
//! - [`ClientError::Transport`]: the underlying call could not complete
//!   (network failure, aborted signal); carries no response.
//! - [`ClientError::Status`]: a response arrived with a status outside the
//!   2xx range; carries the full parsed [`Response`].
//!
//! Errors from the transport and status paths flow through the
//! response-error interceptor chain, which may recover them into a
//! successful [`Response`] or rewrite their message before they reach the
//! caller.

use thiserror::Error;

use crate::client::config::RequestConfig;
use crate::client::response::Response;

/// Unified error type for all request failures.
///
/// # Example
///
/// ```rust,ignore
/// match client.get("/me").await {
///     Ok(response) => println!("{}", response.data),
///     Err(error) => match &error {
///         ClientError::Status { response, .. } => {
///             eprintln!("{}: {}", response.status, error.message());
///         }
///         _ => eprintln!("{}", error.message()),
///     },
/// }
/// ```
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request configuration was invalid at dispatch time.
    #[error("{message}")]
    Configuration {
        /// Human-readable description of the invalid configuration.
        message: String,
    },

    /// The transport call could not complete.
    #[error("{message}")]
    Transport {
        /// Human-readable description of the transport failure.
        message: String,
        /// The config that was being dispatched, when it was resolved
        /// before the failure.
        config: Option<Box<RequestConfig>>,
    },

    /// A response was received with a non-2xx status code.
    #[error("{message}")]
    Status {
        /// The error message: the response body's `message` field when
        /// present, otherwise a generic status description.
        message: String,
        /// The full response that produced the failure.
        response: Box<Response>,
    },
}

impl ClientError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a transport error without an attached config.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            config: None,
        }
    }

    /// Creates a status error from a non-2xx response, deriving the
    /// message from the parsed body's `message` field when present.
    #[must_use]
    pub fn from_response(response: Response) -> Self {
        let message = response.error_message().map_or_else(
            || format!("Request failed with status code {}", response.status),
            ToString::to_string,
        );
        Self::Status {
            message,
            response: Box::new(response),
        }
    }

    /// Returns the human-readable message for this error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Configuration { message }
            | Self::Transport { message, .. }
            | Self::Status { message, .. } => message,
        }
    }

    /// Replaces the message, preserving the variant and its payload.
    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        match self {
            Self::Configuration { .. } => Self::Configuration { message },
            Self::Transport { config, .. } => Self::Transport { message, config },
            Self::Status { response, .. } => Self::Status { message, response },
        }
    }

    /// Returns the response that produced this failure, when one exists.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Status { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Returns the config that was being dispatched, when available.
    #[must_use]
    pub fn config(&self) -> Option<&RequestConfig> {
        match self {
            Self::Status { response, .. } => Some(&response.config),
            Self::Transport { config, .. } => config.as_deref(),
            Self::Configuration { .. } => None,
        }
    }
}
