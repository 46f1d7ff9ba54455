use std::io::{self, Read};

use serde::Deserialize;

/// An error response from the API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The API responded with a structured error body.
    ErrorResponse {
        /// The HTTP status on the overall response.
        status: http::StatusCode,
        /// The reason phrase reported by the server, e.g. "Not Found".
        error: Option<String>,
        /// A longer description of the error encountered.
        message: Option<String>,
        /// The request path the server reported the error for.
        path: Option<String>,
    },
    /// The HTTP status was not a success, and the body was not a structured
    /// error. The body is kept verbatim.
    Other {
        /// The HTTP status on the overall response.
        status: http::StatusCode,
        /// The raw response body.
        body: String,
    },
    /// The response body did not match the expected model.
    InvalidResponse(
        http::StatusCode,
        #[source] serde_path_to_error::Error<serde_json::Error>,
    ),
    /// The response body could not be read.
    Body(http::StatusCode, #[source] io::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::ErrorResponse {
                status, message, ..
            } => {
                write!(f, "{}", StatusLine(*status, self.reason()))?;
                if let Some(message) = &message {
                    write!(f, ": {message}")?;
                }
            }
            ApiError::Other { status, body } => {
                write!(f, "{}", StatusLine(*status, self.reason()))?;
                let body = body.trim();
                if !body.is_empty() {
                    write!(f, ": {body}")?;
                }
            }
            ApiError::InvalidResponse(status, e) => {
                write!(f, "Invalid response ({status}) at {}", e.path())?;
            }
            ApiError::Body(status, _) => {
                write!(f, "Failed to read response body ({status})")?;
            }
        }

        Ok(())
    }
}

struct StatusLine<'a>(http::StatusCode, Option<&'a str>);

impl std::fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_u16())?;
        if let Some(reason) = self.1 {
            write!(f, " {reason}")?;
        }

        Ok(())
    }
}

/// The error body returned by the server.
#[derive(Debug, Deserialize)]
pub(crate) struct RawApiError {
    error: Option<String>,
    message: Option<String>,
    path: Option<String>,
}

impl ApiError {
    /// Build an error from a non-success response.
    pub(crate) fn from_body(status: http::StatusCode, mut body: impl Read) -> Self {
        let mut raw = String::new();
        if let Err(e) = body.read_to_string(&mut raw) {
            return ApiError::Body(status, e);
        }

        match serde_json::from_str::<RawApiError>(&raw) {
            Ok(RawApiError {
                error,
                message,
                path,
            }) if error.is_some() || message.is_some() => ApiError::ErrorResponse {
                status,
                error,
                message,
                path,
            },
            _ => ApiError::Other { status, body: raw },
        }
    }

    /// The HTTP status of the response.
    pub fn status(&self) -> http::StatusCode {
        match self {
            ApiError::ErrorResponse { status, .. }
            | ApiError::Other { status, .. }
            | ApiError::InvalidResponse(status, _)
            | ApiError::Body(status, _) => *status,
        }
    }

    /// The reason phrase: the one the server sent, or the canonical one for
    /// the status code.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ApiError::ErrorResponse {
                error: Some(error), ..
            } => Some(error.as_str()),
            _ => self.status().canonical_reason(),
        }
    }

    /// The server's description of the error, if it sent one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::ErrorResponse { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Returns true if the server responded with 404 Not Found.
    pub fn is_not_found(&self) -> bool {
        self.status() == http::StatusCode::NOT_FOUND
    }
}
