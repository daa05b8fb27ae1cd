use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::io;

/// The result type returned by camunda client methods.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type which is returned from camunda client failures.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error returned from an invalid client host configuration.
    #[error("invalid host url '{url:?}': {message:?}")]
    InvalidHostUrl {
        /// The error message.
        message: String,
        /// The invalid url argument.
        url: String,
    },
    /// The engine answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// HTTP transport errors
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// A request or response body could not be (de)serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// File I/O errors when reading deployment resources from disk.
    #[error("Invalid resource file {resource_file:?}: {source:?}")]
    FileIo {
        /// The specified resource file
        resource_file: String,
        /// The underlying `io::Error`.
        source: io::Error,
    },
    /// Invalid method parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(&'static str),
    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(String),
}

impl Error {
    /// The HTTP status of a failed call, if the engine answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::Transport(err) => err.status(),
            _ => None,
        }
    }
}

/// A failed call against the engine REST API.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// The response status.
    pub status: StatusCode,
    /// The canonical reason phrase of the status, if known.
    pub reason: Option<String>,
    /// The raw response body.
    pub body: String,
    /// The exception type reported by the engine, e.g. `RestException`.
    pub error_type: Option<String>,
    /// The exception message reported by the engine.
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct EngineException {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Build an error from a status and the raw body of the response.
    pub fn new<T: Into<String>>(status: StatusCode, body: T) -> Self {
        let body = body.into();
        let exception = serde_json::from_str::<EngineException>(&body).ok();
        let (error_type, message) = match exception {
            Some(exception) => (exception.error_type, exception.message),
            None => (None, None),
        };

        ApiError {
            status,
            reason: status.canonical_reason().map(str::to_owned),
            body,
            error_type,
            message,
        }
    }

    /// Consume a non-success response into an error, reading its body.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ApiError::new(status, body)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status.as_u16())?;
        if let Some(reason) = &self.reason {
            write!(f, " {}", reason)?;
        }
        match (&self.error_type, &self.message) {
            (Some(error_type), Some(message)) => write!(f, ": {}: {}", error_type, message),
            (None, Some(message)) => write!(f, ": {}", message),
            _ if !self.body.is_empty() => write!(f, ": {}", self.body),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for ApiError {}

/// Pass successful responses through, turn everything else into an [`ApiError`].
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(response).await.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_reads_engine_exception() {
        let err = ApiError::new(
            StatusCode::NOT_FOUND,
            r#"{"type":"RestException","message":"No matching definition with id foo"}"#,
        );

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.reason.as_deref(), Some("Not Found"));
        assert_eq!(err.error_type.as_deref(), Some("RestException"));
        assert_eq!(
            err.message.as_deref(),
            Some("No matching definition with id foo")
        );
        assert_eq!(
            err.to_string(),
            "HTTP 404 Not Found: RestException: No matching definition with id foo"
        );
    }

    #[test]
    fn api_error_keeps_plain_body() {
        let err = ApiError::new(StatusCode::BAD_GATEWAY, "upstream down");

        assert!(err.error_type.is_none());
        assert!(err.message.is_none());
        assert_eq!(err.body, "upstream down");
        assert_eq!(err.to_string(), "HTTP 502 Bad Gateway: upstream down");
    }

    #[test]
    fn status_is_exposed_on_error() {
        let err: Error = ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "").into();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(Error::InvalidParameters("x").status(), None);
    }
}
