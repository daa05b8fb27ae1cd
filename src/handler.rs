use crate::{error, Result};
use async_trait::async_trait;
use std::fmt::Debug;

/// Hook which sees every response before the client decodes it.
///
/// The default [`ErrorHandler`] turns non-success responses into
/// [`Error::Api`](crate::Error::Api). A custom handler may inspect, log or
/// replace responses; the status is checked again after it ran, so a failed
/// call always surfaces as an error.
#[async_trait]
pub trait ResponseHandler: Debug + Send + Sync {
    /// Inspect a response, either passing it on or failing the call.
    async fn handle(&self, response: reqwest::Response) -> Result<reqwest::Response>;
}

/// The default handler, translating non-success responses into errors
/// carrying status, reason and body.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorHandler;

#[async_trait]
impl ResponseHandler for ErrorHandler {
    async fn handle(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        error::check_status(response).await
    }
}
