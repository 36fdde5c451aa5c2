//! HTTP client for a single widget endpoint.
//!
//! # Design
//! - One client per widget, bound to the widget's `data-path`.
//! - Non-2xx responses surface as [`HttpError::Status`] so callers can tell them from empty bodies.
//! - Every call takes an optional [`AbortSignal`] so a superseded request is torn down in flight.

use crate::core::poll::PollOutcome;
use crate::core::requests::PostRequest;
use gloo_net::http::Request;
use thiserror::Error;
use web_sys::AbortSignal;

/// Failures talking to a widget endpoint.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum HttpError {
    /// The request could not be sent, was aborted, or the body could not be read.
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(u16),
}

impl From<gloo_net::Error> for HttpError {
    fn from(err: gloo_net::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EndpointClient {
    path: String,
}

impl EndpointClient {
    pub(crate) fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    /// GET the endpoint and return its body text.
    pub(crate) async fn fetch_text(
        &self,
        signal: Option<&AbortSignal>,
    ) -> Result<String, HttpError> {
        let response = Request::get(&self.path).abort_signal(signal).send().await?;
        if !response.ok() {
            return Err(HttpError::Status(response.status()));
        }
        Ok(response.text().await?)
    }

    /// GET the endpoint once and classify the result for the poller.
    pub(crate) async fn poll(&self, signal: Option<&AbortSignal>) -> PollOutcome {
        match self.fetch_text(signal).await {
            Ok(body) if body.is_empty() => PollOutcome::Empty,
            Ok(body) => PollOutcome::Body(body),
            Err(HttpError::Status(code)) => PollOutcome::Status(code),
            Err(HttpError::Transport(reason)) => PollOutcome::Transport(reason),
        }
    }

    /// POST a form body; the response body is ignored.
    pub(crate) async fn post(
        &self,
        request: &PostRequest,
        signal: Option<&AbortSignal>,
    ) -> Result<(), HttpError> {
        let mut req = Request::post(request.path()).abort_signal(signal);
        for (name, value) in request.headers() {
            req = req.header(name, value);
        }
        let response = req.body(request.body()).send().await?;
        if !response.ok() {
            return Err(HttpError::Status(response.status()));
        }
        Ok(())
    }
}
