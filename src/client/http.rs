//! HTTP implementation of [`ChatEndpoint`].

use crate::client::{AskReply, AskRequest, ChatEndpoint};
use crate::error::Result;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Posts chat messages as JSON to a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    http: Client,
    url: String,
}

impl HttpEndpoint {
    /// Create an endpoint client for `url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// URL requests are posted to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ChatEndpoint for HttpEndpoint {
    fn ask(&self, request: &AskRequest) -> Result<AskReply> {
        debug!(url = %self.url, conversation = %request.conversation_id, "posting chat message");
        let reply = self
            .http
            .post(&self.url)
            .json(request)
            .send()?
            .error_for_status()?
            .json::<AskReply>()?;
        debug!(record = ?reply.id, "received chat reply");
        Ok(reply)
    }
}
