//! Thin GET helpers over `reqwest`
//!
//! Every remote call the agent makes is a single awaited GET, optionally
//! carrying a bearer token, decoded as JSON or returned as text. Callers map
//! [`HttpError`] into their own error domain so the registry and the hosting
//! API can be fatal or recoverable independently.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::{Result, hosting};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of a single GET
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("invalid body: {0}")]
    Decode(String),

    /// The token cannot be sent as a header; no request was made
    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),
}

/// Build the shared client; GitHub rejects requests without a User-Agent
pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(hosting::client_failed)
}

/// A GET under construction
pub struct Get<'a> {
    builder: RequestBuilder,
    url: &'a str,
    rejected: Option<HttpError>,
}

impl<'a> Get<'a> {
    pub fn new(client: &Client, url: &'a str) -> Self {
        Self {
            builder: client.get(url),
            url,
            rejected: None,
        }
    }

    pub fn query(mut self, params: &[(&str, &str)]) -> Self {
        self.builder = self.builder.query(params);
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.builder = self.builder.header(AUTHORIZATION, value);
            }
            Err(e) => self.rejected = Some(e.into()),
        }
        self
    }

    pub fn accept(mut self, media_type: &'static str) -> Self {
        self.builder = self
            .builder
            .header(ACCEPT, HeaderValue::from_static(media_type));
        self
    }

    async fn send(self) -> std::result::Result<reqwest::Response, HttpError> {
        if let Some(err) = self.rejected {
            return Err(err);
        }
        tracing::debug!(url = self.url, "GET");
        let response = self.builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status(status));
        }
        Ok(response)
    }

    /// Send and decode the body as JSON
    pub async fn json<T: DeserializeOwned>(self) -> std::result::Result<T, HttpError> {
        let body = self.send().await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| HttpError::Decode(e.to_string()))
    }

    /// Send and return the body as text
    pub async fn text(self) -> std::result::Result<String, HttpError> {
        Ok(self.send().await?.text().await?)
    }
}
