//! Thin JSON-over-HTTP client for service-to-service calls.

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppResult;

/// Reply from an upstream service.
///
/// `body` is only decoded for 2xx responses.
#[derive(Debug)]
pub struct JsonReply<R> {
    pub status: StatusCode,
    pub body: Option<R>,
}

#[derive(Clone)]
pub struct JsonClient {
    client: Client,
}

impl JsonClient {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// POST `body` as JSON and decode a JSON reply.
    pub async fn post_json<B, R>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> AppResult<JsonReply<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "upstream returned non-success status");
            return Ok(JsonReply { status, body: None });
        }

        let body = response.json::<R>().await?;
        Ok(JsonReply {
            status,
            body: Some(body),
        })
    }
}
