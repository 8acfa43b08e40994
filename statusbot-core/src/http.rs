//! HTTP client abstraction for upstream status fetches.
//!
//! The status source only ever needs a plain GET with a status code and a body,
//! so the trait is kept to exactly that. Tests substitute a canned client
//! instead of standing up a server; production uses [`DefaultHttpClient`],
//! a thin wrapper over `reqwest` with a request timeout applied to every call.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest;

use crate::Error;

/// Status code plus raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A generic trait for making HTTP requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: HashMap<String, String>) -> Result<HttpResponse, Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("statusbot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: &str, headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
