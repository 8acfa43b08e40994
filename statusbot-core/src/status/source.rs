use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use statusbot_common::error::FetchError;
use statusbot_common::models::status::{StatusEntry, StatusSummary};

use crate::Error;
use crate::http::HttpClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<StatusSummary, FetchError>;
}

/// Wire shape of a Statuspage `summary.json`. Only the fields we render are
/// modelled; everything else in the payload is ignored.
#[derive(Debug, Deserialize)]
struct SummaryPayload {
    incidents: Vec<NamedStatus>,
    scheduled_maintenances: Vec<NamedStatus>,
    components: Vec<NamedStatus>,
}

#[derive(Debug, Deserialize)]
struct NamedStatus {
    name: String,
    status: String,
}

impl From<NamedStatus> for StatusEntry {
    fn from(item: NamedStatus) -> Self {
        StatusEntry::new(item.name, item.status)
    }
}

/// Fetches a Statuspage-style summary from one fixed endpoint.
pub struct StatuspageSource {
    client: Arc<dyn HttpClient>,
    summary_url: String,
    timeout: Duration,
}

impl StatuspageSource {
    pub fn new(client: Arc<dyn HttpClient>, summary_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            summary_url: summary_url.into(),
            timeout,
        }
    }

    fn request_error(&self, err: Error) -> FetchError {
        match err {
            Error::Http(e) if e.is_timeout() => FetchError::Timeout(self.timeout),
            Error::Timeout(_) => FetchError::Timeout(self.timeout),
            other => FetchError::Request(other.to_string()),
        }
    }
}

/// Parses a summary body. Each of the three sequences is mapped independently
/// and keeps the upstream order.
pub fn parse_summary(body: &str) -> Result<StatusSummary, FetchError> {
    let payload: SummaryPayload =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    Ok(StatusSummary {
        incidents: payload.incidents.into_iter().map(StatusEntry::from).collect(),
        scheduled_maintenances: payload
            .scheduled_maintenances
            .into_iter()
            .map(StatusEntry::from)
            .collect(),
        components: payload.components.into_iter().map(StatusEntry::from).collect(),
    })
}

#[async_trait]
impl StatusSource for StatuspageSource {
    async fn fetch(&self) -> Result<StatusSummary, FetchError> {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        let response = tokio::time::timeout(self.timeout, self.client.get(&self.summary_url, headers))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))?
            .map_err(|e| self.request_error(e))?;

        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        let summary = parse_summary(&response.body)?;
        debug!(
            "Fetched status summary from {}: {} incidents, {} maintenances, {} components",
            self.summary_url,
            summary.incidents.len(),
            summary.scheduled_maintenances.len(),
            summary.components.len()
        );
        Ok(summary)
    }
}
