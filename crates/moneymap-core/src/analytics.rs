//! Optional text-analytics collaborator
//!
//! A remote service that, given a batch of transaction descriptions,
//! returns named entities and key phrases per description. The categorizer
//! matches those signals against its keyword lists before falling back to
//! pure local matching. The service is optional: when `ANALYTICS_HOST` is
//! unset the client is simply absent and callers skip the tier.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum number of descriptions per batch call
pub const MAX_BATCH_SIZE: usize = 25;

/// Entities and key phrases extracted for one input text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextSignals {
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub key_phrases: Vec<String>,
}

/// Trait for text-analytics backends
#[async_trait]
pub trait TextAnalytics: Send + Sync {
    /// Analyze up to [`MAX_BATCH_SIZE`] texts, one result per input in order
    async fn analyze(&self, texts: &[String]) -> Result<Vec<TextSignals>>;
}

/// Concrete analytics client enum
#[derive(Clone)]
pub enum AnalyticsClient {
    Http(HttpAnalytics),
    Mock(MockAnalytics),
}

impl AnalyticsClient {
    /// Create from environment; None when ANALYTICS_HOST is unset
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("ANALYTICS_HOST").ok()?;
        Some(AnalyticsClient::Http(HttpAnalytics::new(&host)))
    }

    /// Create a mock client returning fixed signals for testing
    pub fn mock(signals: Vec<TextSignals>) -> Self {
        AnalyticsClient::Mock(MockAnalytics { signals })
    }
}

#[async_trait]
impl TextAnalytics for AnalyticsClient {
    async fn analyze(&self, texts: &[String]) -> Result<Vec<TextSignals>> {
        match self {
            AnalyticsClient::Http(c) => c.analyze(texts).await,
            AnalyticsClient::Mock(c) => c.analyze(texts).await,
        }
    }
}

/// HTTP analytics backend
#[derive(Clone)]
pub struct HttpAnalytics {
    http_client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    documents: &'a [String],
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    results: Vec<TextSignals>,
}

impl HttpAnalytics {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TextAnalytics for HttpAnalytics {
    async fn analyze(&self, texts: &[String]) -> Result<Vec<TextSignals>> {
        if texts.len() > MAX_BATCH_SIZE {
            return Err(Error::InvalidData(format!(
                "Analytics batch too large: {} > {}",
                texts.len(),
                MAX_BATCH_SIZE
            )));
        }

        let response = self
            .http_client
            .post(format!("{}/analyze", self.base_url))
            .json(&AnalyzeRequest { documents: texts })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http(response.error_for_status().unwrap_err()));
        }

        let body: AnalyzeResponse = response.json().await?;
        if body.results.len() != texts.len() {
            return Err(Error::InvalidData(format!(
                "Analytics returned {} results for {} inputs",
                body.results.len(),
                texts.len()
            )));
        }
        Ok(body.results)
    }
}

/// Mock analytics backend returning a fixed result set
#[derive(Clone)]
pub struct MockAnalytics {
    signals: Vec<TextSignals>,
}

#[async_trait]
impl TextAnalytics for MockAnalytics {
    async fn analyze(&self, texts: &[String]) -> Result<Vec<TextSignals>> {
        if self.signals.len() == texts.len() {
            Ok(self.signals.clone())
        } else {
            Ok(vec![TextSignals::default(); texts.len()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_analytics_matches_input_len() {
        let client = AnalyticsClient::mock(vec![]);
        let texts = vec!["NETFLIX.COM".to_string(), "SHELL OIL".to_string()];
        let results = client.analyze(&texts).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_mock_analytics_fixed_signals() {
        let client = AnalyticsClient::mock(vec![TextSignals {
            entities: vec!["Netflix".to_string()],
            key_phrases: vec!["streaming service".to_string()],
        }]);
        let texts = vec!["NETFLIX.COM".to_string()];
        let results = client.analyze(&texts).await.unwrap();
        assert_eq!(results[0].entities[0], "Netflix");
    }
}
