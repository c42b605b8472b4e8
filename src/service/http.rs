use super::types::*;
use super::PredictionService;
use crate::config::ServiceConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

pub struct HttpPredictionService {
    client: Client,
    base_url: String,
    predict_url: String,
    teams_url: String,
}

impl HttpPredictionService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = Client::builder().pool_max_idle_per_host(2);
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build().context("failed to build HTTP client")?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            predict_url: format!("{}{}", base_url, config.predict_path),
            teams_url: format!("{}{}", base_url, config.teams_path),
            base_url,
        })
    }

    /// The raw exchange. Non-2xx statuses are not errors here: the service
    /// reports its own failures as a 500 carrying a `success: false` body.
    async fn post_prediction(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let resp = self
            .client
            .post(&self.predict_url)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .context("POST predict failed")?;
        let status = resp.status();
        let body = resp.bytes().await.context("failed to read predict response")?;
        tracing::debug!(%status, bytes = body.len(), "predict response received");

        PredictionResult::from_json(&body, request.prediction_type)
            .with_context(|| format!("failed to parse predict response ({})", status))
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, selection: &TeamSelection) -> PredictionResult {
        let request = PredictionRequest::from(selection);
        match self.post_prediction(&request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    team1 = %selection.team1,
                    team2 = %selection.team2,
                    error = %format!("{:#}", e),
                    "prediction exchange failed"
                );
                PredictionResult::Failure(PredictionFailure::connection(selection))
            }
        }
    }

    async fn fetch_teams(&self) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(&self.teams_url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .context("GET teams failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET teams failed ({}): {}", status, body);
        }
        let parsed: TeamsResponse = resp.json().await.context("failed to parse teams response")?;
        if !parsed.success {
            anyhow::bail!("teams endpoint reported failure");
        }
        Ok(parsed.teams)
    }

    fn label(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> ServiceConfig {
        // Port 9 (discard) on localhost is closed in test environments.
        ServiceConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            request_timeout_ms: Some(2000),
            ..ServiceConfig::default()
        }
    }

    #[test]
    fn test_urls_join_without_double_slash() {
        let service = HttpPredictionService::new(&unreachable_config()).unwrap();
        assert_eq!(service.predict_url, "http://127.0.0.1:9/api/predict");
        assert_eq!(service.teams_url, "http://127.0.0.1:9/api/teams");
        assert_eq!(service.label(), "http://127.0.0.1:9");
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_connection_failure() {
        let service = HttpPredictionService::new(&unreachable_config()).unwrap();
        let selection = TeamSelection {
            team1: "Arsenal".to_string(),
            team2: "Chelsea".to_string(),
            mode: AnalysisMode::Advanced,
        };
        let result = service.predict(&selection).await;
        let PredictionResult::Failure(f) = result else {
            panic!("expected failure");
        };
        assert_eq!(f.error.as_deref(), Some(CONNECT_FAILURE_MESSAGE));
        assert_eq!(f.teams, ["Arsenal".to_string(), "Chelsea".to_string()]);
        assert_eq!(f.prediction_type, AnalysisMode::Advanced);
    }

    #[tokio::test]
    async fn test_unreachable_teams_endpoint_errors() {
        let service = HttpPredictionService::new(&unreachable_config()).unwrap();
        assert!(service.fetch_teams().await.is_err());
    }
}
