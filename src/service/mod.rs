pub mod http;
pub mod simulated;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::{PredictionResult, TeamSelection};

/// The external prediction service as the UI sees it.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// One request/response exchange. Never errors: transport and decoding
    /// problems come back as a `PredictionResult::Failure`.
    async fn predict(&self, selection: &TeamSelection) -> PredictionResult;

    /// Canonical team names the service knows about.
    async fn fetch_teams(&self) -> Result<Vec<String>>;

    /// Short name for the header bar.
    fn label(&self) -> String;
}
