use super::types::*;
use super::PredictionService;
use crate::engine::catalog::FALLBACK_TEAMS;
use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

const SIM_DISCLAIMER: &str = "This is a simulated prediction for demonstration purposes. \
Real predictions use actual Premier League statistics.";

/// In-process stand-in for the prediction service, used with `--simulate`.
/// Produces random but well-formed results in the service's wire shape.
pub struct SimulatedService {
    rng: Mutex<StdRng>,
    latency: Duration,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

impl SimulatedService {
    pub fn new(latency: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            latency,
        }
    }

    pub fn with_seed(seed: u64, latency: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency,
        }
    }

    fn reject(selection: &TeamSelection, message: &str) -> WireResult {
        WireResult {
            success: false,
            prediction_type: Some(selection.mode),
            teams: selection.teams().to_vec(),
            predicted_winner: String::new(),
            team1_score: 0.0,
            team2_score: 0.0,
            comparisons: Vec::new(),
            stats_summary: Vec::new(),
            disclaimer: None,
            error: Some(message.to_string()),
        }
    }

    fn generate(&self, selection: &TeamSelection) -> WireResult {
        let team1 = selection.team1.as_str();
        let team2 = selection.team2.as_str();
        if team1.is_empty() || team2.is_empty() {
            return Self::reject(selection, "Both teams must be specified");
        }
        if team1 == team2 {
            return Self::reject(selection, "Teams must be different");
        }

        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let team1_score = round1(rng.gen_range(0.5..=3.0));
        let team2_score = round1(rng.gen_range(0.5..=3.0));
        let predicted_winner = if team1_score > team2_score {
            team1
        } else if team2_score > team1_score {
            team2
        } else {
            DRAW
        };

        let mut metrics = vec![
            ("Passing Accuracy", 70.0, 90.0),
            ("Progressive Passes", 50.0, 120.0),
        ];
        if selection.mode == AnalysisMode::Advanced {
            metrics.push(("Tackles Won", 10.0, 25.0));
            metrics.push(("Saves", 2.0, 8.0));
        }
        let comparisons = metrics
            .into_iter()
            .map(|(metric, lo, hi)| MetricComparison {
                metric: metric.to_string(),
                team1_value: round1(rng.gen_range(lo..hi)),
                team2_value: round1(rng.gen_range(lo..hi)),
                winner: (if rng.gen_bool(0.5) { team1 } else { team2 }).to_string(),
            })
            .collect();

        let stats_summary = [team1, team2]
            .into_iter()
            .map(|squad| TeamStats {
                squad: squad.to_string(),
                entries: vec![
                    ("Passing_Acc".to_string(), StatValue::Number(round1(rng.gen_range(75.0..90.0)))),
                    (
                        "Progressive_Passes".to_string(),
                        StatValue::Number(rng.gen_range(60.0_f64..100.0).round()),
                    ),
                    ("Tackles_Won".to_string(), StatValue::Number(round1(rng.gen_range(12.0..20.0)))),
                    ("Saves".to_string(), StatValue::Number(round1(rng.gen_range(3.0..7.0)))),
                ],
            })
            .collect();

        WireResult {
            success: true,
            prediction_type: Some(selection.mode),
            teams: selection.teams().to_vec(),
            predicted_winner: predicted_winner.to_string(),
            team1_score,
            team2_score,
            comparisons,
            stats_summary,
            disclaimer: Some(SIM_DISCLAIMER.to_string()),
            error: None,
        }
    }
}

#[async_trait]
impl PredictionService for SimulatedService {
    async fn predict(&self, selection: &TeamSelection) -> PredictionResult {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let wire = self.generate(selection);
        PredictionResult::try_from(wire).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "simulated result failed to decode");
            PredictionResult::Failure(PredictionFailure::connection(selection))
        })
    }

    async fn fetch_teams(&self) -> Result<Vec<String>> {
        Ok(FALLBACK_TEAMS.iter().map(|t| t.to_string()).collect())
    }

    fn label(&self) -> String {
        "simulated".to_string()
    }
}
