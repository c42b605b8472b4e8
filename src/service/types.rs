use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Shown whenever the service could not be reached or answered with something unreadable.
pub const CONNECT_FAILURE_MESSAGE: &str =
    "Failed to connect to prediction service. Please try again.";

/// Winner label the service uses for a drawn match or metric.
pub const DRAW: &str = "Draw";

/// Statistical depth requested from the service. Passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Basic,
    Advanced,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Basic => "basic",
            AnalysisMode::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::Basic => "Basic",
            AnalysisMode::Advanced => "Advanced",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisMode::Basic => "Passing stats analysis",
            AnalysisMode::Advanced => "Multi-metric analysis",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            AnalysisMode::Basic => AnalysisMode::Advanced,
            AnalysisMode::Advanced => AnalysisMode::Basic,
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated pair of teams plus the analysis mode, produced by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSelection {
    pub team1: String,
    pub team2: String,
    pub mode: AnalysisMode,
}

impl TeamSelection {
    pub fn teams(&self) -> [String; 2] {
        [self.team1.clone(), self.team2.clone()]
    }
}

/// POST body for the predict endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub team1: String,
    pub team2: String,
    pub prediction_type: AnalysisMode,
}

impl From<&TeamSelection> for PredictionRequest {
    fn from(selection: &TeamSelection) -> Self {
        Self {
            team1: selection.team1.clone(),
            team2: selection.team2.clone(),
            prediction_type: selection.mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: String,
    pub team1_value: f64,
    pub team2_value: f64,
    pub winner: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl From<StatValue> for Value {
    fn from(value: StatValue) -> Self {
        match value {
            StatValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            StatValue::Text(s) => Value::String(s),
        }
    }
}

/// One team's raw stats. `entries` keeps the key order the service sent,
/// without the `Squad` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct TeamStats {
    pub squad: String,
    pub entries: Vec<(String, StatValue)>,
}

const SQUAD_KEY: &str = "Squad";

impl TryFrom<Map<String, Value>> for TeamStats {
    type Error = DecodeError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let squad = match map.get(SQUAD_KEY) {
            Some(Value::String(s)) => s.clone(),
            _ => return Err(DecodeError::MissingSquad),
        };
        let entries = map
            .into_iter()
            .filter(|(key, _)| key != SQUAD_KEY)
            .filter_map(|(key, value)| {
                let value = match value {
                    Value::Number(n) => StatValue::Number(n.as_f64()?),
                    Value::String(s) => StatValue::Text(s),
                    Value::Null => return None,
                    other => StatValue::Text(other.to_string()),
                };
                Some((key, value))
            })
            .collect();
        Ok(Self { squad, entries })
    }
}

impl From<TeamStats> for Map<String, Value> {
    fn from(stats: TeamStats) -> Self {
        let mut map = Map::new();
        map.insert(SQUAD_KEY.to_string(), Value::String(stats.squad));
        for (key, value) in stats.entries {
            map.insert(key, value.into());
        }
        map
    }
}

/// The predicted match outcome, resolved against the result's team pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Team1,
    Team2,
    Draw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub prediction_type: AnalysisMode,
    pub teams: [String; 2],
    pub winner: Winner,
    pub team1_score: f64,
    pub team2_score: f64,
    pub comparisons: Vec<MetricComparison>,
    pub stats_summary: Vec<TeamStats>,
    pub disclaimer: Option<String>,
}

impl Prediction {
    pub fn winner_name(&self) -> &str {
        match self.winner {
            Winner::Team1 => &self.teams[0],
            Winner::Team2 => &self.teams[1],
            Winner::Draw => DRAW,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionFailure {
    pub prediction_type: AnalysisMode,
    pub teams: [String; 2],
    pub error: Option<String>,
}

impl PredictionFailure {
    /// The failure reported when the exchange itself broke down.
    pub fn connection(selection: &TeamSelection) -> Self {
        Self {
            prediction_type: selection.mode,
            teams: selection.teams(),
            error: Some(CONNECT_FAILURE_MESSAGE.to_string()),
        }
    }
}

/// Normalized outcome of one prediction request. Local and service-side
/// failures share the `Failure` variant.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionResult {
    Success(Prediction),
    Failure(PredictionFailure),
}

impl PredictionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResult::Success(_))
    }

    pub fn teams(&self) -> &[String; 2] {
        match self {
            PredictionResult::Success(p) => &p.teams,
            PredictionResult::Failure(f) => &f.teams,
        }
    }

    /// Decode a response to a request made in `requested` mode. A body that
    /// leaves out `prediction_type` keeps the requested mode.
    pub fn from_json(body: &[u8], requested: AnalysisMode) -> Result<Self, DecodeError> {
        let mut wire: WireResult = serde_json::from_slice(body)?;
        wire.prediction_type.get_or_insert(requested);
        Self::try_from(wire)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed prediction body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("team stats entry has no Squad")]
    MissingSquad,
    #[error("expected two teams, got {0}")]
    TeamsNotPair(usize),
    #[error("predicted winner {0:?} is neither team nor Draw")]
    UnknownWinner(String),
}

/// Flat JSON shape exchanged with the service. Failure bodies usually omit
/// the numeric and array fields, hence the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_type: Option<AnalysisMode>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub predicted_winner: String,
    #[serde(default)]
    pub team1_score: f64,
    #[serde(default)]
    pub team2_score: f64,
    #[serde(default)]
    pub comparisons: Vec<MetricComparison>,
    #[serde(default)]
    pub stats_summary: Vec<TeamStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TryFrom<WireResult> for PredictionResult {
    type Error = DecodeError;

    fn try_from(wire: WireResult) -> Result<Self, Self::Error> {
        let prediction_type = wire.prediction_type.unwrap_or_default();

        if !wire.success {
            let mut teams = wire.teams.into_iter();
            return Ok(PredictionResult::Failure(PredictionFailure {
                prediction_type,
                teams: [
                    teams.next().unwrap_or_default(),
                    teams.next().unwrap_or_default(),
                ],
                error: wire.error.filter(|e| !e.trim().is_empty()),
            }));
        }

        let teams: [String; 2] = match <[String; 2]>::try_from(wire.teams) {
            Ok(pair) => pair,
            Err(other) => return Err(DecodeError::TeamsNotPair(other.len())),
        };
        let winner = if wire.predicted_winner == teams[0] {
            Winner::Team1
        } else if wire.predicted_winner == teams[1] {
            Winner::Team2
        } else if wire.predicted_winner == DRAW {
            Winner::Draw
        } else {
            return Err(DecodeError::UnknownWinner(wire.predicted_winner));
        };

        Ok(PredictionResult::Success(Prediction {
            prediction_type,
            teams,
            winner,
            team1_score: wire.team1_score,
            team2_score: wire.team2_score,
            comparisons: wire.comparisons,
            stats_summary: wire.stats_summary,
            disclaimer: wire.disclaimer,
        }))
    }
}

impl From<&PredictionResult> for WireResult {
    fn from(result: &PredictionResult) -> Self {
        match result {
            PredictionResult::Success(p) => WireResult {
                success: true,
                prediction_type: Some(p.prediction_type),
                teams: p.teams.to_vec(),
                predicted_winner: p.winner_name().to_string(),
                team1_score: p.team1_score,
                team2_score: p.team2_score,
                comparisons: p.comparisons.clone(),
                stats_summary: p.stats_summary.clone(),
                disclaimer: p.disclaimer.clone(),
                error: None,
            },
            PredictionResult::Failure(f) => WireResult {
                success: false,
                prediction_type: Some(f.prediction_type),
                teams: f.teams.to_vec(),
                predicted_winner: String::new(),
                team1_score: 0.0,
                team2_score: 0.0,
                comparisons: Vec::new(),
                stats_summary: Vec::new(),
                disclaimer: None,
                error: f.error.clone(),
            },
        }
    }
}

/// GET teams response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsResponse {
    pub success: bool,
    #[serde(default)]
    pub teams: Vec<String>,
}
