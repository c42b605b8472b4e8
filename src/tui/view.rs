//! Pure mapping from a prediction result to what the result pane shows.
//! `render` only lays these out; all decisions about content live here.

use crate::service::types::{
    AnalysisMode, MetricComparison, Prediction, PredictionFailure, PredictionResult, StatValue,
    TeamStats, Winner, DRAW,
};

pub const GENERIC_ERROR: &str = "An error occurred during prediction";

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Error(ErrorView),
    Prediction(PredictionView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorView {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub header: HeaderView,
    pub score: ScorePanel,
    /// Empty means the section is omitted.
    pub comparisons: Vec<ComparisonRow>,
    pub stats: Vec<StatsBlock>,
    pub disclaimer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub matchup: String,
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamScore {
    pub name: String,
    pub score: String,
    pub is_winner: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorePanel {
    pub team1: TeamScore,
    pub team2: TeamScore,
    pub scoreline: String,
    pub is_draw: bool,
    pub announcement: String,
}

/// Which side a metric went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricLeader {
    Team1,
    Team2,
    Draw,
    /// The service named someone other than the two teams; shown as given.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub metric: String,
    pub team1_value: String,
    pub team2_value: String,
    pub leader: MetricLeader,
    pub winner_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsBlock {
    pub squad: String,
    pub entries: Vec<(String, String)>,
}

pub fn build(result: &PredictionResult) -> ResultView {
    match result {
        PredictionResult::Success(p) => ResultView::Prediction(build_prediction(p)),
        PredictionResult::Failure(f) => ResultView::Error(build_error(f)),
    }
}

pub fn build_error(failure: &PredictionFailure) -> ErrorView {
    ErrorView {
        title: "Prediction Error".to_string(),
        message: failure
            .error
            .clone()
            .unwrap_or_else(|| GENERIC_ERROR.to_string()),
    }
}

pub fn build_prediction(p: &Prediction) -> PredictionView {
    let [team1, team2] = &p.teams;
    PredictionView {
        header: HeaderView {
            matchup: format!("{} vs {}", team1, team2),
            mode: mode_title(p.prediction_type).to_string(),
        },
        score: score_panel(p),
        comparisons: p
            .comparisons
            .iter()
            .map(|c| comparison_row(c, team1, team2))
            .collect(),
        stats: p.stats_summary.iter().map(stats_block).collect(),
        disclaimer: p.disclaimer.clone(),
    }
}

fn mode_title(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Basic => "Basic Passing Analysis",
        AnalysisMode::Advanced => "Advanced Multi-Metric Analysis",
    }
}

fn score_panel(p: &Prediction) -> ScorePanel {
    let team1 = TeamScore {
        name: p.teams[0].clone(),
        score: format_number(p.team1_score),
        is_winner: p.winner == Winner::Team1,
    };
    let team2 = TeamScore {
        name: p.teams[1].clone(),
        score: format_number(p.team2_score),
        is_winner: p.winner == Winner::Team2,
    };
    let is_draw = p.winner == Winner::Draw;
    let announcement = if is_draw {
        "🤝 Match Predicted as Draw".to_string()
    } else {
        format!("🏆 {} Victory Predicted", p.winner_name())
    };
    ScorePanel {
        scoreline: format!("{}–{}", team1.score, team2.score),
        team1,
        team2,
        is_draw,
        announcement,
    }
}

fn comparison_row(c: &MetricComparison, team1: &str, team2: &str) -> ComparisonRow {
    let leader = if c.winner == team1 {
        MetricLeader::Team1
    } else if c.winner == team2 {
        MetricLeader::Team2
    } else if c.winner == DRAW {
        MetricLeader::Draw
    } else {
        MetricLeader::Other
    };
    let winner_label = match leader {
        MetricLeader::Draw => "🤝 Draw".to_string(),
        _ => format!("👑 {}", c.winner),
    };
    ComparisonRow {
        metric: c.metric.clone(),
        team1_value: format_number(c.team1_value),
        team2_value: format_number(c.team2_value),
        leader,
        winner_label,
    }
}

fn stats_block(stats: &TeamStats) -> StatsBlock {
    StatsBlock {
        squad: stats.squad.clone(),
        entries: stats
            .entries
            .iter()
            .map(|(key, value)| (humanize_key(key), format_stat(value)))
            .collect(),
    }
}

/// Raw numbers as the service sent them: `2.0` shows as `2`, `1.3` as `1.3`.
pub fn format_number(n: f64) -> String {
    format!("{}", n)
}

pub fn format_stat(value: &StatValue) -> String {
    match value {
        StatValue::Number(n) => format!("{:.1}", n),
        StatValue::Text(s) => s.clone(),
    }
}

pub fn humanize_key(key: &str) -> String {
    key.replace('_', " ")
}
