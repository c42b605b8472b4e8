use crate::engine::catalog::TeamCatalog;
use crate::engine::form::FormState;
use crate::service::types::{
    AnalysisMode, Prediction, PredictionFailure, PredictionResult, TeamSelection,
};
use std::collections::VecDeque;
use std::time::Instant;

const MAX_LOGS: usize = 200;

/// Where the result pane is in the request lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success(Prediction),
    Failure(PredictionFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Submit(TeamSelection),
    ResponseReceived(PredictionResult),
}

/// Selection plus phase. Only ever changed through `reduce`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub selection: Option<TeamSelection>,
    pub phase: Phase,
}

impl ViewState {
    pub fn reduce(self, event: ViewEvent) -> ViewState {
        match event {
            // Submit is disabled while a request is in flight.
            ViewEvent::Submit(_) if self.is_loading() => self,
            ViewEvent::Submit(selection) => ViewState {
                selection: Some(selection),
                phase: Phase::Loading,
            },
            // Last response wins, whatever state it lands in.
            ViewEvent::ResponseReceived(result) => ViewState {
                selection: self.selection,
                phase: match result {
                    PredictionResult::Success(p) => Phase::Success(p),
                    PredictionResult::Failure(f) => Phase::Failure(f),
                },
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub form: FormState,
    pub view: ViewState,
    pub catalog: Option<TeamCatalog>,
    /// Inline validation message under the form.
    pub form_message: Option<String>,
    pub logs: VecDeque<LogEntry>,
    pub service_label: String,
    pub sim_mode: bool,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(default_mode: AnalysisMode, catalog: Option<TeamCatalog>) -> Self {
        Self {
            form: FormState::new(default_mode),
            view: ViewState::default(),
            catalog,
            form_message: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            service_label: String::new(),
            sim_mode: false,
            start_time: Instant::now(),
        }
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }

    pub fn can_submit(&self) -> bool {
        self.form.is_filled() && !self.view.is_loading()
    }

    fn dispatch(&mut self, event: ViewEvent) {
        self.view = std::mem::take(&mut self.view).reduce(event);
    }

    /// Validate the form and, if it passes, move to Loading. Returns the
    /// selection the caller must send to the service. Rejections, empty
    /// fields included, land in `form_message`.
    pub fn try_submit(&mut self) -> Option<TeamSelection> {
        if self.view.is_loading() {
            return None;
        }
        match self.form.submit(self.catalog.as_ref()) {
            Ok(selection) => {
                self.form_message = None;
                tracing::info!(
                    team1 = %selection.team1,
                    team2 = %selection.team2,
                    mode = %selection.mode,
                    "prediction submitted"
                );
                self.push_log(
                    "INFO",
                    format!(
                        "Predicting {} vs {} ({})",
                        selection.team1, selection.team2, selection.mode
                    ),
                );
                self.dispatch(ViewEvent::Submit(selection.clone()));
                Some(selection)
            }
            Err(e) => {
                tracing::debug!(error = %e, "form rejected");
                self.push_log("WARN", e.to_string());
                self.form_message = Some(e.to_string());
                None
            }
        }
    }

    pub fn apply_result(&mut self, result: PredictionResult) {
        match &result {
            PredictionResult::Success(p) => {
                tracing::info!(winner = p.winner_name(), "prediction received");
                self.push_log(
                    "INFO",
                    format!(
                        "{} {}-{} {}: {}",
                        p.teams[0],
                        p.team1_score,
                        p.team2_score,
                        p.teams[1],
                        p.winner_name()
                    ),
                );
            }
            PredictionResult::Failure(f) => {
                let message = f.error.as_deref().unwrap_or("unknown error");
                tracing::warn!(error = message, "prediction failed");
                self.push_log("ERROR", message.to_string());
            }
        }
        self.dispatch(ViewEvent::ResponseReceived(result));
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {:02}m", h, m)
    }
}
