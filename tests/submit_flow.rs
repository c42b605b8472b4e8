// End-to-end form -> service -> result pane flow with an in-memory service

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use match_predictor::engine::catalog::TeamCatalog;
    use match_predictor::service::simulated::SimulatedService;
    use match_predictor::service::types::{
        AnalysisMode, PredictionResult, TeamSelection, WireResult,
    };
    use match_predictor::service::PredictionService;
    use match_predictor::tui::state::{AppState, Phase};
    use match_predictor::tui::view::{self, ResultView};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Replays a fixed wire body and counts how often it was asked.
    struct CountingService {
        calls: AtomicUsize,
        body: &'static str,
    }

    impl CountingService {
        fn new(body: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                body,
            }
        }
    }

    #[async_trait]
    impl PredictionService for CountingService {
        async fn predict(&self, selection: &TeamSelection) -> PredictionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            PredictionResult::from_json(self.body.as_bytes(), selection.mode).unwrap()
        }

        async fn fetch_teams(&self) -> anyhow::Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn label(&self) -> String {
            "counting".to_string()
        }
    }

    const DRAW_BODY: &str = r#"{"success": true, "prediction_type": "basic",
        "teams": ["Everton", "Fulham"], "predicted_winner": "Draw",
        "team1_score": 1, "team2_score": 1, "comparisons": [], "stats_summary": []}"#;

    /// What the event loop does on Enter, minus the terminal.
    async fn submit(app: &mut AppState, service: &dyn PredictionService) {
        if let Some(selection) = app.try_submit() {
            let result = service.predict(&selection).await;
            app.apply_result(result);
        }
    }

    #[tokio::test]
    async fn test_duplicate_teams_never_reach_service() {
        let service = CountingService::new(DRAW_BODY);
        let mut app = AppState::new(AnalysisMode::Basic, None);
        app.form.team1 = "Arsenal".to_string();
        app.form.team2 = "arsenal".to_string();

        submit(&mut app, &service).await;

        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert_eq!(app.view.phase, Phase::Idle);
        assert_eq!(
            app.form_message.as_deref(),
            Some("Please enter two different teams.")
        );
    }

    #[tokio::test]
    async fn test_unknown_team_rejected_by_catalog() {
        let service = CountingService::new(DRAW_BODY);
        let mut app = AppState::new(AnalysisMode::Basic, Some(TeamCatalog::builtin()));
        app.form.team1 = "Everton".to_string();
        app.form.team2 = "Barcelona".to_string();

        submit(&mut app, &service).await;

        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        let message = app.form_message.unwrap();
        assert!(message.starts_with("Unknown team name \"Barcelona\""));
    }

    #[tokio::test]
    async fn test_draw_flows_to_result_pane() {
        let service = CountingService::new(DRAW_BODY);
        let mut app = AppState::new(AnalysisMode::Basic, Some(TeamCatalog::builtin()));
        app.form.team1 = "everton".to_string();
        app.form.team2 = "FULHAM".to_string();

        submit(&mut app, &service).await;

        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            app.view.selection,
            Some(TeamSelection {
                team1: "Everton".to_string(),
                team2: "Fulham".to_string(),
                mode: AnalysisMode::Basic,
            })
        );
        let Phase::Success(p) = &app.view.phase else {
            panic!("expected success, got {:?}", app.view.phase);
        };
        let ResultView::Prediction(pv) = view::build(&PredictionResult::Success(p.clone())) else {
            panic!("expected prediction view");
        };
        assert!(pv.score.is_draw);
        assert_eq!(pv.score.scoreline, "1–1");
        assert_eq!(pv.score.announcement, "🤝 Match Predicted as Draw");
        assert!(pv.comparisons.is_empty());
    }

    #[tokio::test]
    async fn test_simulated_service_fills_advanced_sections() {
        let service = SimulatedService::with_seed(7, Duration::ZERO);
        let mut app = AppState::new(AnalysisMode::Advanced, Some(TeamCatalog::builtin()));
        app.form.team1 = "Wolves".to_string();
        app.form.team2 = "Brentford".to_string();

        submit(&mut app, &service).await;

        let Phase::Success(p) = &app.view.phase else {
            panic!("expected success, got {:?}", app.view.phase);
        };
        assert_eq!(p.comparisons.len(), 4);
        assert_eq!(p.stats_summary.len(), 2);
        assert!(p.disclaimer.is_some());

        // Wire shape stays consistent with what was decoded.
        let wire = WireResult::from(&PredictionResult::Success(p.clone()));
        assert_eq!(wire.teams, vec!["Wolves".to_string(), "Brentford".to_string()]);
        assert_eq!(wire.prediction_type, Some(AnalysisMode::Advanced));
    }
}
