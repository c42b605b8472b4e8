// Integration tests for the HTTP prediction client against a stub service

#[cfg(test)]
mod tests {
    use axum::http::{header::CONTENT_TYPE, StatusCode};
    use axum::routing::{get, post};
    use axum::{extract::State, Json, Router};
    use match_predictor::config::{CatalogConfig, CatalogSource, ServiceConfig};
    use match_predictor::engine::catalog::load_catalog;
    use match_predictor::service::http::HttpPredictionService;
    use match_predictor::service::types::{
        AnalysisMode, PredictionResult, TeamSelection, Winner, CONNECT_FAILURE_MESSAGE,
    };
    use match_predictor::service::PredictionService;
    use match_predictor::tui::view::{self, ResultView};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<Value>>>;

    const ADVANCED_SUCCESS: &str = r#"{
        "success": true,
        "prediction_type": "advanced",
        "teams": ["Arsenal", "Chelsea"],
        "predicted_winner": "Arsenal",
        "team1_score": 2,
        "team2_score": 1,
        "comparisons": [
            {"metric": "Tackles Won", "team1_value": 18.2, "team2_value": 15.0, "winner": "Arsenal"},
            {"metric": "Saves", "team1_value": 3.1, "team2_value": 4.4, "winner": "Chelsea"}
        ],
        "stats_summary": [
            {"Squad": "Arsenal", "Passing_Acc": 84.3, "Tackles_Won": 18.2},
            {"Squad": "Chelsea", "Passing_Acc": 81.9, "Tackles_Won": 15.0}
        ],
        "disclaimer": "Predictions are estimates."
    }"#;

    const SERVICE_FAILURE: &str = r#"{
        "success": false,
        "prediction_type": "basic",
        "teams": ["Arsenal", "Luton Town"],
        "error": "Insufficient data for Luton Town"
    }"#;

    /// Serve `body` with `status` on the predict route, recording each
    /// request body it sees.
    async fn spawn_stub(status: StatusCode, body: &'static str) -> (ServiceConfig, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(
                "/api/predict",
                post(move |State(seen): State<Seen>, Json(req): Json<Value>| async move {
                    seen.lock().unwrap().push(req);
                    (status, [(CONTENT_TYPE, "application/json")], body)
                }),
            )
            .route(
                "/api/teams",
                get(|| async {
                    Json(serde_json::json!({
                        "success": true,
                        "teams": ["Liverpool", "arsenal", "Everton"]
                    }))
                }),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = ServiceConfig {
            base_url: format!("http://{}", addr),
            ..ServiceConfig::default()
        };
        (config, seen)
    }

    fn selection(team1: &str, team2: &str, mode: AnalysisMode) -> TeamSelection {
        TeamSelection {
            team1: team1.to_string(),
            team2: team2.to_string(),
            mode,
        }
    }

    #[tokio::test]
    async fn test_success_round_trip() {
        let (config, seen) = spawn_stub(StatusCode::OK, ADVANCED_SUCCESS).await;
        let service = HttpPredictionService::new(&config).unwrap();

        let result = service
            .predict(&selection("Arsenal", "Chelsea", AnalysisMode::Advanced))
            .await;

        let PredictionResult::Success(p) = result else {
            panic!("expected success, got {:?}", result);
        };
        assert_eq!(p.winner, Winner::Team1);
        assert_eq!(p.team1_score, 2.0);
        assert_eq!(p.comparisons.len(), 2);
        assert_eq!(p.comparisons[1].metric, "Saves");
        assert_eq!(p.stats_summary[1].squad, "Chelsea");
        assert_eq!(p.disclaimer.as_deref(), Some("Predictions are estimates."));

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0],
            serde_json::json!({
                "team1": "Arsenal",
                "team2": "Chelsea",
                "prediction_type": "advanced"
            })
        );
    }

    #[tokio::test]
    async fn test_undeclared_mode_keeps_requested_mode() {
        let body = r#"{"success": true, "teams": ["Arsenal", "Chelsea"],
            "predicted_winner": "Draw", "team1_score": 1, "team2_score": 1}"#;
        let (config, _seen) = spawn_stub(StatusCode::OK, body).await;
        let service = HttpPredictionService::new(&config).unwrap();

        let result = service
            .predict(&selection("Arsenal", "Chelsea", AnalysisMode::Advanced))
            .await;

        let ResultView::Prediction(pv) = view::build(&result) else {
            panic!("expected prediction view, got {:?}", result);
        };
        assert_eq!(pv.header.mode, "Advanced Multi-Metric Analysis");
        assert!(pv.score.is_draw);
    }

    #[tokio::test]
    async fn test_service_failure_passes_through_on_500() {
        let (config, seen) = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, SERVICE_FAILURE).await;
        let service = HttpPredictionService::new(&config).unwrap();

        let result = service
            .predict(&selection("Arsenal", "Luton Town", AnalysisMode::Basic))
            .await;

        let PredictionResult::Failure(f) = result else {
            panic!("expected failure, got {:?}", result);
        };
        assert_eq!(f.error.as_deref(), Some("Insufficient data for Luton Town"));
        assert_eq!(f.teams, ["Arsenal".to_string(), "Luton Town".to_string()]);
        assert_eq!(seen.lock().unwrap()[0]["prediction_type"], "basic");
    }

    #[tokio::test]
    async fn test_malformed_body_becomes_connection_failure() {
        let (config, seen) = spawn_stub(StatusCode::OK, "<html>oops</html>").await;
        let service = HttpPredictionService::new(&config).unwrap();
        let sel = selection("Arsenal", "Chelsea", AnalysisMode::Basic);

        let result = service.predict(&sel).await;

        let PredictionResult::Failure(f) = result else {
            panic!("expected failure, got {:?}", result);
        };
        assert_eq!(f.error.as_deref(), Some(CONNECT_FAILURE_MESSAGE));
        assert_eq!(f.teams, sel.teams());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_winner_outside_teams_is_rejected() {
        let body = r#"{"success": true, "prediction_type": "basic",
            "teams": ["Arsenal", "Chelsea"], "predicted_winner": "Everton",
            "team1_score": 1, "team2_score": 0, "comparisons": [], "stats_summary": []}"#;
        let (config, _seen) = spawn_stub(StatusCode::OK, body).await;
        let service = HttpPredictionService::new(&config).unwrap();

        let result = service
            .predict(&selection("Arsenal", "Chelsea", AnalysisMode::Basic))
            .await;
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_catalog_comes_from_service() {
        let (config, _seen) = spawn_stub(StatusCode::OK, ADVANCED_SUCCESS).await;
        let service = HttpPredictionService::new(&config).unwrap();
        let catalog_config = CatalogConfig {
            source: CatalogSource::Service,
            teams: None,
        };

        let catalog = load_catalog(&catalog_config, &service).await.unwrap();
        assert_eq!(catalog.teams(), ["arsenal", "Everton", "Liverpool"]);
    }
}
