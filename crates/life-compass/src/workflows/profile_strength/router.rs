use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AreaMap, AreaSignal, ProfileMetrics, ProfileStrengthInput};
use super::ledger::LedgerStore;
use super::scoring::{AreaWeights, ScoringEngine};
use super::service::ProfileStrengthService;
use super::signals::ProfileDataSource;

/// Body for scoring caller-supplied signals without touching any store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub signals: AreaMap<AreaSignal>,
    #[serde(default)]
    pub weights: Option<AreaWeights>,
    #[serde(default)]
    pub computed_at: Option<DateTime<Utc>>,
}

/// Router builder exposing the scorer and the per-user refresh cycle.
pub fn profile_strength_router<S, L>(service: Arc<ProfileStrengthService<S, L>>) -> Router
where
    S: ProfileDataSource + 'static,
    L: LedgerStore + 'static,
{
    Router::new()
        .route("/api/v1/profile-strength/score", post(score_handler::<S, L>))
        .route(
            "/api/v1/profile-strength/:user_id/refresh",
            post(refresh_handler::<S, L>),
        )
        .route(
            "/api/v1/profile-strength/:user_id/ledger",
            get(ledger_handler::<S, L>),
        )
        .with_state(service)
}

pub(crate) async fn score_handler<S, L>(
    State(service): State<Arc<ProfileStrengthService<S, L>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    S: ProfileDataSource + 'static,
    L: LedgerStore + 'static,
{
    let ScoreRequest {
        signals,
        weights,
        computed_at,
    } = request;

    let engine = match weights {
        Some(weights) => ScoringEngine::new(weights),
        None => service.engine().clone(),
    };
    let input = ProfileStrengthInput {
        signals,
        metrics: ProfileMetrics::default(),
        computed_at: computed_at.unwrap_or_else(Utc::now),
    };

    (StatusCode::OK, axum::Json(engine.score(&input))).into_response()
}

pub(crate) async fn refresh_handler<S, L>(
    State(service): State<Arc<ProfileStrengthService<S, L>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: ProfileDataSource + 'static,
    L: LedgerStore + 'static,
{
    match service.refresh(Some(&user_id), Utc::now()).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn ledger_handler<S, L>(
    State(service): State<Arc<ProfileStrengthService<S, L>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: ProfileDataSource + 'static,
    L: LedgerStore + 'static,
{
    let state = service.ledger(Some(&user_id));
    (StatusCode::OK, axum::Json(state)).into_response()
}
