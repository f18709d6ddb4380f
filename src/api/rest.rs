// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. Analysis endpoints take a bar series in
// the request body and answer from the pure engine; nothing is fetched or
// stored. Bars are checked against the configured input policy and size limit
// before any indicator is computed.
//
// CORS is configured permissively for the dashboard front-end.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::indicators::compute_panel;
use crate::runtime_config::RuntimeConfig;
use crate::signals::{generate_signals_with, price_momentum, recommend_with, PriceMomentum, SignalParams};
use crate::types::{Bar, Recommendation};
use crate::validation::{check_bars, BarError, InputPolicy};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with tracing, CORS and body-limit
/// middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        // ── Analysis ─────────────────────────────────────────────────
        .route("/api/v1/indicators", post(indicators))
        .route("/api/v1/signals", post(signals))
        .route("/api/v1/recommendation", post(recommendation))
        // ── Configuration ────────────────────────────────────────────
        .route("/api/v1/config", get(get_config).post(update_config))
        // ── Middleware & State ───────────────────────────────────────
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid bar series: {0}")]
    InvalidBars(#[from] BarError),

    #[error("{count} bars posted, the limit is {max}")]
    TooManyBars { count: usize, max: usize },

    #[error("invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBars(_) | Self::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            Self::TooManyBars { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    requests_served: u64,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        requests_served: state.requests_served(),
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Deserialize)]
struct BarsRequest {
    #[serde(default)]
    symbol: Option<String>,
    bars: Vec<Bar>,
}

/// Apply the size limit and input policy, returning the config snapshot the
/// request should be answered with.
fn accept_bars(state: &AppState, req: &BarsRequest) -> Result<RuntimeConfig, ApiError> {
    let config = state.config();

    if req.bars.len() > config.max_bars {
        warn!(
            symbol = ?req.symbol,
            count = req.bars.len(),
            max = config.max_bars,
            "bar series rejected: too many bars"
        );
        return Err(ApiError::TooManyBars {
            count: req.bars.len(),
            max: config.max_bars,
        });
    }

    if let Err(e) = check_bars(&req.bars, config.input_policy) {
        warn!(symbol = ?req.symbol, error = %e, "bar series rejected");
        return Err(e.into());
    }

    Ok(config)
}

async fn indicators(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BarsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let config = accept_bars(&state, &req)?;
    let panel = compute_panel(&req.bars, &config.signal_params);
    state.record_request();
    Ok(Json(panel))
}

async fn signals(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BarsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let config = accept_bars(&state, &req)?;
    let signals = generate_signals_with(&req.bars, &config.signal_params);
    state.record_request();
    Ok(Json(signals))
}

#[derive(Serialize)]
struct RecommendationResponse {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    generated_at: String,
    bar_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    momentum: Option<PriceMomentum>,
    tier_label: &'static str,
    tier_description: &'static str,
    recommendation: Recommendation,
}

async fn recommendation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BarsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let config = accept_bars(&state, &req)?;
    let recommendation = recommend_with(&req.bars, &config.signal_params);

    let resp = RecommendationResponse {
        id: uuid::Uuid::new_v4().to_string(),
        symbol: req.symbol,
        generated_at: chrono::Utc::now().to_rfc3339(),
        bar_count: req.bars.len(),
        momentum: price_momentum(&req.bars),
        tier_label: recommendation.tier.label(),
        tier_description: recommendation.tier.description(),
        recommendation,
    };

    let served = state.record_request();
    info!(
        id = %resp.id,
        symbol = ?resp.symbol,
        bars = resp.bar_count,
        action = %resp.recommendation.action,
        tier = %resp.recommendation.tier,
        score = resp.recommendation.score,
        served,
        "recommendation issued"
    );

    Ok(Json(resp))
}

// =============================================================================
// Configuration
// =============================================================================

async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config())
}

/// Partial update. `signal_params` may name any subset of its fields; the
/// rest keep their current values.
#[derive(Deserialize)]
struct ConfigUpdate {
    #[serde(default)]
    input_policy: Option<InputPolicy>,
    #[serde(default)]
    max_bars: Option<usize>,
    #[serde(default)]
    signal_params: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Serialize)]
struct ConfigUpdateResponse {
    config: RuntimeConfig,
    changes: Vec<String>,
}

/// Overlay the fields in `patch` onto `current`.
fn merge_params(
    current: &SignalParams,
    patch: serde_json::Map<String, serde_json::Value>,
) -> Result<SignalParams, ApiError> {
    let mut merged = match serde_json::to_value(current) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    merged.extend(patch);
    serde_json::from_value(serde_json::Value::Object(merged))
        .map_err(|e| ApiError::InvalidConfig(vec![e.to_string()]))
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfigUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let (next, changes) = {
        let mut config = state.runtime_config.write();
        let mut next = config.clone();

        if let Some(policy) = update.input_policy {
            next.input_policy = policy;
        }
        if let Some(max_bars) = update.max_bars {
            next.max_bars = max_bars;
        }
        if let Some(patch) = update.signal_params {
            next.signal_params = merge_params(&config.signal_params, patch)?;
        }

        let problems = next.problems();
        if !problems.is_empty() {
            warn!(problems = ?problems, "config update rejected");
            return Err(ApiError::InvalidConfig(problems));
        }

        let changes = describe_changes(&config, &next);
        if !changes.is_empty() {
            *config = next.clone();
            state.increment_version();
        }
        (next, changes)
    };

    if !changes.is_empty() {
        info!(changes = ?changes, "runtime config updated");

        if let Some(path) = &state.config_path {
            if let Err(e) = next.save(path) {
                warn!(error = %e, "Failed to save runtime config to disk");
            }
        }
    }

    Ok(Json(ConfigUpdateResponse {
        config: next,
        changes,
    }))
}

/// One `"field: old -> new"` line per changed setting.
fn describe_changes(old: &RuntimeConfig, new: &RuntimeConfig) -> Vec<String> {
    let mut changes = Vec::new();

    if old.input_policy != new.input_policy {
        changes.push(format!(
            "input_policy: {} -> {}",
            old.input_policy, new.input_policy
        ));
    }
    if old.max_bars != new.max_bars {
        changes.push(format!("max_bars: {} -> {}", old.max_bars, new.max_bars));
    }

    let (Ok(serde_json::Value::Object(old_params)), Ok(serde_json::Value::Object(new_params))) = (
        serde_json::to_value(&old.signal_params),
        serde_json::to_value(&new.signal_params),
    ) else {
        return changes;
    };
    for (key, new_value) in &new_params {
        if old_params.get(key) != Some(new_value) {
            let old_value = old_params
                .get(key)
                .map(|v| v.to_string())
                .unwrap_or_default();
            changes.push(format!("signal_params.{key}: {old_value} -> {new_value}"));
        }
    }

    changes
}
