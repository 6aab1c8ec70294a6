use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::{Json, Redirect},
    routing::{get, post},
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::cache::{CACHE_DURATION_MS, LotteryCache};
use crate::demo::generate_fallback_data;
use crate::fetch::{LotterySource, fetch_lottery_data, is_valid_data};
use crate::types::LotteryApiResponse;
use crate::utils::{now_ms, vn_now};

/// Shared state for the API handlers: the single cache slot and the
/// fixed source chain, both owned explicitly rather than as globals.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<LotteryCache>,
    pub sources: Arc<Vec<Box<dyn LotterySource>>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LotteryQuery {
    pub refresh: Option<String>,
}

/// `GET /api/lottery/hcm`. Serves the cached result while fresh unless
/// `refresh=true`; otherwise runs the source chain and, when that comes
/// up empty, substitutes demo data. Always answers 200 — degraded
/// results are only visible through `isDemo` and `error`.
pub async fn get_lottery_hcm(
    State(state): State<AppState>,
    Query(query): Query<LotteryQuery>,
) -> Json<LotteryApiResponse> {
    let force_refresh = query.refresh.as_deref() == Some("true");
    let now = now_ms();

    if !force_refresh && state.cache.is_fresh(now, CACHE_DURATION_MS).await {
        if let Some((data, last_update)) = state.cache.get().await {
            tracing::info!("Returning cached XSHCM data");
            return Json(LotteryApiResponse {
                success: true,
                data,
                cached: true,
                last_update,
                error: None,
            });
        }
    }

    let data = match fetch_lottery_data(&state.sources).await {
        Some(data) if is_valid_data(&data) => data,
        _ => {
            tracing::warn!("Using fallback data for XSHCM");
            generate_fallback_data()
        }
    };

    state.cache.put(data.clone(), now).await;

    Json(LotteryApiResponse {
        success: true,
        data,
        cached: false,
        last_update: now,
        error: None,
    })
}

/// Legacy multi-region routes all point at the one region we serve.
pub async fn lottery_region_redirect() -> Redirect {
    Redirect::to("/api/lottery/hcm")
}

pub async fn get_time() -> Json<Value> {
    Json(json!({
        "serverTime": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "localTime": vn_now().format("%d/%m/%Y %H:%M:%S").to_string(),
    }))
}

pub async fn get_schedule() -> Json<Value> {
    Json(json!({
        "hcm": {
            "days": ["Thứ 2", "Thứ 7"],
            "time": "16:15",
            "note": "Xổ số TP.HCM quay vào Thứ 2 và Thứ 7 hàng tuần lúc 16:15"
        }
    }))
}

pub async fn clear_cache(State(state): State<AppState>) -> Json<Value> {
    state.cache.clear().await;
    tracing::info!("Cache cleared");
    Json(json!({ "success": true, "message": "Cache cleared" }))
}

pub fn create_router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/lottery/hcm", get(get_lottery_hcm))
        .route("/api/lottery/{region}", get(lottery_region_redirect))
        .route("/api/time", get(get_time))
        .route("/api/schedule", get(get_schedule))
        .route("/api/clear-cache", post(clear_cache))
        // Front-end entry page and assets, index.html at `/`.
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(cors)
}
