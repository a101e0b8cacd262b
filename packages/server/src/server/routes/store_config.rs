//! Store configuration and public display handlers.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use brightdata_client::FetchOutcome;

use crate::domains::store_config::activities::{
    build_store_display, load_store_config, scrape_store_links, update_store_config,
};
use crate::domains::store_config::{StoreConfig, StoreConfigUpdate, StoreDisplay};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

/// GET /api/store/config
pub async fn get_store_config(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<Json<StoreConfig>, ApiError> {
    let config = load_store_config(&user.user_id, &state.deps).await?;
    Ok(Json(config))
}

/// PUT /api/store/config
pub async fn put_store_config(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(update): Json<StoreConfigUpdate>,
) -> Result<Json<StoreConfig>, ApiError> {
    let config = update_store_config(&user.user_id, update, &state.deps).await?;
    Ok(Json(config))
}

/// POST /api/store/scrape
pub async fn scrape_store(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<(StatusCode, Json<Vec<FetchOutcome>>), ApiError> {
    let outcomes = scrape_store_links(&user.user_id, &state.deps).await?;
    let status = if outcomes.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::ACCEPTED
    };
    Ok((status, Json(outcomes)))
}

/// GET /api/display/:user_id (public)
pub async fn get_store_display(
    Extension(state): Extension<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<StoreDisplay>, ApiError> {
    let display = build_store_display(&user_id, &state.deps).await?;
    let display = display.ok_or_else(|| ApiError::NotFound(format!("Store {}", user_id)))?;
    Ok(Json(display))
}
