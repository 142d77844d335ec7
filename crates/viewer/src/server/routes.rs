use std::sync::Arc;

use agol_webmap_core::prelude::*;
use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use geo::Coord;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use super::ViewerState;
use crate::page::INDEX_HTML;

pub fn create_router(state: Arc<ViewerState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/map.json", get(map_json))
        .route("/query", get(query))
        .route("/health", get(health))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn map_json(State(state): State<Arc<ViewerState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.client_json.clone(),
    )
        .into_response()
}

/// A click: map coordinate, page pixel and the view resolution at the time.
#[derive(Debug, Deserialize)]
struct ClickParams {
    x: f64,
    y: f64,
    px: f64,
    py: f64,
    resolution: f64,
}

async fn query(
    State(state): State<Arc<ViewerState>>,
    Query(params): Query<ClickParams>,
) -> Response {
    if !params.resolution.is_finite() || params.resolution < 0.0 {
        return (StatusCode::BAD_REQUEST, "resolution must be a non-negative number").into_response();
    }

    let tolerance = state.hit_tolerance_px * params.resolution;
    let popups = build_popups(
        &state.map,
        [params.px, params.py],
        Coord {
            x: params.x,
            y: params.y,
        },
        tolerance,
    );
    debug!(
        "Click at ({}, {}) with tolerance {tolerance}: {} features",
        params.x,
        params.y,
        popups.len()
    );

    Json(popups).into_response()
}

async fn health() -> &'static str {
    "OK"
}
