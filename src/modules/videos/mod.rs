use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};

use crate::state::AppState;

pub mod dto;
pub mod events;
pub mod handler;
pub mod model;
pub mod pipeline;
pub mod repository;
pub mod status;

/// Uploads can be large; the default axum body limit is far too small.
const MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

pub fn router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/upload-status/{upload_id}", get(handler::upload_status))
        .route("/{id}", get(handler::get_video));

    let protected_routes = Router::new()
        .route("/upload", post(handler::upload_video))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ));

    public_routes.merge(protected_routes)
}
