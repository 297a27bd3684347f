mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

pub use errors::HttpError;
pub use middleware::{REQUEST_ID_HEADER, RequestId};
pub use state::HttpState;

pub fn router(state: HttpState) -> Router<()> {
    let v1 = Router::new()
        .route("/cycles/history", post(handlers::cycle_history))
        .route("/usage/current-cycle", post(handlers::current_cycle_usage));

    let api = Router::new()
        .nest("/v1", v1)
        .route("/users", post(handlers::create_account))
        .route("/users/:id", put(handlers::update_account));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(middleware::request_id))
        .with_state(state)
}
