use axum::{
    extract::{Json, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use app_api::{
    CreateAccountRequest, CurrentCycleUsageRequest, CycleHistoryRequest, UpdateAccountRequest,
};

use crate::{errors::HttpError, state::HttpState};

type JsonBody<T> = Result<Json<T>, JsonRejection>;

pub async fn cycle_history(
    State(state): State<HttpState>,
    body: JsonBody<CycleHistoryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = body?;
    let response = state
        .run(move |ctx, deadline| app_api::cycle_history(ctx, req, deadline))
        .await?;
    Ok(Json(response))
}

pub async fn current_cycle_usage(
    State(state): State<HttpState>,
    body: JsonBody<CurrentCycleUsageRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = body?;
    let response = state
        .run(move |ctx, deadline| app_api::current_cycle_usage(ctx, req, deadline))
        .await?;
    Ok(Json(response))
}

pub async fn create_account(
    State(state): State<HttpState>,
    body: JsonBody<CreateAccountRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = body?;
    let response = state
        .run(move |ctx, deadline| app_api::create_account(ctx, req, deadline))
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_account(
    State(state): State<HttpState>,
    Path(id): Path<String>,
    body: JsonBody<UpdateAccountRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = body?;
    let response = state
        .run(move |ctx, deadline| app_api::update_account(ctx, &id, req, deadline))
        .await?;
    Ok(Json(response))
}

pub async fn health(State(state): State<HttpState>) -> Result<impl IntoResponse, HttpError> {
    let report = state
        .run(|ctx, deadline| Ok(app_api::health(ctx, deadline)))
        .await?;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    Ok((status, Json(report)))
}

pub async fn not_found() -> HttpError {
    HttpError::new(
        StatusCode::NOT_FOUND,
        "route not found",
        Some("not_found".to_string()),
    )
}
