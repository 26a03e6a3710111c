use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        stage::{CreateStageRequest, StageFilter, StageResponse, UpdateStageRequest},
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::{AppJson, AppPath, AppQuery};

use super::services;

#[utoipa::path(
    get,
    path = "/api/stages",
    params(PaginationParams, StageFilter),
    responses(
        (status = 200, description = "One page of stages ordered by start time", body = PaginatedResponse<StageResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "stages"
)]
pub async fn list_stages(
    State(db): State<Database>,
    AppQuery(page): AppQuery<PaginationParams>,
    AppQuery(filter): AppQuery<StageFilter>,
) -> Result<Json<PaginatedResponse<StageResponse>>, WebError> {
    page.validate().map_err(WebError::BadRequest)?;

    let (stages, total_items) = services::list_stages(db.pool(), &filter, &page).await?;

    Ok(Json(
        PaginatedResponse::new(stages, &page, total_items).map(StageResponse::from),
    ))
}

#[utoipa::path(
    get,
    path = "/api/stages/{id}",
    params(
        ("id" = Uuid, Path, description = "Stage ID")
    ),
    responses(
        (status = 200, description = "Stage found", body = StageResponse),
        (status = 404, description = "Stage not found")
    ),
    tag = "stages"
)]
pub async fn get_stage(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, WebError> {
    let stage = services::get_stage(db.pool(), id).await?;

    Ok(Json(StageResponse::from(stage)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/stages",
    request_body = CreateStageRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Stage created successfully", body = StageResponse),
        (status = 400, description = "Validation error or date outside the competition"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Stage name already used for this competition and sport"),
        (status = 422, description = "Sport is not part of the competition")
    ),
    tag = "stages"
)]
pub async fn create_stage(
    State(db): State<Database>,
    AppJson(req): AppJson<CreateStageRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let stage = services::create_stage(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(StageResponse::from(stage))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/stages/{id}",
    params(
        ("id" = Uuid, Path, description = "Stage ID")
    ),
    request_body = UpdateStageRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Stage updated successfully", body = StageResponse),
        (status = 400, description = "Validation error or date outside the competition"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Stage not found"),
        (status = 409, description = "Stage name already used for this competition and sport"),
        (status = 422, description = "Sport is not part of the competition")
    ),
    tag = "stages"
)]
pub async fn update_stage(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update_req): AppJson<UpdateStageRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_stage(db.pool(), id, &update_req).await?;

    Ok(Json(StageResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/stages/{id}",
    params(
        ("id" = Uuid, Path, description = "Stage ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Stage deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Stage not found")
    ),
    tag = "stages"
)]
pub async fn delete_stage(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, WebError> {
    services::delete_stage(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
