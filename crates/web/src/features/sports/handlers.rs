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
        competition::CompetitionResponse,
        sport::{CreateSportRequest, SportResponse, UpdateSportRequest},
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::{AppJson, AppPath, AppQuery};

use super::services;

#[utoipa::path(
    get,
    path = "/api/sports",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of sports ordered by name", body = PaginatedResponse<SportResponse>),
        (status = 400, description = "Invalid pagination parameters")
    ),
    tag = "sports"
)]
pub async fn list_sports(
    State(db): State<Database>,
    AppQuery(page): AppQuery<PaginationParams>,
) -> Result<Json<PaginatedResponse<SportResponse>>, WebError> {
    page.validate().map_err(WebError::BadRequest)?;

    let (sports, total_items) = services::list_sports(db.pool(), &page).await?;

    Ok(Json(
        PaginatedResponse::new(sports, &page, total_items).map(SportResponse::from),
    ))
}

#[utoipa::path(
    get,
    path = "/api/sports/{id}",
    params(
        ("id" = Uuid, Path, description = "Sport ID")
    ),
    responses(
        (status = 200, description = "Sport found", body = SportResponse),
        (status = 404, description = "Sport not found")
    ),
    tag = "sports"
)]
pub async fn get_sport(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, WebError> {
    let sport = services::get_sport(db.pool(), id).await?;

    Ok(Json(SportResponse::from(sport)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/sports",
    request_body = CreateSportRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Sport created successfully", body = SportResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Sport name already exists")
    ),
    tag = "sports"
)]
pub async fn create_sport(
    State(db): State<Database>,
    AppJson(req): AppJson<CreateSportRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let sport = services::create_sport(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(SportResponse::from(sport))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/sports/{id}",
    params(
        ("id" = Uuid, Path, description = "Sport ID")
    ),
    request_body = UpdateSportRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Sport updated successfully", body = SportResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Sport not found"),
        (status = 409, description = "Sport name already exists")
    ),
    tag = "sports"
)]
pub async fn update_sport(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update_req): AppJson<UpdateSportRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_sport(db.pool(), id, &update_req).await?;

    Ok(Json(SportResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/sports/{id}",
    params(
        ("id" = Uuid, Path, description = "Sport ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Sport deleted along with its competition links and stages"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Sport not found")
    ),
    tag = "sports"
)]
pub async fn delete_sport(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, WebError> {
    services::delete_sport(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/sports/{id}/competitions",
    params(
        ("id" = Uuid, Path, description = "Sport ID")
    ),
    responses(
        (status = 200, description = "Competitions including the sport", body = Vec<CompetitionResponse>),
        (status = 404, description = "Sport not found")
    ),
    tag = "sports"
)]
pub async fn list_sport_competitions(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Vec<CompetitionResponse>>, WebError> {
    let competitions = services::list_competitions(db.pool(), id).await?;

    Ok(Json(
        competitions
            .into_iter()
            .map(CompetitionResponse::from)
            .collect(),
    ))
}
