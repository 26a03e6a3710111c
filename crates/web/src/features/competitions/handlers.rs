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
        competition::{
            AssociateSportsRequest, CompetitionResponse, CreateCompetitionRequest,
            UpdateCompetitionRequest,
        },
        sport::SportResponse,
        stage::StageResponse,
    },
    models::CompetitionSport,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::{AppJson, AppPath, AppQuery};

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of competitions ordered by start date", body = PaginatedResponse<CompetitionResponse>),
        (status = 400, description = "Invalid pagination parameters")
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(db): State<Database>,
    AppQuery(page): AppQuery<PaginationParams>,
) -> Result<Json<PaginatedResponse<CompetitionResponse>>, WebError> {
    page.validate().map_err(WebError::BadRequest)?;

    let (competitions, total_items) = services::list_competitions(db.pool(), &page).await?;

    let response =
        PaginatedResponse::new(competitions, &page, total_items).map(CompetitionResponse::from);

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Competition found", body = CompetitionResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, WebError> {
    let competition = services::get_competition(db.pool(), id).await?;

    Ok(Json(CompetitionResponse::from(competition)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions",
    request_body = CreateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Competition created successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Competition name already exists"),
        (status = 422, description = "Unknown sport")
    ),
    tag = "competitions"
)]
pub async fn create_competition(
    State(db): State<Database>,
    AppJson(req): AppJson<CreateCompetitionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    req.validate_dates()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let competition = services::create_competition(db.pool(), &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompetitionResponse::from(competition)),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = UpdateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Competition updated successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error or stages outside the new dates"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Competition name already exists")
    ),
    tag = "competitions"
)]
pub async fn update_competition(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update_req): AppJson<UpdateCompetitionRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_competition(db.pool(), id, &update_req).await?;

    Ok(Json(CompetitionResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Competition, its sport links and stages deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn delete_competition(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Response, WebError> {
    services::delete_competition(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}/sports",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Sports included in the competition", body = Vec<SportResponse>),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn list_competition_sports(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Vec<SportResponse>>, WebError> {
    let sports = services::list_sports(db.pool(), id).await?;

    Ok(Json(sports.into_iter().map(SportResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/sports",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = AssociateSportsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Sports linked; already linked sports are left as they were", body = Vec<CompetitionSport>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found"),
        (status = 422, description = "Unknown sport")
    ),
    tag = "competitions"
)]
pub async fn associate_sports(
    State(db): State<Database>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<AssociateSportsRequest>,
) -> Result<Json<Vec<CompetitionSport>>, WebError> {
    req.validate()?;

    let associations = services::associate_sports(db.pool(), id, &req.sport_ids).await?;

    Ok(Json(associations))
}

#[utoipa::path(
    delete,
    path = "/api/competitions/{id}/sports/{sport_id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID"),
        ("sport_id" = Uuid, Path, description = "Sport ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Sport removed from the competition with its stages"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Sport is not part of the competition")
    ),
    tag = "competitions"
)]
pub async fn dissociate_sport(
    State(db): State<Database>,
    AppPath((id, sport_id)): AppPath<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    services::dissociate_sport(db.pool(), id, sport_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}/sports/{sport_id}/stages",
    params(
        ("id" = Uuid, Path, description = "Competition ID"),
        ("sport_id" = Uuid, Path, description = "Sport ID")
    ),
    responses(
        (status = 200, description = "Stages of the sport in this competition, ordered by start time", body = Vec<StageResponse>),
        (status = 404, description = "Sport is not part of the competition")
    ),
    tag = "competitions"
)]
pub async fn list_pair_stages(
    State(db): State<Database>,
    AppPath((id, sport_id)): AppPath<(Uuid, Uuid)>,
) -> Result<Json<Vec<StageResponse>>, WebError> {
    let stages = services::list_stages(db.pool(), id, sport_id).await?;

    Ok(Json(stages.into_iter().map(StageResponse::from).collect()))
}
