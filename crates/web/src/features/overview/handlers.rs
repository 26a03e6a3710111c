use axum::{Json, extract::State};
use storage::{Database, dto::overview::OverviewResponse};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/overview",
    responses(
        (status = 200, description = "Number of competitions, sports and stages", body = OverviewResponse)
    ),
    tag = "overview"
)]
pub async fn get_overview(State(db): State<Database>) -> Result<Json<OverviewResponse>, WebError> {
    let overview = services::get_overview(db.pool()).await?;

    Ok(Json(overview))
}
