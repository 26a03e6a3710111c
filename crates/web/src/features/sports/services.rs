use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        sport::{CreateSportRequest, UpdateSportRequest},
    },
    error::Result,
    models::{Competition, Sport},
    repository::{competition::CompetitionRepository, sport::SportRepository},
};
use uuid::Uuid;

/// List one page of sports
pub async fn list_sports(pool: &PgPool, page: &PaginationParams) -> Result<(Vec<Sport>, i64)> {
    let repo = SportRepository::new(pool);
    repo.list(page).await
}

pub async fn get_sport(pool: &PgPool, id: Uuid) -> Result<Sport> {
    let repo = SportRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn create_sport(pool: &PgPool, request: &CreateSportRequest) -> Result<Sport> {
    let repo = SportRepository::new(pool);
    repo.create(request).await
}

/// Update a sport
pub async fn update_sport(pool: &PgPool, id: Uuid, request: &UpdateSportRequest) -> Result<Sport> {
    let repo = SportRepository::new(pool);
    repo.update(id, request).await
}

pub async fn delete_sport(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = SportRepository::new(pool);
    repo.delete(id).await
}

/// Competitions a sport is part of
pub async fn list_competitions(pool: &PgPool, sport_id: Uuid) -> Result<Vec<Competition>> {
    let repo = CompetitionRepository::new(pool);
    repo.list_for_sport(sport_id).await
}
