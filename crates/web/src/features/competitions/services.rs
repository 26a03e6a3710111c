use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        competition::{CreateCompetitionRequest, UpdateCompetitionRequest},
    },
    error::Result,
    models::{Competition, CompetitionSport, Sport, Stage},
    repository::{
        competition::CompetitionRepository, sport::SportRepository, stage::StageRepository,
    },
};
use uuid::Uuid;

/// List one page of competitions
pub async fn list_competitions(
    pool: &PgPool,
    page: &PaginationParams,
) -> Result<(Vec<Competition>, i64)> {
    let repo = CompetitionRepository::new(pool);
    repo.list(page).await
}

pub async fn get_competition(pool: &PgPool, id: Uuid) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    repo.find_by_id(id).await
}

/// Create a new competition
pub async fn create_competition(
    pool: &PgPool,
    request: &CreateCompetitionRequest,
) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    repo.create(request).await
}

/// Update a competition
pub async fn update_competition(
    pool: &PgPool,
    id: Uuid,
    request: &UpdateCompetitionRequest,
) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    repo.update(id, request).await
}

/// Delete a competition
pub async fn delete_competition(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = CompetitionRepository::new(pool);
    repo.delete(id).await
}

pub async fn list_sports(pool: &PgPool, competition_id: Uuid) -> Result<Vec<Sport>> {
    let repo = SportRepository::new(pool);
    repo.list_for_competition(competition_id).await
}

pub async fn associate_sports(
    pool: &PgPool,
    competition_id: Uuid,
    sport_ids: &[Uuid],
) -> Result<Vec<CompetitionSport>> {
    let repo = CompetitionRepository::new(pool);
    repo.associate_sports(competition_id, sport_ids).await
}

pub async fn dissociate_sport(pool: &PgPool, competition_id: Uuid, sport_id: Uuid) -> Result<()> {
    let repo = CompetitionRepository::new(pool);
    repo.dissociate_sport(competition_id, sport_id).await
}

/// Stages of a sport within a competition, in schedule order
pub async fn list_stages(pool: &PgPool, competition_id: Uuid, sport_id: Uuid) -> Result<Vec<Stage>> {
    let repo = StageRepository::new(pool);
    repo.list_for_pair(competition_id, sport_id).await
}
