use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        stage::{CreateStageRequest, StageFilter, UpdateStageRequest},
    },
    error::Result,
    models::Stage,
    repository::stage::StageRepository,
};
use uuid::Uuid;

pub async fn list_stages(
    pool: &PgPool,
    filter: &StageFilter,
    page: &PaginationParams,
) -> Result<(Vec<Stage>, i64)> {
    let repo = StageRepository::new(pool);
    repo.list(filter, page).await
}

pub async fn get_stage(pool: &PgPool, id: Uuid) -> Result<Stage> {
    let repo = StageRepository::new(pool);
    repo.find_by_id(id).await
}

/// Schedule a stage under an associated competition and sport
pub async fn create_stage(pool: &PgPool, request: &CreateStageRequest) -> Result<Stage> {
    let repo = StageRepository::new(pool);
    repo.create(request).await
}

pub async fn update_stage(pool: &PgPool, id: Uuid, request: &UpdateStageRequest) -> Result<Stage> {
    let repo = StageRepository::new(pool);
    repo.update(id, request).await
}

pub async fn delete_stage(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = StageRepository::new(pool);
    repo.delete(id).await
}
