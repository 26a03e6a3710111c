use sqlx::PgPool;
use storage::{
    dto::overview::OverviewResponse, error::Result, repository::overview::OverviewRepository,
};

pub async fn get_overview(pool: &PgPool) -> Result<OverviewResponse> {
    let repo = OverviewRepository::new(pool);
    repo.counts().await
}
