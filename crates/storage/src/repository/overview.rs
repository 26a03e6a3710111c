use sqlx::PgPool;

use crate::dto::overview::OverviewResponse;
use crate::error::Result;

pub struct OverviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OverviewRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count every entity in a single round trip
    pub async fn counts(&self) -> Result<OverviewResponse> {
        let (competitions, sports, stages) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM competition_schema.competition),
                (SELECT COUNT(*) FROM competition_schema.sport),
                (SELECT COUNT(*) FROM competition_schema.stage)
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(OverviewResponse {
            competitions,
            sports,
            stages,
        })
    }
}
