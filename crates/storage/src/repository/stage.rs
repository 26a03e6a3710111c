use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::stage::{CreateStageRequest, StageFilter, UpdateStageRequest};
use crate::error::{ConstraintMessages, Result, StorageError};
use crate::models::{CompetitionPeriod, Stage};

const STAGE_CONSTRAINTS: ConstraintMessages = ConstraintMessages {
    unique: "Stage name already used for this competition and sport",
    foreign_key: "Sport is not part of the competition",
    check: "Stage name must not be blank",
};

const STAGE_COLUMNS: &str =
    "stage_id, competition_id, sport_id, name, starts_at, place, created_at, modified_at";

/// Repository for Stage database operations
pub struct StageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StageRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one page of stages, optionally narrowed to a competition and/or sport
    pub async fn list(
        &self,
        filter: &StageFilter,
        page: &PaginationParams,
    ) -> Result<(Vec<Stage>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM competition_schema.stage WHERE 1=1",
        );
        push_filter(&mut count, filter);

        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT ");
        query.push(STAGE_COLUMNS);
        query.push(" FROM competition_schema.stage WHERE 1=1");
        push_filter(&mut query, filter);
        query.push(" ORDER BY starts_at, name LIMIT ");
        query.push_bind(page.limit());
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let stages = query.build_query_as::<Stage>().fetch_all(self.pool).await?;

        Ok((stages, total))
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM competition_schema.stage")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Stages of one sport within one competition, in schedule order.
    ///
    /// Fails with `NotFound` when the sport is not part of the competition.
    pub async fn list_for_pair(&self, competition_id: Uuid, sport_id: Uuid) -> Result<Vec<Stage>> {
        let associated = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM competition_schema.competition_sport
                WHERE competition_id = $1 AND sport_id = $2
            )
            "#,
        )
        .bind(competition_id)
        .bind(sport_id)
        .fetch_one(self.pool)
        .await?;

        if !associated {
            return Err(StorageError::NotFound);
        }

        let stages = sqlx::query_as::<_, Stage>(
            r#"
            SELECT stage_id, competition_id, sport_id, name, starts_at, place, created_at, modified_at
            FROM competition_schema.stage
            WHERE competition_id = $1 AND sport_id = $2
            ORDER BY starts_at, name
            "#,
        )
        .bind(competition_id)
        .bind(sport_id)
        .fetch_all(self.pool)
        .await?;

        Ok(stages)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Stage> {
        sqlx::query_as::<_, Stage>(
            r#"
            SELECT stage_id, competition_id, sport_id, name, starts_at, place, created_at, modified_at
            FROM competition_schema.stage
            WHERE stage_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Schedule a new stage for an associated (competition, sport) pair
    pub async fn create(&self, req: &CreateStageRequest) -> Result<Stage> {
        let mut tx = self.pool.begin().await?;

        check_placement(&mut tx, req.competition_id, req.sport_id, req.starts_at).await?;

        let stage = sqlx::query_as::<_, Stage>(
            r#"
            INSERT INTO competition_schema.stage (competition_id, sport_id, name, starts_at, place)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING stage_id, competition_id, sport_id, name, starts_at, place, created_at, modified_at
            "#,
        )
        .bind(req.competition_id)
        .bind(req.sport_id)
        .bind(&req.name)
        .bind(req.starts_at)
        .bind(&req.place)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StorageError::classify(e, STAGE_CONSTRAINTS))?;

        tx.commit().await?;

        tracing::info!(
            stage_id = %stage.stage_id,
            competition_id = %stage.competition_id,
            sport_id = %stage.sport_id,
            "Stage created"
        );

        Ok(stage)
    }

    /// Update a stage; it may move to another associated pair
    pub async fn update(&self, id: Uuid, req: &UpdateStageRequest) -> Result<Stage> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Stage>(
            r#"
            SELECT stage_id, competition_id, sport_id, name, starts_at, place, created_at, modified_at
            FROM competition_schema.stage
            WHERE stage_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let competition_id = req.competition_id.unwrap_or(existing.competition_id);
        let sport_id = req.sport_id.unwrap_or(existing.sport_id);
        let name = req.name.as_ref().unwrap_or(&existing.name);
        let starts_at = req.starts_at.unwrap_or(existing.starts_at);
        let place = match &req.place {
            Some(place) => place.as_ref(),
            None => existing.place.as_ref(),
        };

        check_placement(&mut tx, competition_id, sport_id, starts_at).await?;

        let stage = sqlx::query_as::<_, Stage>(
            r#"
            UPDATE competition_schema.stage
            SET competition_id = $2,
                sport_id = $3,
                name = $4,
                starts_at = $5,
                place = $6,
                modified_at = now() AT TIME ZONE 'utc'
            WHERE stage_id = $1
            RETURNING stage_id, competition_id, sport_id, name, starts_at, place, created_at, modified_at
            "#,
        )
        .bind(id)
        .bind(competition_id)
        .bind(sport_id)
        .bind(name)
        .bind(starts_at)
        .bind(place)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StorageError::classify(e, STAGE_CONSTRAINTS))?;

        tx.commit().await?;

        Ok(stage)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM competition_schema.stage WHERE stage_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &StageFilter) {
    if let Some(competition_id) = filter.competition_id {
        query.push(" AND competition_id = ");
        query.push_bind(competition_id);
    }

    if let Some(sport_id) = filter.sport_id {
        query.push(" AND sport_id = ");
        query.push_bind(sport_id);
    }
}

/// Verify a stage can sit under the pair at the given time.
///
/// Holds a share lock on the competition row until the transaction ends so
/// its dates cannot change underneath the check.
async fn check_placement(
    tx: &mut Transaction<'_, Postgres>,
    competition_id: Uuid,
    sport_id: Uuid,
    starts_at: NaiveDateTime,
) -> Result<()> {
    let (start_date, end_date) = sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
        r#"
        SELECT start_date, end_date
        FROM competition_schema.competition
        WHERE competition_id = $1
        FOR SHARE
        "#,
    )
    .bind(competition_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| StorageError::Referential("Competition does not exist".to_string()))?;

    let associated = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM competition_schema.competition_sport
            WHERE competition_id = $1 AND sport_id = $2
        )
        "#,
    )
    .bind(competition_id)
    .bind(sport_id)
    .fetch_one(&mut **tx)
    .await?;

    if !associated {
        return Err(StorageError::Referential(
            STAGE_CONSTRAINTS.foreign_key.to_string(),
        ));
    }

    CompetitionPeriod::new(start_date, end_date)
        .and_then(|period| period.check_stage(starts_at))
        .map_err(|message| StorageError::Validation(message.to_string()))
}
