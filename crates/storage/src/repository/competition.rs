use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::competition::{CreateCompetitionRequest, UpdateCompetitionRequest};
use crate::error::{ConstraintMessages, Result, StorageError};
use crate::models::period::DATES_OUT_OF_ORDER;
use crate::models::{Competition, CompetitionPeriod, CompetitionSport};

const COMPETITION_CONSTRAINTS: ConstraintMessages = ConstraintMessages {
    unique: "Competition name already exists",
    foreign_key: "Unknown sport",
    check: DATES_OUT_OF_ORDER,
};

const ASSOCIATION_CONSTRAINTS: ConstraintMessages = ConstraintMessages {
    unique: "Sport is already part of the competition",
    foreign_key: "Unknown sport",
    check: "Invalid association",
};

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    /// Create a new CompetitionRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one page of competitions ordered by start date then name
    pub async fn list(&self, page: &PaginationParams) -> Result<(Vec<Competition>, i64)> {
        let total = self.count().await?;

        let competitions = sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, name, start_date, end_date, created_at, modified_at, sport_ids
            FROM competition_schema.competition_detail
            ORDER BY start_date, name
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((competitions, total))
    }

    pub async fn count(&self) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM competition_schema.competition")
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// Get a competition by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Competition> {
        sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, name, start_date, end_date, created_at, modified_at, sport_ids
            FROM competition_schema.competition_detail
            WHERE competition_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Competitions a sport is contested in, ordered by start date
    pub async fn list_for_sport(&self, sport_id: Uuid) -> Result<Vec<Competition>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM competition_schema.sport WHERE sport_id = $1)",
        )
        .bind(sport_id)
        .fetch_one(self.pool)
        .await?;

        if !exists {
            return Err(StorageError::NotFound);
        }

        let competitions = sqlx::query_as::<_, Competition>(
            r#"
            SELECT c.competition_id, c.name, c.start_date, c.end_date,
                   c.created_at, c.modified_at, c.sport_ids
            FROM competition_schema.competition_detail c
            JOIN competition_schema.competition_sport cs ON cs.competition_id = c.competition_id
            WHERE cs.sport_id = $1
            ORDER BY c.start_date, c.name
            "#,
        )
        .bind(sport_id)
        .fetch_all(self.pool)
        .await?;

        Ok(competitions)
    }

    /// Create a new competition together with its initial sports
    pub async fn create(&self, req: &CreateCompetitionRequest) -> Result<Competition> {
        let period = req.validate_dates().map_err(validation)?;

        let mut tx = self.pool.begin().await?;

        let competition_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO competition_schema.competition (name, start_date, end_date)
            VALUES ($1, $2, $3)
            RETURNING competition_id
            "#,
        )
        .bind(&req.name)
        .bind(period.start())
        .bind(period.end())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StorageError::classify(e, COMPETITION_CONSTRAINTS))?;

        if !req.sport_ids.is_empty() {
            insert_associations(&mut tx, competition_id, &req.sport_ids).await?;
        }

        tx.commit().await?;

        tracing::info!(%competition_id, name = %req.name, "Competition created");

        self.find_by_id(competition_id).await
    }

    /// Update an existing competition.
    ///
    /// The merged dates must stay ordered and must still cover every stage
    /// already scheduled for the competition.
    pub async fn update(&self, id: Uuid, req: &UpdateCompetitionRequest) -> Result<Competition> {
        let mut tx = self.pool.begin().await?;

        let (name, start_date, end_date) = sqlx::query_as::<_, (String, NaiveDate, NaiveDate)>(
            r#"
            SELECT name, start_date, end_date
            FROM competition_schema.competition
            WHERE competition_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let name = req.name.clone().unwrap_or(name);
        let period = CompetitionPeriod::new(
            req.start_date.unwrap_or(start_date),
            req.end_date.unwrap_or(end_date),
        )
        .map_err(validation)?;

        let stranded = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM competition_schema.stage
            WHERE competition_id = $1
              AND (starts_at::date < $2 OR starts_at::date > $3)
            "#,
        )
        .bind(id)
        .bind(period.start())
        .bind(period.end())
        .fetch_one(&mut *tx)
        .await?;

        if stranded > 0 {
            return Err(StorageError::Validation(format!(
                "{stranded} stage(s) would fall outside the competition dates"
            )));
        }

        sqlx::query(
            r#"
            UPDATE competition_schema.competition
            SET name = $2,
                start_date = $3,
                end_date = $4,
                modified_at = now() AT TIME ZONE 'utc'
            WHERE competition_id = $1
            "#,
        )
        .bind(id)
        .bind(&name)
        .bind(period.start())
        .bind(period.end())
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::classify(e, COMPETITION_CONSTRAINTS))?;

        tx.commit().await?;

        self.find_by_id(id).await
    }

    /// Delete a competition by ID, cascading to its associations and stages
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM competition_schema.competition WHERE competition_id = $1")
                .bind(id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tracing::info!(competition_id = %id, "Competition deleted");

        Ok(())
    }

    /// Link sports to a competition.
    ///
    /// Pairs that already exist are left untouched, so repeating the call
    /// has no further effect. Returns the associations for `sport_ids`.
    pub async fn associate_sports(
        &self,
        competition_id: Uuid,
        sport_ids: &[Uuid],
    ) -> Result<Vec<CompetitionSport>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT competition_id
            FROM competition_schema.competition
            WHERE competition_id = $1
            FOR SHARE
            "#,
        )
        .bind(competition_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        insert_associations(&mut tx, competition_id, sport_ids).await?;

        let associations = sqlx::query_as::<_, CompetitionSport>(
            r#"
            SELECT competition_sport_id, competition_id, sport_id, created_at
            FROM competition_schema.competition_sport
            WHERE competition_id = $1 AND sport_id = ANY($2)
            ORDER BY created_at, sport_id
            "#,
        )
        .bind(competition_id)
        .bind(sport_ids)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(associations)
    }

    /// Remove a sport from a competition along with the pair's stages
    pub async fn dissociate_sport(&self, competition_id: Uuid, sport_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM competition_schema.competition_sport
            WHERE competition_id = $1 AND sport_id = $2
            "#,
        )
        .bind(competition_id)
        .bind(sport_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tracing::info!(%competition_id, %sport_id, "Sport removed from competition");

        Ok(())
    }
}

async fn insert_associations(
    tx: &mut Transaction<'_, Postgres>,
    competition_id: Uuid,
    sport_ids: &[Uuid],
) -> Result<()> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO competition_schema.competition_sport (competition_id, sport_id)
        SELECT DISTINCT $1::uuid, sport_id
        FROM UNNEST($2::uuid[]) AS requested(sport_id)
        ON CONFLICT (competition_id, sport_id) DO NOTHING
        "#,
    )
    .bind(competition_id)
    .bind(sport_ids)
    .execute(&mut **tx)
    .await
    .map_err(|e| StorageError::classify(e, ASSOCIATION_CONSTRAINTS))?;

    tracing::debug!(
        %competition_id,
        requested = sport_ids.len(),
        inserted = inserted.rows_affected(),
        "Associated sports"
    );

    Ok(())
}

fn validation(message: &'static str) -> StorageError {
    StorageError::Validation(message.to_string())
}
