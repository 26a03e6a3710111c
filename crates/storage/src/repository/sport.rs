use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::sport::{CreateSportRequest, UpdateSportRequest};
use crate::error::{ConstraintMessages, Result, StorageError};
use crate::models::Sport;

const SPORT_CONSTRAINTS: ConstraintMessages = ConstraintMessages {
    unique: "Sport name already exists",
    foreign_key: "Sport is referenced by another record",
    check: "Sport name must not be blank",
};

/// Repository for Sport database operations
pub struct SportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SportRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one page of sports ordered by name, with the total count
    pub async fn list(&self, page: &PaginationParams) -> Result<(Vec<Sport>, i64)> {
        let total = self.count().await?;

        let sports = sqlx::query_as::<_, Sport>(
            r#"
            SELECT sport_id, name, description, created_at, modified_at, competition_ids
            FROM competition_schema.sport_detail
            ORDER BY name
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((sports, total))
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM competition_schema.sport")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Get a sport by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Sport> {
        sqlx::query_as::<_, Sport>(
            r#"
            SELECT sport_id, name, description, created_at, modified_at, competition_ids
            FROM competition_schema.sport_detail
            WHERE sport_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Sports contested in a competition, in association order
    pub async fn list_for_competition(&self, competition_id: Uuid) -> Result<Vec<Sport>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM competition_schema.competition WHERE competition_id = $1)",
        )
        .bind(competition_id)
        .fetch_one(self.pool)
        .await?;

        if !exists {
            return Err(StorageError::NotFound);
        }

        let sports = sqlx::query_as::<_, Sport>(
            r#"
            SELECT s.sport_id, s.name, s.description, s.created_at, s.modified_at, s.competition_ids
            FROM competition_schema.sport_detail s
            JOIN competition_schema.competition_sport cs ON cs.sport_id = s.sport_id
            WHERE cs.competition_id = $1
            ORDER BY cs.created_at, s.name
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(sports)
    }

    /// Create a new sport
    pub async fn create(&self, req: &CreateSportRequest) -> Result<Sport> {
        let sport_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO competition_schema.sport (name, description)
            VALUES ($1, $2)
            RETURNING sport_id
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::classify(e, SPORT_CONSTRAINTS))?;

        tracing::info!(%sport_id, name = %req.name, "Sport created");

        self.find_by_id(sport_id).await
    }

    /// Update a sport under a row lock, keeping fields the request leaves out
    pub async fn update(&self, id: Uuid, req: &UpdateSportRequest) -> Result<Sport> {
        let mut tx = self.pool.begin().await?;

        let (current_name, current_description) = sqlx::query_as::<_, (String, Option<String>)>(
            r#"
            SELECT name, description
            FROM competition_schema.sport
            WHERE sport_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let name = req.name.as_ref().unwrap_or(&current_name);
        let description = match &req.description {
            Some(description) => description.as_ref(),
            None => current_description.as_ref(),
        };

        sqlx::query(
            r#"
            UPDATE competition_schema.sport
            SET name = $2,
                description = $3,
                modified_at = now() AT TIME ZONE 'utc'
            WHERE sport_id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::classify(e, SPORT_CONSTRAINTS))?;

        tx.commit().await?;

        self.find_by_id(id).await
    }

    /// Delete a sport; its associations and their stages go with it
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM competition_schema.sport WHERE sport_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tracing::info!(sport_id = %id, "Sport deleted");

        Ok(())
    }
}
