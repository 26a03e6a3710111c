use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Stage {
    pub stage_id: Uuid,
    pub competition_id: Uuid,
    pub sport_id: Uuid,
    pub name: String,
    pub starts_at: chrono::NaiveDateTime,
    pub place: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub modified_at: chrono::NaiveDateTime,
}
