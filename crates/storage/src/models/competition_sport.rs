use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Link between a competition and one of its sports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompetitionSport {
    pub competition_sport_id: Uuid,
    pub competition_id: Uuid,
    pub sport_id: Uuid,
    pub created_at: chrono::NaiveDateTime,
}
