use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{nullable, validate_not_blank};
use crate::models::Sport;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSportRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSportRequest {
    #[validate(length(min = 1, max = 200))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    /// `null` clears the description, leaving the field out keeps it.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 1000))]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SportResponse {
    pub sport_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub modified_at: chrono::NaiveDateTime,
    pub competition_ids: Vec<Uuid>,
}

impl From<Sport> for SportResponse {
    fn from(sport: Sport) -> Self {
        Self {
            sport_id: sport.sport_id,
            name: sport.name,
            description: sport.description,
            created_at: sport.created_at,
            modified_at: sport.modified_at,
            competition_ids: sport.competition_ids,
        }
    }
}
