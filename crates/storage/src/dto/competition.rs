use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::validate_not_blank;
use crate::models::{Competition, CompetitionPeriod};

/// Request payload for creating a new competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    /// Sports to associate right away
    #[serde(default)]
    pub sport_ids: Vec<Uuid>,
}

/// Request payload for updating an existing competition
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCompetitionRequest {
    #[validate(length(min = 1, max = 200))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
}

/// Request payload for linking sports to a competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AssociateSportsRequest {
    #[validate(length(min = 1, message = "At least one sport is required"))]
    pub sport_ids: Vec<Uuid>,
}

/// Response containing competition details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResponse {
    pub competition_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: chrono::NaiveDateTime,
    pub modified_at: chrono::NaiveDateTime,
    pub sport_ids: Vec<Uuid>,
}

impl CreateCompetitionRequest {
    /// Cross-field check of the date range
    pub fn validate_dates(&self) -> Result<CompetitionPeriod, &'static str> {
        CompetitionPeriod::new(self.start_date, self.end_date)
    }
}

impl From<Competition> for CompetitionResponse {
    fn from(comp: Competition) -> Self {
        Self {
            competition_id: comp.competition_id,
            name: comp.name,
            start_date: comp.start_date,
            end_date: comp.end_date,
            created_at: comp.created_at,
            modified_at: comp.modified_at,
            sport_ids: comp.sport_ids,
        }
    }
}
