use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{nullable, validate_not_blank};
use crate::models::Stage;

/// Request payload for scheduling a stage of a sport within a competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateStageRequest {
    pub competition_id: Uuid,

    pub sport_id: Uuid,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[serde(deserialize_with = "deserialize_starts_at")]
    pub starts_at: NaiveDateTime,

    #[validate(length(max = 255))]
    pub place: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStageRequest {
    pub competition_id: Option<Uuid>,

    pub sport_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_starts_at")]
    pub starts_at: Option<NaiveDateTime>,

    /// `null` clears the place, leaving the field out keeps it.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 255))]
    pub place: Option<Option<String>>,
}

/// Accepted `starts_at` layouts; seconds may be left out.
const STARTS_AT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn parse_starts_at(value: &str) -> Option<NaiveDateTime> {
    STARTS_AT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn deserialize_starts_at<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_starts_at(&value).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid starts_at `{value}`, expected YYYY-MM-DDTHH:MM[:SS]"
        ))
    })
}

fn deserialize_optional_starts_at<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct StartsAt(#[serde(deserialize_with = "deserialize_starts_at")] NaiveDateTime);

    Ok(Option::<StartsAt>::deserialize(deserializer)?.map(|StartsAt(at)| at))
}

/// Optional narrowing of the stage listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StageFilter {
    pub competition_id: Option<Uuid>,
    pub sport_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StageResponse {
    pub stage_id: Uuid,
    pub competition_id: Uuid,
    pub sport_id: Uuid,
    pub name: String,
    pub starts_at: NaiveDateTime,
    pub place: Option<String>,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
}

impl From<Stage> for StageResponse {
    fn from(stage: Stage) -> Self {
        Self {
            stage_id: stage.stage_id,
            competition_id: stage.competition_id,
            sport_id: stage.sport_id,
            name: stage.name,
            starts_at: stage.starts_at,
            place: stage.place,
            created_at: stage.created_at,
            modified_at: stage.modified_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_iso_datetime() {
        let req: CreateStageRequest = serde_json::from_value(serde_json::json!({
            "competition_id": Uuid::nil(),
            "sport_id": Uuid::nil(),
            "name": "Heats",
            "starts_at": "2024-01-02T09:00:00",
            "place": "Main Pool"
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.starts_at.to_string(), "2024-01-02 09:00:00");
    }

    #[test]
    fn test_parses_minute_precision() {
        let req: CreateStageRequest = serde_json::from_value(serde_json::json!({
            "competition_id": Uuid::nil(),
            "sport_id": Uuid::nil(),
            "name": "Heats",
            "starts_at": "2024-01-02T09:00",
        }))
        .unwrap();
        assert_eq!(req.starts_at.to_string(), "2024-01-02 09:00:00");

        let update: UpdateStageRequest =
            serde_json::from_str(r#"{"starts_at": "2024-01-03T10:30"}"#).unwrap();
        assert_eq!(
            update.starts_at.map(|at| at.to_string()).as_deref(),
            Some("2024-01-03 10:30:00")
        );
    }

    #[test]
    fn test_rejects_unparsable_starts_at() {
        let err = serde_json::from_str::<UpdateStageRequest>(r#"{"starts_at": "tomorrow"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid starts_at"));
    }

    #[test]
    fn test_update_distinguishes_null_place_from_absent() {
        let absent: UpdateStageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.place, None);
        assert_eq!(absent.starts_at, None);

        let cleared: UpdateStageRequest = serde_json::from_str(r#"{"place": null}"#).unwrap();
        assert_eq!(cleared.place, Some(None));
    }

    #[test]
    fn test_place_length_limit() {
        let req = CreateStageRequest {
            competition_id: Uuid::nil(),
            sport_id: Uuid::nil(),
            name: "Final".to_string(),
            starts_at: chrono::Utc::now().naive_utc(),
            place: Some("p".repeat(256)),
        };
        assert!(req.validate().unwrap_err().field_errors().contains_key("place"));
    }
}
