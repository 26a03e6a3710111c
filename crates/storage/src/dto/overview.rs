use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Totals shown on the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OverviewResponse {
    pub competitions: i64,
    pub sports: i64,
    pub stages: i64,
}
