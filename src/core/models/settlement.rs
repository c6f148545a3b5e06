use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A recorded real-world payment reducing what `from` owes `to`.
/// Append-only: never mutated or deleted once recorded.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Settlement {
    pub id: String,
    pub group_id: String,
    pub from: String,
    #[serde(default)]
    pub from_name: String,
    pub to: String,
    #[serde(default)]
    pub to_name: String,
    pub amount: f64,
    #[serde(with = "chrono::serde::ts_seconds")]
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}
