use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One member's share of a shared expense.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Split {
    pub uid: String,
    #[serde(default)]
    pub name: String,
    pub amount: f64,
}

/// A shared expenditure. Immutable once created, except for deletion.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupExpense {
    pub id: String,
    pub group_id: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub amount: f64,
    pub paid_by: String,
    #[serde(default)]
    pub paid_by_name: String,
    pub splits: Vec<Split>,
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    #[serde(with = "chrono::serde::ts_seconds")]
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}
