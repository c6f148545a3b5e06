use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::UNKNOWN_VENDOR;

fn unknown_vendor() -> String {
    UNKNOWN_VENDOR.to_string()
}

/// A single personal expense in a user's flat list.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PersonalExpense {
    pub id: String,
    /// Raw input the parsing collaborator saw, kept for later editing.
    #[serde(default)]
    pub text: String,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default = "unknown_vendor")]
    pub vendor: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    #[serde(with = "chrono::serde::ts_seconds")]
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Fields accepted when creating a personal expense.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct NewPersonalExpense {
    #[serde(default)]
    pub text: String,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default = "unknown_vendor")]
    pub vendor: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
}

/// Fields accepted when editing a personal expense.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct PersonalExpenseUpdate {
    pub amount: f64,
    pub category: String,
    pub vendor: String,
    pub description: String,
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
}
