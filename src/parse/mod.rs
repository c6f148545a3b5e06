//! Contract with the external LLM parsing collaborator.
//!
//! The surrounding application hands free text or receipt image bytes to a
//! hosted model that extracts structured expense fields. Only the interface
//! lives here; the analytical core operates on already-validated output.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::constants::{CATEGORIES, FALLBACK_CATEGORY};

/// Structured fields extracted from free text or a receipt image.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ParsedExpense {
    pub amount: f64,
    pub category: String,
    pub vendor: String,
    pub description: String,
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParseFailure {
    /// The input is not recognizable as a purchase or payment.
    #[error("not an expense")]
    NotAnExpense,

    /// A structured reply came back without a usable positive amount.
    #[error("could not extract a valid amount")]
    InvalidAmount,

    /// The collaborator replied with something that could not be decoded.
    #[error("parse error: {0}")]
    ParseError(String),
}

#[async_trait]
pub trait ExpenseParser: Send + Sync {
    async fn parse_text(&self, text: &str) -> Result<ParsedExpense, ParseFailure>;

    async fn parse_receipt(
        &self,
        image: &[u8],
        media_type: &str,
    ) -> Result<ParsedExpense, ParseFailure>;
}

/// Maps a collaborator-reported category onto the whitelist, falling back to
/// "Other" for anything off-list.
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(trimmed))
        .map(|c| (*c).to_string())
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
}

#[cfg(test)]
mod tests {
    use super::normalize_category;

    #[test]
    fn whitelisted_categories_pass_through() {
        assert_eq!(normalize_category("Subscriptions"), "Subscriptions");
        assert_eq!(normalize_category("  groceries "), "Groceries");
    }

    #[test]
    fn off_list_categories_fall_back_to_other() {
        assert_eq!(normalize_category("Cryptocurrency"), "Other");
        assert_eq!(normalize_category(""), "Other");
    }
}
