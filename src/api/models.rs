use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::SplitbookError;
use crate::core::models::{expense::Split, member::Member};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    pub creator: Member,
}

#[derive(Deserialize, ToSchema)]
pub struct RenameGroupRequest {
    pub name: String,
    pub renamed_by: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteGroupRequest {
    pub deleted_by: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddMemberRequest {
    pub member: Member,
    pub added_by: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddGroupExpenseRequest {
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub amount: f64,
    pub paid_by: String,
    pub splits: Vec<Split>,
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    pub created_by: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteGroupExpenseRequest {
    pub deleted_by: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RecordSettlementRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub recorded_by: String,
}

/// Member performing a gated read, passed as a query parameter.
#[derive(Deserialize, IntoParams)]
pub struct UserQuery {
    pub user_id: String,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for SplitbookError to implement IntoResponse
pub struct ApiError(pub SplitbookError);

impl From<SplitbookError> for ApiError {
    fn from(err: SplitbookError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self.0 {
            SplitbookError::GroupNotFound(id) => (StatusCode::NOT_FOUND, format!("Group {} not found", id)),
            SplitbookError::AlreadyGroupMember(id) => {
                (StatusCode::CONFLICT, format!("Member {} is already in the group", id))
            }
            SplitbookError::NotGroupMember(id) => {
                (StatusCode::FORBIDDEN, format!("User {} is not a group member", id))
            }
            SplitbookError::ExpenseNotFound(id) => (StatusCode::NOT_FOUND, format!("Expense {} not found", id)),
            SplitbookError::PersonalExpenseNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Personal expense {} not found", id))
            }
            SplitbookError::SelfSettlement => {
                (StatusCode::BAD_REQUEST, "Cannot record a settlement to self".to_string())
            }
            SplitbookError::InvalidSplitUser(id) => (
                StatusCode::BAD_REQUEST,
                format!("User {} is not a group member for split", id),
            ),
            SplitbookError::InvalidSplit => (StatusCode::BAD_REQUEST, "Invalid split amounts".to_string()),
            SplitbookError::InvalidInput(field, msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid input for {}: {:?}", field, msg),
            ),
            SplitbookError::StorageError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", msg))
            }
            SplitbookError::LoggingError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Logging error: {}", msg))
            }
            SplitbookError::CacheError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Cache error: {}", msg))
            }
            SplitbookError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", msg),
            ),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
