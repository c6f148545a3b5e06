use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum SplitbookError {
    /// Group with given ID not found
    #[error("Group {0} not found")]
    GroupNotFound(String),

    /// Member is already part of the group
    #[error("Member {0} is already in the group")]
    AlreadyGroupMember(String),

    /// User is not a member of the group
    #[error("User {0} is not a group member")]
    NotGroupMember(String),

    /// Shared expense with given ID not found in the group
    #[error("Expense {0} not found")]
    ExpenseNotFound(String),

    /// Personal expense with given ID not found for the user
    #[error("Personal expense {0} not found")]
    PersonalExpenseNotFound(String),

    /// Cannot record a settlement from a member to themselves
    #[error("Cannot record a settlement to self")]
    SelfSettlement,

    /// A split references a uid outside the group
    #[error("User {0} is not a group member for split")]
    InvalidSplitUser(String),

    /// Split amounts don't add up to the expense amount
    #[error("Invalid split amounts")]
    InvalidSplit,

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    /// Storage collaborator failed
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Audit logging collaborator failed
    #[error("Logging error: {0}")]
    LoggingError(String),

    /// Balance cache collaborator failed
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Catch-all for unexpected failures
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}
