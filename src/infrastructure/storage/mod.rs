use crate::core::errors::SplitbookError;
use crate::core::models::{
    audit::GroupAudit, expense::GroupExpense, group::Group, personal::PersonalExpense,
    settlement::Settlement,
};
use async_trait::async_trait;

/// Document-store collaborator. Implementations traffic in JSON-shaped
/// records; shape validation happens before data crosses this boundary.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_group(&self, group: Group) -> Result<(), SplitbookError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitbookError>;
    async fn get_user_groups(&self, uid: &str) -> Result<Vec<Group>, SplitbookError>;
    /// Removes the group record and every expense and settlement under it.
    async fn delete_group(&self, group_id: &str) -> Result<(), SplitbookError>;

    async fn save_group_expense(&self, expense: GroupExpense) -> Result<(), SplitbookError>;
    async fn get_group_expense(
        &self,
        group_id: &str,
        expense_id: &str,
    ) -> Result<Option<GroupExpense>, SplitbookError>;
    async fn get_group_expenses(&self, group_id: &str) -> Result<Vec<GroupExpense>, SplitbookError>;
    async fn delete_group_expense(
        &self,
        group_id: &str,
        expense_id: &str,
    ) -> Result<(), SplitbookError>;

    async fn save_settlement(&self, settlement: Settlement) -> Result<(), SplitbookError>;
    async fn get_settlements(&self, group_id: &str) -> Result<Vec<Settlement>, SplitbookError>;

    async fn save_personal_expense(
        &self,
        user_id: &str,
        expense: PersonalExpense,
    ) -> Result<(), SplitbookError>;
    async fn get_personal_expense(
        &self,
        user_id: &str,
        expense_id: &str,
    ) -> Result<Option<PersonalExpense>, SplitbookError>;
    async fn get_personal_expenses(
        &self,
        user_id: &str,
    ) -> Result<Vec<PersonalExpense>, SplitbookError>;
    async fn delete_personal_expense(
        &self,
        user_id: &str,
        expense_id: &str,
    ) -> Result<(), SplitbookError>;

    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), SplitbookError>;
    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, SplitbookError>;
}

pub mod in_memory;
