use crate::core::errors::SplitbookError;
use crate::core::models::{
    audit::GroupAudit, expense::GroupExpense, group::Group, personal::PersonalExpense,
    settlement::Settlement,
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryStorage {
    groups: Arc<RwLock<HashMap<String, Group>>>,
    expenses: Arc<RwLock<HashMap<String, GroupExpense>>>,
    settlements: Arc<RwLock<HashMap<String, Settlement>>>,
    personal: Arc<RwLock<HashMap<String, Vec<PersonalExpense>>>>,
    group_audits: Arc<RwLock<HashMap<String, Vec<GroupAudit>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            groups: Arc::new(RwLock::new(HashMap::new())),
            expenses: Arc::new(RwLock::new(HashMap::new())),
            settlements: Arc::new(RwLock::new(HashMap::new())),
            personal: Arc::new(RwLock::new(HashMap::new())),
            group_audits: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_group(&self, group: Group) -> Result<(), SplitbookError> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitbookError> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).cloned())
    }

    async fn get_user_groups(&self, uid: &str) -> Result<Vec<Group>, SplitbookError> {
        let groups = self.groups.read().await;
        let mut found: Vec<Group> = groups.values().filter(|g| g.is_member(uid)).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), SplitbookError> {
        let mut groups = self.groups.write().await;
        if groups.remove(group_id).is_some() {
            let mut expenses = self.expenses.write().await;
            expenses.retain(|_, e| e.group_id != group_id);
            let mut settlements = self.settlements.write().await;
            settlements.retain(|_, s| s.group_id != group_id);
        }
        Ok(())
    }

    async fn save_group_expense(&self, expense: GroupExpense) -> Result<(), SplitbookError> {
        let mut expenses = self.expenses.write().await;
        expenses.insert(expense.id.clone(), expense);
        Ok(())
    }

    async fn get_group_expense(
        &self,
        group_id: &str,
        expense_id: &str,
    ) -> Result<Option<GroupExpense>, SplitbookError> {
        let expenses = self.expenses.read().await;
        Ok(expenses
            .get(expense_id)
            .filter(|e| e.group_id == group_id)
            .cloned())
    }

    async fn get_group_expenses(&self, group_id: &str) -> Result<Vec<GroupExpense>, SplitbookError> {
        let expenses = self.expenses.read().await;
        let mut found: Vec<GroupExpense> = expenses
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete_group_expense(
        &self,
        group_id: &str,
        expense_id: &str,
    ) -> Result<(), SplitbookError> {
        let mut expenses = self.expenses.write().await;
        if expenses
            .get(expense_id)
            .map(|e| e.group_id == group_id)
            .unwrap_or(false)
        {
            expenses.remove(expense_id);
        }
        Ok(())
    }

    async fn save_settlement(&self, settlement: Settlement) -> Result<(), SplitbookError> {
        let mut settlements = self.settlements.write().await;
        settlements.insert(settlement.id.clone(), settlement);
        Ok(())
    }

    async fn get_settlements(&self, group_id: &str) -> Result<Vec<Settlement>, SplitbookError> {
        let settlements = self.settlements.read().await;
        let mut found: Vec<Settlement> = settlements
            .values()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn save_personal_expense(
        &self,
        user_id: &str,
        expense: PersonalExpense,
    ) -> Result<(), SplitbookError> {
        let mut personal = self.personal.write().await;
        let list = personal.entry(user_id.to_string()).or_default();
        if let Some(existing) = list.iter_mut().find(|e| e.id == expense.id) {
            *existing = expense;
        } else {
            list.push(expense);
        }
        Ok(())
    }

    async fn get_personal_expense(
        &self,
        user_id: &str,
        expense_id: &str,
    ) -> Result<Option<PersonalExpense>, SplitbookError> {
        let personal = self.personal.read().await;
        Ok(personal
            .get(user_id)
            .and_then(|list| list.iter().find(|e| e.id == expense_id).cloned()))
    }

    async fn get_personal_expenses(
        &self,
        user_id: &str,
    ) -> Result<Vec<PersonalExpense>, SplitbookError> {
        let personal = self.personal.read().await;
        let mut found = personal.get(user_id).cloned().unwrap_or_default();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(found)
    }

    async fn delete_personal_expense(
        &self,
        user_id: &str,
        expense_id: &str,
    ) -> Result<(), SplitbookError> {
        let mut personal = self.personal.write().await;
        if let Some(list) = personal.get_mut(user_id) {
            list.retain(|e| e.id != expense_id);
        }
        Ok(())
    }

    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), SplitbookError> {
        let mut group_audits = self.group_audits.write().await;
        group_audits
            .entry(audit.group_id.clone())
            .or_insert_with(Vec::new)
            .push(audit);
        Ok(())
    }

    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, SplitbookError> {
        let group_audits = self.group_audits.read().await;
        Ok(group_audits.get(group_id).cloned().unwrap_or_default())
    }
}
