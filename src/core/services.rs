use crate::config::CONFIG;
use crate::constants::{
    BALANCES_QUERIED, EXPENSE_ADDED, EXPENSE_DELETED, GROUP_CREATED, GROUP_DELETED, GROUP_RENAMED,
    MAX_AMOUNT, MEMBER_ADDED, PERSONAL_EXPENSE_ADDED, PERSONAL_EXPENSE_DELETED,
    PERSONAL_EXPENSE_UPDATED, SETTLEMENT_RECORDED, SPLIT_TOLERANCE, UNKNOWN_VENDOR,
};
use crate::core::balance::{PairwiseDebt, compute_balances, round_currency};
use crate::core::errors::{FieldError, SplitbookError};
use crate::core::models::{
    audit::{AppLog, GroupAudit},
    expense::{GroupExpense, Split},
    group::Group,
    member::Member,
    personal::{NewPersonalExpense, PersonalExpense, PersonalExpenseUpdate},
    settlement::Settlement,
};
use crate::core::recurring::{RecurringReport, detect_recurring};
use crate::infrastructure::cache::Cache;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use crate::parse::{ParsedExpense, normalize_category};
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

pub struct SplitbookService<L: LoggingService, S: Storage, C: Cache> {
    storage: S,
    logging: L,
    cache: C,
}

impl<L: LoggingService, S: Storage, C: Cache> SplitbookService<L, S, C> {
    pub fn new(storage: S, logging: L, cache: C) -> Self {
        SplitbookService {
            storage,
            logging,
            cache,
        }
    }

    async fn require_member(&self, group_id: &str, user_id: &str) -> Result<Group, SplitbookError> {
        let group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| SplitbookError::GroupNotFound(group_id.to_string()))?;
        if !group.is_member(user_id) {
            return Err(SplitbookError::NotGroupMember(user_id.to_string()));
        }
        Ok(group)
    }

    async fn log_and_audit(
        &self,
        group_id: Option<&str>,
        action: &str,
        log_details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), SplitbookError> {
        self.logging.log_action(action, log_details.clone(), user_id).await?;
        if let Some(gid) = group_id {
            self.storage
                .save_group_audit(GroupAudit {
                    id: Uuid::new_v4().to_string(),
                    group_id: gid.to_string(),
                    action: action.to_string(),
                    user_id: user_id.map(String::from),
                    details: serde_json::from_value(log_details).unwrap_or_default(),
                    timestamp: Utc::now(),
                })
                .await?;
        }
        Ok(())
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), SplitbookError> {
        if value.trim().is_empty() {
            return Err(SplitbookError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} cannot be empty", field),
                },
            ));
        }
        if value.len() > max_length {
            return Err(SplitbookError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("{} Too Long", field),
                    description: format!("{} cannot exceed {} characters", field, max_length),
                },
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(SplitbookError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} contains invalid characters", field),
                },
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), SplitbookError> {
        if !amount.is_finite() {
            return Err(SplitbookError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount must be a finite number".to_string(),
                },
            ));
        }
        if amount <= 0.0 {
            return Err(SplitbookError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount must be greater than 0".to_string(),
                },
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(SplitbookError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Amount Too Large".to_string(),
                    description: "Amount cannot exceed 1,000,000".to_string(),
                },
            ));
        }
        let cents = amount * 100.0;
        if (cents - cents.round()).abs() > 1e-6 {
            return Err(SplitbookError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount cannot have more than 2 decimal places".to_string(),
                },
            ));
        }
        Ok(())
    }

    // GROUPS

    pub async fn create_group(&self, name: String, creator: Member) -> Result<Group, SplitbookError> {
        self.validate_string_input("name", &name, 100)?;

        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            created_by: creator.uid.clone(),
            members: vec![creator.clone()],
            created_at: Utc::now(),
        };
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            Some(&group.id),
            GROUP_CREATED,
            json!({ "group_id": group.id, "name": group.name, "created_by": creator.uid }),
            Some(creator.uid.as_str()),
        )
        .await?;

        Ok(group)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitbookError> {
        self.storage.get_group(group_id).await
    }

    pub async fn user_groups(&self, uid: &str) -> Result<Vec<Group>, SplitbookError> {
        self.storage.get_user_groups(uid).await
    }

    pub async fn rename_group(
        &self,
        group_id: &str,
        name: String,
        renamed_by: &str,
    ) -> Result<Group, SplitbookError> {
        let mut group = self.require_member(group_id, renamed_by).await?;
        self.validate_string_input("name", &name, 100)?;

        group.name = name.trim().to_string();
        self.storage.save_group(group.clone()).await?;

        self.log_and_audit(
            Some(group_id),
            GROUP_RENAMED,
            json!({ "group_id": group_id, "name": group.name }),
            Some(renamed_by),
        )
        .await?;
        Ok(group)
    }

    pub async fn add_member(
        &self,
        group_id: &str,
        member: Member,
        added_by: &str,
    ) -> Result<(), SplitbookError> {
        let mut group = self.require_member(group_id, added_by).await?;

        if group.is_member(&member.uid) {
            return Err(SplitbookError::AlreadyGroupMember(member.uid));
        }

        group.members.push(member.clone());
        self.storage.save_group(group).await?;

        self.log_and_audit(
            Some(group_id),
            MEMBER_ADDED,
            json!({ "group_id": group_id, "uid": member.uid, "display_name": member.display_name }),
            Some(added_by),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_group(&self, group_id: &str, deleted_by: &str) -> Result<(), SplitbookError> {
        let group = self.require_member(group_id, deleted_by).await?;

        self.storage.delete_group(group_id).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            GROUP_DELETED,
            json!({ "group_id": group_id, "name": group.name }),
            Some(deleted_by),
        )
        .await?;
        Ok(())
    }

    // SHARED EXPENSES & SETTLEMENTS

    pub async fn add_group_expense(
        &self,
        group_id: &str,
        description: String,
        category: String,
        amount: f64,
        paid_by: &str,
        splits: Vec<Split>,
        date: NaiveDate,
        created_by: &str,
    ) -> Result<GroupExpense, SplitbookError> {
        let group = self.require_member(group_id, created_by).await?;
        if !group.is_member(paid_by) {
            return Err(SplitbookError::NotGroupMember(paid_by.to_string()));
        }

        self.validate_string_input("description", &description, 255)?;
        self.validate_amount_input("amount", amount)?;

        let share_sum: f64 = splits.iter().map(|s| s.amount).sum();
        if (share_sum - amount).abs() > SPLIT_TOLERANCE {
            return Err(SplitbookError::InvalidSplit);
        }
        for split in &splits {
            if !group.is_member(&split.uid) {
                return Err(SplitbookError::InvalidSplitUser(split.uid.clone()));
            }
        }

        let paid_by_name = group.member(paid_by).map(|m| m.label().to_string()).unwrap_or_default();
        let expense = GroupExpense {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            description,
            category,
            amount,
            paid_by: paid_by.to_string(),
            paid_by_name,
            splits,
            date,
            created_at: Utc::now(),
        };

        self.storage.save_group_expense(expense.clone()).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            EXPENSE_ADDED,
            json!({
                "expense_id": expense.id,
                "group_id": group_id,
                "description": expense.description,
                "amount": expense.amount,
                "paid_by": expense.paid_by
            }),
            Some(created_by),
        )
        .await?;

        Ok(expense)
    }

    pub async fn delete_group_expense(
        &self,
        group_id: &str,
        expense_id: &str,
        deleted_by: &str,
    ) -> Result<(), SplitbookError> {
        self.require_member(group_id, deleted_by).await?;

        let expense = self
            .storage
            .get_group_expense(group_id, expense_id)
            .await?
            .ok_or_else(|| SplitbookError::ExpenseNotFound(expense_id.to_string()))?;

        self.storage.delete_group_expense(group_id, expense_id).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            EXPENSE_DELETED,
            json!({ "expense_id": expense.id, "group_id": group_id, "amount": expense.amount }),
            Some(deleted_by),
        )
        .await?;
        Ok(())
    }

    pub async fn record_settlement(
        &self,
        group_id: &str,
        from: &str,
        to: &str,
        amount: f64,
        recorded_by: &str,
    ) -> Result<Settlement, SplitbookError> {
        let group = self.require_member(group_id, recorded_by).await?;

        if from == to {
            return Err(SplitbookError::SelfSettlement);
        }
        if !group.is_member(from) {
            return Err(SplitbookError::NotGroupMember(from.to_string()));
        }
        if !group.is_member(to) {
            return Err(SplitbookError::NotGroupMember(to.to_string()));
        }

        self.validate_amount_input("amount", amount)?;

        let settlement = Settlement {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            from: from.to_string(),
            from_name: group.member(from).map(|m| m.label().to_string()).unwrap_or_default(),
            to: to.to_string(),
            to_name: group.member(to).map(|m| m.label().to_string()).unwrap_or_default(),
            amount,
            created_at: Utc::now(),
        };

        self.storage.save_settlement(settlement.clone()).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            SETTLEMENT_RECORDED,
            json!({
                "settlement_id": settlement.id,
                "group_id": group_id,
                "from": from,
                "to": to,
                "amount": amount
            }),
            Some(recorded_by),
        )
        .await?;

        Ok(settlement)
    }

    pub async fn group_expenses(
        &self,
        group_id: &str,
        queried_by: &str,
    ) -> Result<Vec<GroupExpense>, SplitbookError> {
        self.require_member(group_id, queried_by).await?;
        self.storage.get_group_expenses(group_id).await
    }

    pub async fn group_settlements(
        &self,
        group_id: &str,
        queried_by: &str,
    ) -> Result<Vec<Settlement>, SplitbookError> {
        self.require_member(group_id, queried_by).await?;
        self.storage.get_settlements(group_id).await
    }

    /// Cache-aside read of the group's net pairwise debts. Every mutation of
    /// the group's records invalidates the cached snapshot, so readers always
    /// re-derive from source after a change notification.
    pub async fn group_balances(
        &self,
        group_id: &str,
        queried_by: &str,
    ) -> Result<Vec<PairwiseDebt>, SplitbookError> {
        let group = self.require_member(group_id, queried_by).await?;

        if let Some(cached) = self.cache.get_group_balances(group_id).await? {
            debug!("balance cache hit for group {}", group_id);
            return Ok(cached);
        }

        let expenses = self.storage.get_group_expenses(group_id).await?;
        let settlements = self.storage.get_settlements(group_id).await?;
        let balances = compute_balances(&expenses, &settlements, &group.members);

        self.cache
            .save_group_balances(
                group_id,
                &balances,
                std::time::Duration::from_secs(CONFIG.balance_cache_ttl_secs),
            )
            .await?;

        self.log_and_audit(
            Some(group_id),
            BALANCES_QUERIED,
            json!({ "group_id": group_id, "user_id": queried_by }),
            Some(queried_by),
        )
        .await?;

        Ok(balances)
    }

    // PERSONAL EXPENSES

    pub async fn add_personal_expense(
        &self,
        user_id: &str,
        new: NewPersonalExpense,
    ) -> Result<PersonalExpense, SplitbookError> {
        self.validate_amount_input("amount", new.amount)?;

        let expense = PersonalExpense {
            id: Uuid::new_v4().to_string(),
            text: new.text,
            amount: new.amount,
            category: new.category,
            vendor: new.vendor,
            description: new.description,
            date: new.date,
            created_at: Utc::now(),
        };

        self.storage.save_personal_expense(user_id, expense.clone()).await?;

        self.log_and_audit(
            None,
            PERSONAL_EXPENSE_ADDED,
            json!({ "expense_id": expense.id, "user_id": user_id, "amount": expense.amount }),
            Some(user_id),
        )
        .await?;

        Ok(expense)
    }

    /// Boundary where the parsing collaborator's output becomes a typed
    /// record: amount rounded to 2 decimals, category mapped onto the
    /// whitelist, vendor and description defaulted when empty.
    pub async fn add_parsed_expense(
        &self,
        user_id: &str,
        text: &str,
        parsed: ParsedExpense,
    ) -> Result<PersonalExpense, SplitbookError> {
        let vendor = if parsed.vendor.trim().is_empty() {
            UNKNOWN_VENDOR.to_string()
        } else {
            parsed.vendor
        };
        let description = if parsed.description.trim().is_empty() {
            text.chars().take(40).collect()
        } else {
            parsed.description
        };

        self.add_personal_expense(
            user_id,
            NewPersonalExpense {
                text: text.to_string(),
                amount: round_currency(parsed.amount),
                category: normalize_category(&parsed.category),
                vendor,
                description,
                date: parsed.date,
            },
        )
        .await
    }

    pub async fn update_personal_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        update: PersonalExpenseUpdate,
    ) -> Result<PersonalExpense, SplitbookError> {
        self.validate_amount_input("amount", update.amount)?;

        let mut expense = self
            .storage
            .get_personal_expense(user_id, expense_id)
            .await?
            .ok_or_else(|| SplitbookError::PersonalExpenseNotFound(expense_id.to_string()))?;

        expense.amount = update.amount;
        expense.category = update.category;
        expense.vendor = update.vendor;
        expense.description = update.description;
        expense.date = update.date;

        self.storage.save_personal_expense(user_id, expense.clone()).await?;

        self.log_and_audit(
            None,
            PERSONAL_EXPENSE_UPDATED,
            json!({ "expense_id": expense_id, "user_id": user_id }),
            Some(user_id),
        )
        .await?;

        Ok(expense)
    }

    pub async fn delete_personal_expense(
        &self,
        user_id: &str,
        expense_id: &str,
    ) -> Result<(), SplitbookError> {
        self.storage
            .get_personal_expense(user_id, expense_id)
            .await?
            .ok_or_else(|| SplitbookError::PersonalExpenseNotFound(expense_id.to_string()))?;

        self.storage.delete_personal_expense(user_id, expense_id).await?;

        self.log_and_audit(
            None,
            PERSONAL_EXPENSE_DELETED,
            json!({ "expense_id": expense_id, "user_id": user_id }),
            Some(user_id),
        )
        .await?;
        Ok(())
    }

    pub async fn personal_expenses(&self, user_id: &str) -> Result<Vec<PersonalExpense>, SplitbookError> {
        self.storage.get_personal_expenses(user_id).await
    }

    /// Re-runs the recurrence detector over the user's current expense list.
    pub async fn recurring_report(&self, user_id: &str) -> Result<RecurringReport, SplitbookError> {
        let expenses = self.storage.get_personal_expenses(user_id).await?;
        debug!("detecting recurring patterns over {} expenses", expenses.len());
        Ok(detect_recurring(&expenses))
    }

    // AUDIT

    pub async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, SplitbookError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| SplitbookError::GroupNotFound(group_id.to_string()))?;
        self.storage.get_group_audits(group_id).await
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, SplitbookError> {
        self.logging.get_logs().await
    }
}
