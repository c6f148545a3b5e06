//! Net pairwise debt computation for a group.
//!
//! Pure function of the group's expenses, settlements and member set: no I/O,
//! no shared state, identical inputs always produce identical output.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{BALANCE_EPSILON, UNKNOWN_MEMBER};
use crate::core::models::{expense::GroupExpense, member::Member, settlement::Settlement};

/// Net directional balance between two members after combining both
/// directions. At most one entry exists per unordered member pair, and
/// `amount` is always positive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PairwiseDebt {
    pub debtor: String,
    pub debtor_name: String,
    pub creditor: String,
    pub creditor_name: String,
    pub amount: f64,
}

pub(crate) fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes the minimal, deduplicated list of net pairwise debts, sorted
/// descending by amount.
///
/// The payer's own share is self-funded and splits with non-positive amounts
/// are ignored. A settlement only reduces the forward `from -> to` debt,
/// floored at zero; it never nets against the reverse direction. Uids missing
/// from `members` resolve to a placeholder label rather than an error.
pub fn compute_balances(
    expenses: &[GroupExpense],
    settlements: &[Settlement],
    members: &[Member],
) -> Vec<PairwiseDebt> {
    // owed[debtor][creditor] = raw amount accumulated in that direction.
    // Ordered maps keep discovery order, and therefore tie-breaking, deterministic.
    let mut owed: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();

    for expense in expenses {
        for split in &expense.splits {
            if split.uid == expense.paid_by || split.amount <= 0.0 {
                continue;
            }
            *owed
                .entry(&split.uid)
                .or_default()
                .entry(&expense.paid_by)
                .or_insert(0.0) += split.amount;
        }
    }

    for settlement in settlements {
        let entry = owed
            .entry(&settlement.from)
            .or_default()
            .entry(&settlement.to)
            .or_insert(0.0);
        *entry = (*entry - settlement.amount).max(0.0);
    }

    let mut seen: BTreeSet<(&str, &str)> = BTreeSet::new();
    let mut debts = Vec::new();

    for (from, creditors) in &owed {
        for to in creditors.keys() {
            if from == to {
                continue;
            }
            let key = if from < to { (*from, *to) } else { (*to, *from) };
            if !seen.insert(key) {
                continue;
            }

            let forward = owed.get(from).and_then(|m| m.get(to)).copied().unwrap_or(0.0);
            let reverse = owed.get(to).and_then(|m| m.get(from)).copied().unwrap_or(0.0);

            // Round before the epsilon comparison so floating-point residue
            // cannot surface as a spurious balance.
            let net = round_currency(forward - reverse);
            if net.abs() < BALANCE_EPSILON {
                continue;
            }

            let (debtor, creditor) = if net > 0.0 { (*from, *to) } else { (*to, *from) };
            debts.push(PairwiseDebt {
                debtor: debtor.to_string(),
                debtor_name: display_name(members, debtor),
                creditor: creditor.to_string(),
                creditor_name: display_name(members, creditor),
                amount: net.abs(),
            });
        }
    }

    debts.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    debts
}

fn display_name(members: &[Member], uid: &str) -> String {
    members
        .iter()
        .find(|m| m.uid == uid)
        .map(|m| m.label().to_string())
        .unwrap_or_else(|| UNKNOWN_MEMBER.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::compute_balances;
    use crate::core::models::{
        expense::{GroupExpense, Split},
        member::Member,
        settlement::Settlement,
    };

    fn member(uid: &str, name: &str) -> Member {
        Member {
            uid: uid.to_string(),
            display_name: name.to_string(),
            email: format!("{}@example.com", uid),
            photo_url: None,
        }
    }

    fn expense(id: &str, paid_by: &str, amount: f64, splits: &[(&str, f64)]) -> GroupExpense {
        GroupExpense {
            id: id.to_string(),
            group_id: "g1".to_string(),
            description: "test expense".to_string(),
            category: String::new(),
            amount,
            paid_by: paid_by.to_string(),
            paid_by_name: String::new(),
            splits: splits
                .iter()
                .map(|(uid, amount)| Split {
                    uid: uid.to_string(),
                    name: String::new(),
                    amount: *amount,
                })
                .collect(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    fn settlement(id: &str, from: &str, to: &str, amount: f64) -> Settlement {
        Settlement {
            id: id.to_string(),
            group_id: "g1".to_string(),
            from: from.to_string(),
            from_name: String::new(),
            to: to.to_string(),
            to_name: String::new(),
            amount,
            created_at: Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap(),
        }
    }

    fn trio() -> Vec<Member> {
        vec![member("a", "Alice"), member("b", "Bob"), member("c", "Carol")]
    }

    #[test]
    fn empty_inputs_mean_all_settled() {
        assert!(compute_balances(&[], &[], &trio()).is_empty());
    }

    #[test]
    fn worked_example_nets_and_sorts() {
        let expenses = vec![
            expense("e1", "a", 300.0, &[("a", 100.0), ("b", 100.0), ("c", 100.0)]),
            expense("e2", "b", 60.0, &[("a", 30.0), ("b", 30.0)]),
        ];

        let debts = compute_balances(&expenses, &[], &trio());

        assert_eq!(debts.len(), 2);
        assert_eq!(debts[0].debtor, "c");
        assert_eq!(debts[0].creditor, "a");
        assert_eq!(debts[0].amount, 100.0);
        assert_eq!(debts[0].creditor_name, "Alice");
        assert_eq!(debts[1].debtor, "b");
        assert_eq!(debts[1].creditor, "a");
        assert_eq!(debts[1].amount, 70.0);
    }

    #[test]
    fn payer_share_and_non_positive_splits_are_skipped() {
        let expenses = vec![expense(
            "e1",
            "a",
            150.0,
            &[("a", 100.0), ("b", -5.0), ("c", 50.0), ("b", 0.0)],
        )];

        let debts = compute_balances(&expenses, &[], &trio());

        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].debtor, "c");
        assert_eq!(debts[0].amount, 50.0);
    }

    #[test]
    fn settlement_floors_at_zero() {
        let expenses = vec![expense("e1", "a", 50.0, &[("b", 50.0)])];
        let settlements = vec![settlement("s1", "b", "a", 80.0)];

        // Overpaying cannot invert the debt or create a reverse one.
        assert!(compute_balances(&expenses, &settlements, &trio()).is_empty());
    }

    #[test]
    fn settlement_without_prior_debt_has_no_effect() {
        let settlements = vec![settlement("s1", "b", "a", 40.0)];
        assert!(compute_balances(&[], &settlements, &trio()).is_empty());
    }

    #[test]
    fn reverse_direction_settlement_does_not_offset() {
        let expenses = vec![expense("e1", "a", 50.0, &[("b", 50.0)])];
        // Recorded in the wrong direction: reduces a -> b, which was never owed.
        let settlements = vec![settlement("s1", "a", "b", 50.0)];

        let debts = compute_balances(&expenses, &settlements, &trio());

        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].debtor, "b");
        assert_eq!(debts[0].creditor, "a");
        assert_eq!(debts[0].amount, 50.0);
    }

    #[test]
    fn partial_settlement_reduces_forward_debt() {
        let expenses = vec![expense("e1", "a", 100.0, &[("b", 100.0)])];
        let settlements = vec![settlement("s1", "b", "a", 40.0)];

        let debts = compute_balances(&expenses, &settlements, &trio());

        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].amount, 60.0);
    }

    #[test]
    fn opposing_obligations_net_to_single_debt() {
        let expenses = vec![
            expense("e1", "a", 100.0, &[("b", 100.0)]),
            expense("e2", "b", 30.0, &[("a", 30.0)]),
        ];

        let debts = compute_balances(&expenses, &[], &trio());

        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].debtor, "b");
        assert_eq!(debts[0].creditor, "a");
        assert_eq!(debts[0].amount, 70.0);
    }

    #[test]
    fn residue_below_epsilon_is_settled() {
        let expenses = vec![
            expense("e1", "a", 100.005, &[("b", 100.005)]),
            expense("e2", "b", 100.0, &[("a", 100.0)]),
        ];

        // Net of half a cent rounds to zero.
        assert!(compute_balances(&expenses, &[], &trio()).is_empty());
    }

    #[test]
    fn unordered_pairs_never_appear_twice() {
        let expenses = vec![
            expense("e1", "a", 40.0, &[("b", 40.0)]),
            expense("e2", "a", 60.0, &[("b", 60.0)]),
        ];

        let debts = compute_balances(&expenses, &[], &trio());

        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].amount, 100.0);
    }

    #[test]
    fn unknown_uid_resolves_to_placeholder() {
        let expenses = vec![expense("e1", "ghost", 25.0, &[("b", 25.0)])];

        let debts = compute_balances(&expenses, &[], &trio());

        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].creditor, "ghost");
        assert_eq!(debts[0].creditor_name, "Unknown");
        assert_eq!(debts[0].debtor_name, "Bob");
    }

    #[test]
    fn conservation_with_no_settlements() {
        let expenses = vec![
            expense("e1", "a", 300.0, &[("a", 100.0), ("b", 100.0), ("c", 100.0)]),
            expense("e2", "c", 90.0, &[("b", 45.0), ("c", 45.0)]),
        ];

        let debts = compute_balances(&expenses, &[], &trio());

        // Every non-payer split survives somewhere in the netted output.
        let total: f64 = debts.iter().map(|d| d.amount).sum();
        assert_eq!(total, 100.0 + 100.0 + 45.0);
    }

    #[test]
    fn identical_inputs_yield_identical_output() {
        let expenses = vec![
            expense("e1", "a", 300.0, &[("b", 150.0), ("c", 150.0)]),
            expense("e2", "b", 80.0, &[("a", 40.0), ("c", 40.0)]),
        ];
        let settlements = vec![settlement("s1", "c", "a", 50.0)];

        let first = compute_balances(&expenses, &settlements, &trio());
        let second = compute_balances(&expenses, &settlements, &trio());

        assert_eq!(first, second);
    }
}
