//! Recurring-pattern detection over a user's personal expenses.
//!
//! Groups expenses by category plus a normalized vendor/description identity,
//! then flags groups that show up in multiple calendar months with stable
//! amounts. Pure and total: malformed records simply fail qualification.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{MAX_RECURRING_CV, MIN_RECURRING_MEAN, MIN_RECURRING_MONTHS, UNKNOWN_VENDOR};
use crate::core::balance::round_currency;
use crate::core::models::personal::PersonalExpense;

/// Summary of one detected recurring pattern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecurringGroup {
    pub name: String,
    pub category: String,
    pub avg_amount: f64,
    pub month_count: usize,
    pub typical_day_of_month: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecurringReport {
    /// Ids of every expense that belongs to some recurring pattern.
    pub recurring_ids: BTreeSet<String>,
    /// One entry per detected pattern, sorted descending by average amount.
    pub groups: Vec<RecurringGroup>,
}

struct PatternBucket {
    name: String,
    category: String,
    months: BTreeSet<String>,
    amounts: Vec<f64>,
    days: Vec<u32>,
    ids: Vec<String>,
}

/// Vendor-based identity when a vendor was extracted; otherwise the first two
/// tokens of the description approximate vendor stability.
fn normalized_identity(expense: &PersonalExpense) -> String {
    let vendor = expense.vendor.trim();
    if !vendor.is_empty() && vendor != UNKNOWN_VENDOR {
        return vendor.to_lowercase();
    }
    let lowered = expense.description.to_lowercase();
    lowered
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Classifies which expenses belong to a recurring pattern and summarizes
/// each pattern. A group qualifies only if it spans at least two distinct
/// calendar months, its mean amount clears the noise floor, and its
/// population coefficient of variation stays within bounds.
pub fn detect_recurring(expenses: &[PersonalExpense]) -> RecurringReport {
    let mut buckets: BTreeMap<String, PatternBucket> = BTreeMap::new();

    for expense in expenses {
        let identity = normalized_identity(expense);
        let key = format!("{}::{}", expense.category, identity);

        let bucket = buckets.entry(key).or_insert_with(|| PatternBucket {
            name: identity,
            category: expense.category.clone(),
            months: BTreeSet::new(),
            amounts: Vec::new(),
            days: Vec::new(),
            ids: Vec::new(),
        });
        bucket.months.insert(expense.date.format("%Y-%m").to_string());
        bucket.amounts.push(expense.amount);
        bucket.days.push(expense.date.day());
        bucket.ids.push(expense.id.clone());
    }

    let mut report = RecurringReport::default();

    for bucket in buckets.values() {
        if bucket.months.len() < MIN_RECURRING_MONTHS {
            continue;
        }

        let mean = bucket.amounts.iter().sum::<f64>() / bucket.amounts.len() as f64;
        if mean < MIN_RECURRING_MEAN {
            continue;
        }

        // Population variance; the mean floor above keeps the division safe.
        let variance = bucket
            .amounts
            .iter()
            .map(|amount| (amount - mean).powi(2))
            .sum::<f64>()
            / bucket.amounts.len() as f64;
        let cv = variance.sqrt() / mean;
        if cv > MAX_RECURRING_CV {
            continue;
        }

        report.recurring_ids.extend(bucket.ids.iter().cloned());
        report.groups.push(RecurringGroup {
            name: bucket.name.clone(),
            category: bucket.category.clone(),
            avg_amount: round_currency(mean),
            month_count: bucket.months.len(),
            typical_day_of_month: median_day(&bucket.days),
        });
    }

    report.groups.sort_by(|a, b| b.avg_amount.total_cmp(&a.avg_amount));
    report
}

fn median_day(days: &[u32]) -> u32 {
    if days.is_empty() {
        return 0;
    }
    let mut sorted = days.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (f64::from(sorted[mid - 1] + sorted[mid]) / 2.0).round() as u32
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::detect_recurring;
    use crate::core::models::personal::PersonalExpense;

    fn row(id: &str, category: &str, vendor: &str, description: &str, date: &str, amount: f64) -> PersonalExpense {
        PersonalExpense {
            id: id.to_string(),
            text: String::new(),
            amount,
            category: category.to_string(),
            vendor: vendor.to_string(),
            description: description.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let report = detect_recurring(&[]);
        assert!(report.recurring_ids.is_empty());
        assert!(report.groups.is_empty());
    }

    #[test]
    fn stable_monthly_subscription_is_detected() {
        let expenses = vec![
            row("e1", "Subscriptions", "Netflix", "Monthly plan", "2024-01-15", 649.0),
            row("e2", "Subscriptions", "Netflix", "Monthly plan", "2024-02-15", 649.0),
            row("e3", "Subscriptions", "Netflix", "Monthly plan", "2024-03-15", 649.0),
        ];

        let report = detect_recurring(&expenses);

        assert_eq!(report.groups.len(), 1);
        let group = &report.groups[0];
        assert_eq!(group.name, "netflix");
        assert_eq!(group.category, "Subscriptions");
        assert_eq!(group.avg_amount, 649.0);
        assert_eq!(group.month_count, 3);
        assert_eq!(group.typical_day_of_month, 15);
        assert!(["e1", "e2", "e3"].iter().all(|id| report.recurring_ids.contains(*id)));
    }

    #[test]
    fn volatile_amounts_fail_the_cv_gate() {
        // A 5000 outlier pushes the coefficient of variation past 0.5.
        let expenses = vec![
            row("e1", "Subscriptions", "Netflix", "Monthly plan", "2024-01-15", 649.0),
            row("e2", "Subscriptions", "Netflix", "Monthly plan", "2024-02-15", 649.0),
            row("e3", "Subscriptions", "Netflix", "Monthly plan", "2024-03-15", 649.0),
            row("e4", "Subscriptions", "Netflix", "Annual top-up", "2024-04-15", 5000.0),
        ];

        let report = detect_recurring(&expenses);

        assert!(report.groups.is_empty());
        assert!(report.recurring_ids.is_empty());
    }

    #[test]
    fn mild_variance_stays_within_the_cv_gate() {
        let expenses = vec![
            row("e1", "Utilities", "Grid Power", "Electricity bill", "2024-01-05", 900.0),
            row("e2", "Utilities", "Grid Power", "Electricity bill", "2024-02-05", 1100.0),
            row("e3", "Utilities", "Grid Power", "Electricity bill", "2024-03-05", 1000.0),
        ];

        let report = detect_recurring(&expenses);

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].avg_amount, 1000.0);
    }

    #[test]
    fn single_month_groups_are_not_recurring() {
        let expenses = vec![
            row("e1", "Groceries", "Big Bazaar", "Weekly shop", "2024-03-02", 500.0),
            row("e2", "Groceries", "Big Bazaar", "Weekly shop", "2024-03-20", 500.0),
        ];

        assert!(detect_recurring(&expenses).groups.is_empty());
    }

    #[test]
    fn trivial_amounts_fall_below_the_mean_floor() {
        let expenses = vec![
            row("e1", "Transport", "Metro", "Metro ride", "2024-01-03", 5.0),
            row("e2", "Transport", "Metro", "Metro ride", "2024-02-03", 5.0),
        ];

        assert!(detect_recurring(&expenses).groups.is_empty());
    }

    #[test]
    fn unknown_vendor_falls_back_to_description_tokens() {
        let expenses = vec![
            row("e1", "Health", "Unknown", "Gym membership fee", "2024-01-01", 1500.0),
            row("e2", "Health", "Unknown", "Gym membership fee", "2024-02-01", 1500.0),
        ];

        let report = detect_recurring(&expenses);

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].name, "gym membership");
    }

    #[test]
    fn vendor_identity_ignores_case_and_whitespace() {
        let expenses = vec![
            row("e1", "Subscriptions", "  NETFLIX ", "Plan", "2024-01-10", 649.0),
            row("e2", "Subscriptions", "netflix", "Plan", "2024-02-10", 649.0),
        ];

        let report = detect_recurring(&expenses);

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].month_count, 2);
    }

    #[test]
    fn same_identity_different_category_stays_separate() {
        let expenses = vec![
            row("e1", "Subscriptions", "Amazon", "Prime", "2024-01-10", 300.0),
            row("e2", "Subscriptions", "Amazon", "Prime", "2024-02-10", 300.0),
            row("e3", "Shopping", "Amazon", "Books", "2024-01-12", 300.0),
            row("e4", "Shopping", "Amazon", "Books", "2024-02-12", 300.0),
        ];

        assert_eq!(detect_recurring(&expenses).groups.len(), 2);
    }

    #[test]
    fn groups_sort_by_average_descending() {
        let expenses = vec![
            row("e1", "Subscriptions", "Netflix", "Plan", "2024-01-10", 649.0),
            row("e2", "Subscriptions", "Netflix", "Plan", "2024-02-10", 649.0),
            row("e3", "Housing/Rent", "Landlord", "Rent", "2024-01-01", 15000.0),
            row("e4", "Housing/Rent", "Landlord", "Rent", "2024-02-01", 15000.0),
        ];

        let report = detect_recurring(&expenses);

        assert_eq!(report.groups[0].name, "landlord");
        assert_eq!(report.groups[1].name, "netflix");
    }

    #[test]
    fn even_occurrence_count_averages_middle_days() {
        let expenses = vec![
            row("e1", "Housing/Rent", "Landlord", "Rent", "2024-01-10", 15000.0),
            row("e2", "Housing/Rent", "Landlord", "Rent", "2024-02-20", 15000.0),
        ];

        let report = detect_recurring(&expenses);

        assert_eq!(report.groups[0].typical_day_of_month, 15);
    }

    #[test]
    fn repeated_calls_return_equal_reports() {
        let expenses = vec![
            row("e1", "Subscriptions", "Netflix", "Plan", "2024-01-10", 649.0),
            row("e2", "Subscriptions", "Netflix", "Plan", "2024-02-10", 649.0),
        ];

        assert_eq!(detect_recurring(&expenses), detect_recurring(&expenses));
    }
}
