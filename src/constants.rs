//! Tolerances, category whitelist and audit action names shared across the crate.

/// Maximum drift allowed between an expense amount and the sum of its splits.
pub const SPLIT_TOLERANCE: f64 = 0.01;

/// Net balances below this (after rounding to 2 decimals) count as settled.
pub const BALANCE_EPSILON: f64 = 0.01;

/// Largest single amount accepted by input validation.
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// A pattern must span at least this many distinct calendar months to recur.
pub const MIN_RECURRING_MONTHS: usize = 2;

/// Mean amount floor that filters trivial amounts out of recurrence detection.
pub const MIN_RECURRING_MEAN: f64 = 10.0;

/// Coefficient-of-variation ceiling for a group to count as recurring.
pub const MAX_RECURRING_CV: f64 = 0.5;

/// Display label for uids that cannot be resolved against the member set.
pub const UNKNOWN_MEMBER: &str = "Unknown";

/// Vendor sentinel the parsing collaborator emits when no merchant was found.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Category the capture boundary falls back to for off-whitelist values.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Category whitelist the parsing collaborator is prompted with.
pub const CATEGORIES: [&str; 14] = [
    "Food & Dining",
    "Groceries",
    "Housing/Rent",
    "Transport",
    "Shopping",
    "Entertainment",
    "Health",
    "Utilities",
    "Subscriptions",
    "Education",
    "Travel",
    "Personal Care",
    "Gifts",
    "Other",
];

// Audit action names.
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const GROUP_RENAMED: &str = "GROUP_RENAMED";
pub const GROUP_DELETED: &str = "GROUP_DELETED";
pub const MEMBER_ADDED: &str = "MEMBER_ADDED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const EXPENSE_DELETED: &str = "EXPENSE_DELETED";
pub const SETTLEMENT_RECORDED: &str = "SETTLEMENT_RECORDED";
pub const BALANCES_QUERIED: &str = "BALANCES_QUERIED";
pub const PERSONAL_EXPENSE_ADDED: &str = "PERSONAL_EXPENSE_ADDED";
pub const PERSONAL_EXPENSE_UPDATED: &str = "PERSONAL_EXPENSE_UPDATED";
pub const PERSONAL_EXPENSE_DELETED: &str = "PERSONAL_EXPENSE_DELETED";
