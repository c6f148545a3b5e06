use chrono::NaiveDate;

use crate::core::errors::SplitbookError;
use crate::core::models::{expense::Split, group::Group};
use crate::core::services::SplitbookService;
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use crate::tests::{create_test_service, member};

type TestService = SplitbookService<InMemoryLogging, InMemoryStorage, InMemoryCache>;

fn split(uid: &str, amount: f64) -> Split {
    Split {
        uid: uid.to_string(),
        name: String::new(),
        amount,
    }
}

async fn trio_group(service: &TestService) -> Group {
    let group = service
        .create_group("Trip".to_string(), member("alice", "Alice"))
        .await
        .unwrap();
    service.add_member(&group.id, member("bob", "Bob"), "alice").await.unwrap();
    service.add_member(&group.id, member("carol", "Carol"), "alice").await.unwrap();
    group
}

#[tokio::test]
async fn test_expenses_and_settlement_flow() {
    let service = create_test_service();
    let group = trio_group(&service).await;
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    service
        .add_group_expense(
            &group.id,
            "Hotel".to_string(),
            "Travel".to_string(),
            300.0,
            "alice",
            vec![split("alice", 100.0), split("bob", 100.0), split("carol", 100.0)],
            date,
            "alice",
        )
        .await
        .unwrap();
    service
        .add_group_expense(
            &group.id,
            "Dinner".to_string(),
            "Food & Dining".to_string(),
            60.0,
            "bob",
            vec![split("alice", 30.0), split("bob", 30.0)],
            date,
            "bob",
        )
        .await
        .unwrap();

    let balances = service.group_balances(&group.id, "alice").await.unwrap();
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].debtor, "carol");
    assert_eq!(balances[0].creditor, "alice");
    assert_eq!(balances[0].amount, 100.0);
    assert_eq!(balances[1].debtor, "bob");
    assert_eq!(balances[1].amount, 70.0);
    assert_eq!(balances[1].debtor_name, "Bob");

    service
        .record_settlement(&group.id, "bob", "alice", 70.0, "bob")
        .await
        .unwrap();

    let balances = service.group_balances(&group.id, "alice").await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].debtor, "carol");
    assert_eq!(balances[0].amount, 100.0);
}

#[tokio::test]
async fn test_balances_are_cached_and_invalidated() {
    let service = create_test_service();
    let group = trio_group(&service).await;
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    service
        .add_group_expense(
            &group.id,
            "Taxi".to_string(),
            "Transport".to_string(),
            90.0,
            "alice",
            vec![split("bob", 45.0), split("carol", 45.0)],
            date,
            "alice",
        )
        .await
        .unwrap();

    let first = service.group_balances(&group.id, "alice").await.unwrap();
    let cached = service.group_balances(&group.id, "alice").await.unwrap();
    assert_eq!(first, cached);

    // A new expense must be visible on the next read.
    service
        .add_group_expense(
            &group.id,
            "Snacks".to_string(),
            "Food & Dining".to_string(),
            20.0,
            "alice",
            vec![split("bob", 20.0)],
            date,
            "alice",
        )
        .await
        .unwrap();

    let refreshed = service.group_balances(&group.id, "alice").await.unwrap();
    let bob = refreshed.iter().find(|d| d.debtor == "bob").unwrap();
    assert_eq!(bob.amount, 65.0);
}

#[tokio::test]
async fn test_deleting_expense_restores_balance() {
    let service = create_test_service();
    let group = trio_group(&service).await;
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let expense = service
        .add_group_expense(
            &group.id,
            "Taxi".to_string(),
            "Transport".to_string(),
            50.0,
            "alice",
            vec![split("bob", 50.0)],
            date,
            "alice",
        )
        .await
        .unwrap();

    assert_eq!(service.group_balances(&group.id, "alice").await.unwrap().len(), 1);

    service
        .delete_group_expense(&group.id, &expense.id, "alice")
        .await
        .unwrap();

    assert!(service.group_balances(&group.id, "alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_split_sum_must_match_amount() {
    let service = create_test_service();
    let group = trio_group(&service).await;
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let result = service
        .add_group_expense(
            &group.id,
            "Hotel".to_string(),
            "Travel".to_string(),
            100.0,
            "alice",
            vec![split("bob", 40.0), split("carol", 40.0)],
            date,
            "alice",
        )
        .await;
    assert!(matches!(result, Err(SplitbookError::InvalidSplit)));
}

#[tokio::test]
async fn test_split_user_must_be_member() {
    let service = create_test_service();
    let group = trio_group(&service).await;
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let result = service
        .add_group_expense(
            &group.id,
            "Hotel".to_string(),
            "Travel".to_string(),
            100.0,
            "alice",
            vec![split("mallory", 100.0)],
            date,
            "alice",
        )
        .await;
    assert!(matches!(result, Err(SplitbookError::InvalidSplitUser(_))));
}

#[tokio::test]
async fn test_payer_must_be_member() {
    let service = create_test_service();
    let group = trio_group(&service).await;
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let result = service
        .add_group_expense(
            &group.id,
            "Hotel".to_string(),
            "Travel".to_string(),
            100.0,
            "mallory",
            vec![split("bob", 100.0)],
            date,
            "alice",
        )
        .await;
    assert!(matches!(result, Err(SplitbookError::NotGroupMember(_))));
}

#[tokio::test]
async fn test_settlement_validation() {
    let service = create_test_service();
    let group = trio_group(&service).await;

    let result = service.record_settlement(&group.id, "bob", "bob", 10.0, "bob").await;
    assert!(matches!(result, Err(SplitbookError::SelfSettlement)));

    let result = service.record_settlement(&group.id, "bob", "alice", -5.0, "bob").await;
    assert!(matches!(result, Err(SplitbookError::InvalidInput(_, _))));

    let result = service.record_settlement(&group.id, "bob", "mallory", 10.0, "bob").await;
    assert!(matches!(result, Err(SplitbookError::NotGroupMember(_))));
}

#[tokio::test]
async fn test_overpaid_settlement_floors_at_zero() {
    let service = create_test_service();
    let group = trio_group(&service).await;
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    service
        .add_group_expense(
            &group.id,
            "Taxi".to_string(),
            "Transport".to_string(),
            40.0,
            "alice",
            vec![split("bob", 40.0)],
            date,
            "alice",
        )
        .await
        .unwrap();
    service
        .record_settlement(&group.id, "bob", "alice", 100.0, "bob")
        .await
        .unwrap();

    // The debt zeroes out; no reverse debt appears.
    assert!(service.group_balances(&group.id, "alice").await.unwrap().is_empty());
}
