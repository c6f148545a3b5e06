use crate::{
    api::models::*,
    core::{
        balance::PairwiseDebt,
        errors::SplitbookError,
        models::{
            audit::{AppLog, GroupAudit},
            expense::GroupExpense,
            group::Group,
            personal::{NewPersonalExpense, PersonalExpense, PersonalExpenseUpdate},
            settlement::Settlement,
        },
        recurring::RecurringReport,
        services::SplitbookService,
    },
    infrastructure::{
        cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging,
        storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

pub type AppService = Arc<SplitbookService<InMemoryLogging, InMemoryStorage, InMemoryCache>>;

// Define API routes
pub fn api_routes(service: AppService) -> Router {
    Router::new()
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", get(get_group).delete(delete_group))
        .route("/groups/{group_id}/rename", post(rename_group))
        .route("/groups/{group_id}/members", post(add_member))
        .route(
            "/groups/{group_id}/expenses",
            get(list_group_expenses).post(add_group_expense),
        )
        .route(
            "/groups/{group_id}/expenses/{expense_id}",
            delete(delete_group_expense),
        )
        .route(
            "/groups/{group_id}/settlements",
            get(list_group_settlements).post(record_settlement),
        )
        .route("/groups/{group_id}/balances", get(get_group_balances))
        .route("/groups/{group_id}/audits", get(get_group_audits))
        .route("/users/{user_id}/groups", get(user_groups))
        .route(
            "/users/{user_id}/expenses",
            get(list_personal_expenses).post(add_personal_expense),
        )
        .route(
            "/users/{user_id}/expenses/{expense_id}",
            put(update_personal_expense).delete(delete_personal_expense),
        )
        .route("/users/{user_id}/recurring", get(get_recurring_report))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 200, description = "Group created successfully", body = Group),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_group(
    State(service): State<AppService>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service.create_group(req.name, req.creator).await?;
    Ok(Json(group))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(
        ("group_id" = String, Path, description = "ID of the group to retrieve")
    ),
    responses(
        (status = 200, description = "Group retrieved successfully", body = Group),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_group(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .get_group(&group_id)
        .await?
        .ok_or_else(|| SplitbookError::GroupNotFound(group_id))?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/rename",
    params(
        ("group_id" = String, Path, description = "ID of the group to rename")
    ),
    request_body = RenameGroupRequest,
    responses(
        (status = 200, description = "Group renamed successfully", body = Group),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn rename_group(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Json(req): Json<RenameGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service.rename_group(&group_id, req.name, &req.renamed_by).await?;
    Ok(Json(group))
}

#[utoipa::path(
    delete,
    path = "/api/groups/{group_id}",
    params(
        ("group_id" = String, Path, description = "ID of the group to delete")
    ),
    request_body = DeleteGroupRequest,
    responses(
        (status = 204, description = "Group and its records deleted"),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn delete_group(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Json(req): Json<DeleteGroupRequest>,
) -> Result<StatusCode, ApiError> {
    service.delete_group(&group_id, &req.deleted_by).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/members",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added successfully"),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 409, description = "Already a group member", body = ErrorResponse)
    )
)]
pub async fn add_member(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Json(req): Json<AddMemberRequest>,
) -> Result<StatusCode, ApiError> {
    service.add_member(&group_id, req.member, &req.added_by).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/expenses",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    request_body = AddGroupExpenseRequest,
    responses(
        (status = 200, description = "Expense added successfully", body = GroupExpense),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn add_group_expense(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Json(req): Json<AddGroupExpenseRequest>,
) -> Result<Json<GroupExpense>, ApiError> {
    let expense = service
        .add_group_expense(
            &group_id,
            req.description,
            req.category,
            req.amount,
            &req.paid_by,
            req.splits,
            req.date,
            &req.created_by,
        )
        .await?;
    Ok(Json(expense))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/expenses",
    params(
        ("group_id" = String, Path, description = "ID of the group"),
        UserQuery
    ),
    responses(
        (status = 200, description = "Expenses retrieved successfully", body = Vec<GroupExpense>),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn list_group_expenses(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<GroupExpense>>, ApiError> {
    let expenses = service.group_expenses(&group_id, &query.user_id).await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    delete,
    path = "/api/groups/{group_id}/expenses/{expense_id}",
    params(
        ("group_id" = String, Path, description = "ID of the group"),
        ("expense_id" = String, Path, description = "ID of the expense to delete")
    ),
    request_body = DeleteGroupExpenseRequest,
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    )
)]
pub async fn delete_group_expense(
    State(service): State<AppService>,
    Path((group_id, expense_id)): Path<(String, String)>,
    Json(req): Json<DeleteGroupExpenseRequest>,
) -> Result<StatusCode, ApiError> {
    service
        .delete_group_expense(&group_id, &expense_id, &req.deleted_by)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/settlements",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    request_body = RecordSettlementRequest,
    responses(
        (status = 200, description = "Settlement recorded successfully", body = Settlement),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn record_settlement(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Json(req): Json<RecordSettlementRequest>,
) -> Result<Json<Settlement>, ApiError> {
    let settlement = service
        .record_settlement(&group_id, &req.from, &req.to, req.amount, &req.recorded_by)
        .await?;
    Ok(Json(settlement))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/settlements",
    params(
        ("group_id" = String, Path, description = "ID of the group"),
        UserQuery
    ),
    responses(
        (status = 200, description = "Settlements retrieved successfully", body = Vec<Settlement>),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn list_group_settlements(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Settlement>>, ApiError> {
    let settlements = service.group_settlements(&group_id, &query.user_id).await?;
    Ok(Json(settlements))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/balances",
    params(
        ("group_id" = String, Path, description = "ID of the group"),
        UserQuery
    ),
    responses(
        (status = 200, description = "Net pairwise debts, largest first", body = Vec<PairwiseDebt>),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_group_balances(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<PairwiseDebt>>, ApiError> {
    let balances = service.group_balances(&group_id, &query.user_id).await?;
    Ok(Json(balances))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/audits",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Audit trail retrieved successfully", body = Vec<GroupAudit>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_group_audits(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<GroupAudit>>, ApiError> {
    let audits = service.get_group_audits(&group_id).await?;
    Ok(Json(audits))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/groups",
    params(
        ("user_id" = String, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Groups retrieved successfully", body = Vec<Group>)
    )
)]
pub async fn user_groups(
    State(service): State<AppService>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Group>>, ApiError> {
    let groups = service.user_groups(&user_id).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/expenses",
    params(
        ("user_id" = String, Path, description = "ID of the user")
    ),
    request_body = NewPersonalExpense,
    responses(
        (status = 200, description = "Expense added successfully", body = PersonalExpense),
        (status = 400, description = "Bad request", body = ErrorResponse)
    )
)]
pub async fn add_personal_expense(
    State(service): State<AppService>,
    Path(user_id): Path<String>,
    Json(req): Json<NewPersonalExpense>,
) -> Result<Json<PersonalExpense>, ApiError> {
    let expense = service.add_personal_expense(&user_id, req).await?;
    Ok(Json(expense))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/expenses",
    params(
        ("user_id" = String, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Expenses retrieved, newest first", body = Vec<PersonalExpense>)
    )
)]
pub async fn list_personal_expenses(
    State(service): State<AppService>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<PersonalExpense>>, ApiError> {
    let expenses = service.personal_expenses(&user_id).await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}/expenses/{expense_id}",
    params(
        ("user_id" = String, Path, description = "ID of the user"),
        ("expense_id" = String, Path, description = "ID of the expense to update")
    ),
    request_body = PersonalExpenseUpdate,
    responses(
        (status = 200, description = "Expense updated successfully", body = PersonalExpense),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    )
)]
pub async fn update_personal_expense(
    State(service): State<AppService>,
    Path((user_id, expense_id)): Path<(String, String)>,
    Json(req): Json<PersonalExpenseUpdate>,
) -> Result<Json<PersonalExpense>, ApiError> {
    let expense = service.update_personal_expense(&user_id, &expense_id, req).await?;
    Ok(Json(expense))
}

#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/expenses/{expense_id}",
    params(
        ("user_id" = String, Path, description = "ID of the user"),
        ("expense_id" = String, Path, description = "ID of the expense to delete")
    ),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    )
)]
pub async fn delete_personal_expense(
    State(service): State<AppService>,
    Path((user_id, expense_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    service.delete_personal_expense(&user_id, &expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/recurring",
    params(
        ("user_id" = String, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Recurring patterns detected over the user's expenses", body = RecurringReport)
    )
)]
pub async fn get_recurring_report(
    State(service): State<AppService>,
    Path(user_id): Path<String>,
) -> Result<Json<RecurringReport>, ApiError> {
    let report = service.recurring_report(&user_id).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Application logs retrieved", body = Vec<AppLog>)
    )
)]
pub async fn get_app_logs(State(service): State<AppService>) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs().await?;
    Ok(Json(logs))
}
