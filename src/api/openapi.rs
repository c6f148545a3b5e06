use utoipa::OpenApi;

use crate::{
    api::models::{
        AddGroupExpenseRequest, AddMemberRequest, CreateGroupRequest, DeleteGroupExpenseRequest,
        DeleteGroupRequest, ErrorResponse, RecordSettlementRequest, RenameGroupRequest,
    },
    core::{
        balance::PairwiseDebt,
        models::{
            audit::{AppLog, GroupAudit},
            expense::{GroupExpense, Split},
            group::Group,
            member::Member,
            personal::{NewPersonalExpense, PersonalExpense, PersonalExpenseUpdate},
            settlement::Settlement,
        },
        recurring::{RecurringGroup, RecurringReport},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_group,
        super::handlers::get_group,
        super::handlers::rename_group,
        super::handlers::delete_group,
        super::handlers::add_member,
        super::handlers::add_group_expense,
        super::handlers::list_group_expenses,
        super::handlers::delete_group_expense,
        super::handlers::record_settlement,
        super::handlers::list_group_settlements,
        super::handlers::get_group_balances,
        super::handlers::get_group_audits,
        super::handlers::user_groups,
        super::handlers::add_personal_expense,
        super::handlers::list_personal_expenses,
        super::handlers::update_personal_expense,
        super::handlers::delete_personal_expense,
        super::handlers::get_recurring_report,
        super::handlers::get_app_logs
    ),
    components(schemas(
        CreateGroupRequest,
        RenameGroupRequest,
        DeleteGroupRequest,
        AddMemberRequest,
        AddGroupExpenseRequest,
        DeleteGroupExpenseRequest,
        RecordSettlementRequest,
        NewPersonalExpense,
        PersonalExpenseUpdate,
        ErrorResponse,
        Member,
        Group,
        Split,
        GroupExpense,
        Settlement,
        PersonalExpense,
        PairwiseDebt,
        RecurringGroup,
        RecurringReport,
        AppLog,
        GroupAudit
    )),
    info(
        title = "Splitbook API",
        description = "API for tracking personal expenses, splitting group costs and settling debts",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
