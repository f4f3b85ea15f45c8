//! Project income and expense API endpoints
//!
//! Both sides expose the same routes; `entry_handlers!` generates one module
//! per side.

use api_types::{WithWarnings, project as api};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Money, ProjectEntry, ProjectEntryNew, ProjectEntryPatch};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, with_warnings};

fn map_entry<S, T>(entry: ProjectEntry<S>, map_status: impl FnOnce(S) -> T) -> api::EntryView<T> {
    api::EntryView {
        id: entry.id,
        project_id: entry.project_id,
        date: entry.date,
        category: entry.category,
        description: entry.description,
        amount_minor: entry.amount.minor(),
        status: map_status(entry.status),
        finance_id: entry.finance_id,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    }
}

fn new_from_payload<S, T>(
    project_id: Uuid,
    payload: api::EntryNew<T>,
    status_from_api: impl FnOnce(T) -> S,
) -> ProjectEntryNew<S> {
    let cmd = ProjectEntryNew::new(
        project_id,
        payload.date,
        payload.category,
        Money::new(payload.amount_minor),
        status_from_api(payload.status),
    );
    match payload.description {
        Some(description) => cmd.description(description),
        None => cmd,
    }
}

fn patch_from_payload<S: Copy, T>(
    payload: api::EntryUpdate<T>,
    status_from_api: impl FnOnce(T) -> S,
) -> ProjectEntryPatch<S> {
    ProjectEntryPatch {
        date: payload.date,
        category: payload.category,
        description: payload.description,
        amount: payload.amount_minor.map(Money::new),
        status: payload.status.map(status_from_api),
    }
}

macro_rules! entry_handlers {
    (
        $module:ident,
        $status:ident { $($variant:ident),+ $(,)? },
        create: $create:ident,
        update: $update:ident,
        delete: $delete:ident,
        get: $get:ident,
        list: $list:ident,
        list_all: $list_all:ident $(,)?
    ) => {
        pub mod $module {
            use super::*;

            fn map_status(status: engine::$status) -> api::$status {
                match status {
                    $(engine::$status::$variant => api::$status::$variant),+
                }
            }

            fn status_from_api(status: api::$status) -> engine::$status {
                match status {
                    $(api::$status::$variant => engine::$status::$variant),+
                }
            }

            fn view(entry: ProjectEntry<engine::$status>) -> api::EntryView<api::$status> {
                map_entry(entry, map_status)
            }

            pub async fn list(
                State(state): State<ServerState>,
                Path(project_id): Path<Uuid>,
            ) -> Result<Json<Vec<api::EntryView<api::$status>>>, ServerError> {
                let entries = state.engine.$list(project_id).await?;
                Ok(Json(entries.into_iter().map(view).collect()))
            }

            pub async fn list_all(
                State(state): State<ServerState>,
            ) -> Result<Json<Vec<api::EntryView<api::$status>>>, ServerError> {
                let entries = state.engine.$list_all().await?;
                Ok(Json(entries.into_iter().map(view).collect()))
            }

            pub async fn create(
                State(state): State<ServerState>,
                Path(project_id): Path<Uuid>,
                Json(payload): Json<api::EntryNew<api::$status>>,
            ) -> Result<Json<WithWarnings<api::EntryView<api::$status>>>, ServerError> {
                let cmd = new_from_payload(project_id, payload, status_from_api);
                let synced = state.engine.$create(cmd).await?;
                Ok(Json(with_warnings(synced, view)))
            }

            pub async fn get(
                State(state): State<ServerState>,
                Path(id): Path<Uuid>,
            ) -> Result<Json<api::EntryView<api::$status>>, ServerError> {
                let entry = state.engine.$get(id).await?;
                Ok(Json(view(entry)))
            }

            pub async fn update(
                State(state): State<ServerState>,
                Path(id): Path<Uuid>,
                Json(payload): Json<api::EntryUpdate<api::$status>>,
            ) -> Result<Json<WithWarnings<api::EntryView<api::$status>>>, ServerError> {
                let patch = patch_from_payload(payload, status_from_api);
                let synced = state.engine.$update(id, patch).await?;
                Ok(Json(with_warnings(synced, view)))
            }

            /// The ledger mirror, if any, is left in place.
            pub async fn delete(
                State(state): State<ServerState>,
                Path(id): Path<Uuid>,
            ) -> Result<StatusCode, ServerError> {
                state.engine.$delete(id).await?;
                Ok(StatusCode::NO_CONTENT)
            }
        }
    };
}

entry_handlers!(
    incomes,
    IncomeStatus { Received, Pending, Planned },
    create: create_project_income,
    update: update_project_income,
    delete: delete_project_income,
    get: project_income,
    list: project_incomes,
    list_all: all_project_incomes,
);

entry_handlers!(
    expenses,
    ExpenseStatus { Paid, Unpaid, Pending },
    create: create_project_expense,
    update: update_project_expense,
    delete: delete_project_expense,
    get: project_expense,
    list: project_expenses,
    list_all: all_project_expenses,
);
