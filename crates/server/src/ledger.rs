//! Ledger API endpoints

use api_types::{
    WithWarnings,
    ledger::{
        LedgerEntryNew, LedgerEntryView, LedgerKind as ApiKind, LedgerQuery,
        LedgerSource as ApiSource, LedgerStatus as ApiStatus, LedgerTotals, MonthlyComparison,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use engine::{LedgerCategory, LedgerEntryCmd, LedgerFilter, Money};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, with_warnings};

fn map_kind(kind: engine::LedgerKind) -> ApiKind {
    match kind {
        engine::LedgerKind::Income => ApiKind::Income,
        engine::LedgerKind::Expense => ApiKind::Expense,
    }
}

fn kind_from_api(kind: ApiKind) -> engine::LedgerKind {
    match kind {
        ApiKind::Income => engine::LedgerKind::Income,
        ApiKind::Expense => engine::LedgerKind::Expense,
    }
}

fn map_status(status: engine::LedgerStatus) -> ApiStatus {
    match status {
        engine::LedgerStatus::Paid => ApiStatus::Paid,
        engine::LedgerStatus::Unpaid => ApiStatus::Unpaid,
    }
}

fn status_from_api(status: ApiStatus) -> engine::LedgerStatus {
    match status {
        ApiStatus::Paid => engine::LedgerStatus::Paid,
        ApiStatus::Unpaid => engine::LedgerStatus::Unpaid,
    }
}

fn map_source(source: engine::LedgerSource) -> ApiSource {
    match source {
        engine::LedgerSource::Manual => ApiSource::Manual,
        engine::LedgerSource::Project => ApiSource::Project,
    }
}

fn map_entry(entry: engine::LedgerEntry) -> LedgerEntryView {
    LedgerEntryView {
        id: entry.id,
        date: entry.date,
        unit_count: entry.unit_count,
        price_per_unit_minor: entry.price_per_unit.minor(),
        amount_minor: entry.amount.minor(),
        note: entry.note,
        kind: map_kind(entry.kind),
        category: entry.category,
        status: map_status(entry.status),
        project_id: entry.project_id,
        project_income_id: entry.project_income_id,
        project_expense_id: entry.project_expense_id,
        source: map_source(entry.source),
    }
}

fn cmd_from_payload(payload: LedgerEntryNew) -> LedgerEntryCmd {
    let mut cmd = LedgerEntryCmd::new(
        payload.date,
        kind_from_api(payload.kind),
        payload.category,
        payload.unit_count,
        Money::new(payload.price_per_unit_minor),
    )
    .status(payload.status.map_or(engine::LedgerStatus::Paid, status_from_api));
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }
    if let Some(project_id) = payload.project_id {
        cmd = cmd.project_id(project_id);
    }
    cmd
}

fn filter_from_query(query: LedgerQuery) -> Result<LedgerFilter, ServerError> {
    let mut filter = LedgerFilter::default()
        .dates(query.from, query.to)
        .amounts(
            query.min_amount_minor.map(Money::new),
            query.max_amount_minor.map(Money::new),
        );
    if let Some(kind) = query.kind {
        filter = filter.kind(kind_from_api(kind));
    }
    if let Some(category) = query.category {
        let category = LedgerCategory::try_from(category.as_str())
            .map_err(|err| ServerError::Generic(err.to_string()))?;
        filter = filter.category(category);
    }
    if let Some(status) = query.status {
        filter = filter.status(status_from_api(status));
    }
    if let Some(project_id) = query.project_id {
        filter = filter.project_id(project_id);
    }
    Ok(filter)
}

/// Handle requests for listing ledger entries
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<Vec<LedgerEntryView>>, ServerError> {
    let filter = filter_from_query(query)?;
    let entries = state.engine.list_ledger_entries(&filter).await?;
    Ok(Json(entries.into_iter().map(map_entry).collect()))
}

/// Handle requests for creating a manual ledger entry
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<LedgerEntryNew>,
) -> Result<Json<LedgerEntryView>, ServerError> {
    let entry = state
        .engine
        .create_ledger_entry(cmd_from_payload(payload))
        .await?;
    Ok(Json(map_entry(entry)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LedgerEntryView>, ServerError> {
    let entry = state.engine.ledger_entry(id).await?;
    Ok(Json(map_entry(entry)))
}

/// Handle requests for replacing a ledger entry
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LedgerEntryNew>,
) -> Result<Json<WithWarnings<LedgerEntryView>>, ServerError> {
    let synced = state
        .engine
        .update_ledger_entry(id, cmd_from_payload(payload))
        .await?;
    Ok(Json(with_warnings(synced, map_entry)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WithWarnings<()>>, ServerError> {
    let synced = state.engine.delete_ledger_entry(id).await?;
    Ok(Json(with_warnings(synced, |()| ())))
}

pub async fn totals(State(state): State<ServerState>) -> Result<Json<LedgerTotals>, ServerError> {
    let totals = state.engine.ledger_totals().await?;
    Ok(Json(LedgerTotals {
        income_minor: totals.income.minor(),
        expense_minor: totals.expense.minor(),
        balance_minor: totals.balance().minor(),
    }))
}

/// Handle requests for the month by month income/expense comparison
pub async fn monthly(
    State(state): State<ServerState>,
) -> Result<Json<Vec<MonthlyComparison>>, ServerError> {
    let months = state.engine.monthly_comparison().await?;
    Ok(Json(
        months
            .into_iter()
            .map(|month| MonthlyComparison {
                month: month.month,
                income_minor: month.income.minor(),
                expense_minor: month.expense.minor(),
            })
            .collect(),
    ))
}
