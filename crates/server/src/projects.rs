//! Project and project summary API endpoints

use api_types::{
    project::{ProjectNew, ProjectView},
    summary::{CategoryTotal, ProjectSummary},
};
use axum::{
    Json,
    extract::{Path, State},
};
use engine::Money;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_project(project: engine::Project) -> ProjectView {
    ProjectView {
        id: project.id,
        name: project.name,
        description: project.description,
        status: project.status,
        start_date: project.start_date,
        end_date: project.end_date,
        total_revenue_minor: project.total_revenue.minor(),
        amount_paid_minor: project.amount_paid.minor(),
        unit_price_minor: project.unit_price.minor(),
        total_volume: project.total_volume,
        unit: project.unit,
    }
}

fn map_categories(totals: Vec<engine::CategoryTotal>) -> Vec<CategoryTotal> {
    totals
        .into_iter()
        .map(|total| CategoryTotal {
            category: total.category,
            total_minor: total.total.minor(),
            count: total.count,
        })
        .collect()
}

/// Handle requests for creating a project
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<Json<ProjectView>, ServerError> {
    let mut cmd = engine::ProjectNew::new(payload.name, Money::new(payload.total_revenue_minor))
        .dates(payload.start_date, payload.end_date)
        .amount_paid(Money::new(payload.amount_paid_minor.unwrap_or(0)))
        .volume(
            Money::new(payload.unit_price_minor.unwrap_or(0)),
            payload.total_volume.unwrap_or(0.0),
            payload.unit.unwrap_or_default(),
        );
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(status) = payload.status {
        cmd = cmd.status(status);
    }

    let project = state.engine.new_project(cmd).await?;
    Ok(Json(map_project(project)))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ProjectView>>, ServerError> {
    let projects = state.engine.projects().await?;
    Ok(Json(projects.into_iter().map(map_project).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectView>, ServerError> {
    let project = state.engine.project(id).await?;
    Ok(Json(map_project(project)))
}

/// Handle requests for the financial summary of a project
pub async fn summary(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectSummary>, ServerError> {
    let summary = state.engine.project_financial_summary(id).await?;
    Ok(Json(ProjectSummary {
        project_id: summary.project_id,
        project_name: summary.project_name,
        total_revenue_minor: summary.total_revenue.minor(),
        total_income_minor: summary.total_income.minor(),
        income_received_minor: summary.income_received.minor(),
        income_pending_minor: summary.income_pending.minor(),
        total_expenses_minor: summary.total_expenses.minor(),
        expenses_paid_minor: summary.expenses_paid.minor(),
        expenses_unpaid_minor: summary.expenses_unpaid.minor(),
        actual_profit_minor: summary.actual_profit.minor(),
        estimated_profit_minor: summary.estimated_profit.minor(),
        profit_margin: summary.profit_margin,
        progress_percent: summary.progress_percent,
        income_by_category: map_categories(summary.income_by_category),
        expenses_by_category: map_categories(summary.expenses_by_category),
    }))
}
