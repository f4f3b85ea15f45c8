//! Member, salary, salary detail and kasbon API endpoints

use api_types::payroll::{
    KasbonNew, KasbonView, MemberNew, MemberView, SalaryDetailNew, SalaryDetailView,
    SalaryFigures, SalaryNew, SalaryUpdate, SalaryView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{KasbonCmd, Money, SalaryDetailCmd, SalaryMonth, SalaryPatch};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_member(member: engine::Member) -> MemberView {
    MemberView {
        id: member.id,
        full_name: member.full_name,
        role: member.role,
        active: member.active,
    }
}

fn map_figures(figures: engine::SalaryFigures) -> SalaryFigures {
    SalaryFigures {
        gross_salary_minor: figures.gross_salary.minor(),
        loan_minor: figures.loan.minor(),
        net_salary_minor: figures.net_salary.minor(),
    }
}

fn map_salary(salary: engine::Salary) -> SalaryView {
    let figures = map_figures(salary.figures());
    SalaryView {
        id: salary.id,
        member_id: salary.member_id,
        month: salary.month.to_string(),
        status: salary.status,
        gross_salary_minor: figures.gross_salary_minor,
        loan_minor: figures.loan_minor,
        net_salary_minor: figures.net_salary_minor,
        documents: salary.documents,
        created_at: salary.created_at,
        updated_at: salary.updated_at,
    }
}

fn map_detail(detail: engine::SalaryDetail) -> SalaryDetailView {
    SalaryDetailView {
        id: detail.id,
        salary_id: detail.salary_id,
        date: detail.date,
        hours: detail.hours,
        rate_per_hour_minor: detail.rate_per_hour.minor(),
        note: detail.note,
    }
}

fn map_kasbon(kasbon: engine::Kasbon) -> KasbonView {
    KasbonView {
        id: kasbon.id,
        salary_id: kasbon.salary_id,
        date: kasbon.date,
        amount_minor: kasbon.amount.minor(),
        note: kasbon.note,
    }
}

fn parse_month(month: &str) -> Result<SalaryMonth, ServerError> {
    Ok(month.parse::<SalaryMonth>()?)
}

fn detail_cmd(payload: SalaryDetailNew) -> SalaryDetailCmd {
    let cmd = SalaryDetailCmd::new(
        payload.salary_id,
        payload.date,
        payload.hours,
        Money::new(payload.rate_per_hour_minor),
    );
    match payload.note {
        Some(note) => cmd.note(note),
        None => cmd,
    }
}

fn kasbon_cmd(payload: KasbonNew) -> KasbonCmd {
    let cmd = KasbonCmd::new(payload.salary_id, payload.date, Money::new(payload.amount_minor));
    match payload.note {
        Some(note) => cmd.note(note),
        None => cmd,
    }
}

/// Handle requests for registering a member
pub async fn member_new(
    State(state): State<ServerState>,
    Json(payload): Json<MemberNew>,
) -> Result<Json<MemberView>, ServerError> {
    let mut cmd = engine::MemberNew::new(payload.full_name, payload.role.unwrap_or_default());
    if let Some(active) = payload.active {
        cmd = cmd.active(active);
    }
    let member = state.engine.new_member(cmd).await?;
    Ok(Json(map_member(member)))
}

pub async fn members(State(state): State<ServerState>) -> Result<Json<Vec<MemberView>>, ServerError> {
    let members = state.engine.members().await?;
    Ok(Json(members.into_iter().map(map_member).collect()))
}

pub async fn member(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberView>, ServerError> {
    let member = state.engine.member(id).await?;
    Ok(Json(map_member(member)))
}

/// Handle requests for opening a salary for a member
pub async fn salary_new(
    State(state): State<ServerState>,
    Path(member_id): Path<Uuid>,
    Json(payload): Json<SalaryNew>,
) -> Result<Json<SalaryView>, ServerError> {
    let mut cmd = engine::SalaryNew::new(parse_month(&payload.month)?);
    if let Some(status) = payload.status {
        cmd = cmd.status(status);
    }
    if let Some(documents) = payload.documents {
        cmd = cmd.documents(documents);
    }
    let salary = state.engine.create_salary(member_id, cmd).await?;
    Ok(Json(map_salary(salary)))
}

pub async fn salaries(
    State(state): State<ServerState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Vec<SalaryView>>, ServerError> {
    let salaries = state.engine.salaries_for_member(member_id).await?;
    Ok(Json(salaries.into_iter().map(map_salary).collect()))
}

pub async fn salary(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SalaryView>, ServerError> {
    let salary = state.engine.salary(id).await?;
    Ok(Json(map_salary(salary)))
}

/// Handle requests for changing month, status or documents of a salary.
///
/// The figures are not writable here.
pub async fn salary_update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SalaryUpdate>,
) -> Result<Json<SalaryView>, ServerError> {
    let mut patch = SalaryPatch::default();
    if let Some(month) = payload.month {
        patch = patch.month(parse_month(&month)?);
    }
    if let Some(status) = payload.status {
        patch = patch.status(status);
    }
    if let Some(documents) = payload.documents {
        patch = patch.documents(documents);
    }
    let salary = state.engine.update_salary(id, patch).await?;
    Ok(Json(map_salary(salary)))
}

pub async fn salary_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_salary(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn recalculate(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SalaryFigures>, ServerError> {
    let figures = state.engine.recalculate_salary(id).await?;
    Ok(Json(map_figures(figures)))
}

pub async fn details(
    State(state): State<ServerState>,
    Path(salary_id): Path<Uuid>,
) -> Result<Json<Vec<SalaryDetailView>>, ServerError> {
    let details = state.engine.salary_details(salary_id).await?;
    Ok(Json(details.into_iter().map(map_detail).collect()))
}

pub async fn detail_new(
    State(state): State<ServerState>,
    Json(payload): Json<SalaryDetailNew>,
) -> Result<Json<SalaryDetailView>, ServerError> {
    let detail = state.engine.create_salary_detail(detail_cmd(payload)).await?;
    Ok(Json(map_detail(detail)))
}

pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SalaryDetailView>, ServerError> {
    let detail = state.engine.salary_detail(id).await?;
    Ok(Json(map_detail(detail)))
}

pub async fn detail_update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SalaryDetailNew>,
) -> Result<Json<SalaryDetailView>, ServerError> {
    let detail = state
        .engine
        .update_salary_detail(id, detail_cmd(payload))
        .await?;
    Ok(Json(map_detail(detail)))
}

pub async fn detail_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_salary_detail(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn kasbons(
    State(state): State<ServerState>,
    Path(salary_id): Path<Uuid>,
) -> Result<Json<Vec<KasbonView>>, ServerError> {
    let kasbons = state.engine.kasbons(salary_id).await?;
    Ok(Json(kasbons.into_iter().map(map_kasbon).collect()))
}

pub async fn kasbon_new(
    State(state): State<ServerState>,
    Json(payload): Json<KasbonNew>,
) -> Result<Json<KasbonView>, ServerError> {
    let kasbon = state.engine.create_kasbon(kasbon_cmd(payload)).await?;
    Ok(Json(map_kasbon(kasbon)))
}

pub async fn kasbon(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<KasbonView>, ServerError> {
    let kasbon = state.engine.kasbon(id).await?;
    Ok(Json(map_kasbon(kasbon)))
}

pub async fn kasbon_update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<KasbonNew>,
) -> Result<Json<KasbonView>, ServerError> {
    let kasbon = state.engine.update_kasbon(id, kasbon_cmd(payload)).await?;
    Ok(Json(map_kasbon(kasbon)))
}

pub async fn kasbon_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_kasbon(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
