use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{activities, ledger, payroll, project_entries, projects};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Every route of the API. Callers are not authenticated.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/ledger", get(ledger::list).post(ledger::create))
        .route("/ledger/totals", get(ledger::totals))
        .route("/ledger/monthly", get(ledger::monthly))
        .route(
            "/ledger/{id}",
            get(ledger::get).put(ledger::update).delete(ledger::delete),
        )
        .route("/projects", get(projects::list).post(projects::create))
        .route("/projects/{id}", get(projects::get))
        .route("/projects/{id}/summary", get(projects::summary))
        .route(
            "/projects/{id}/incomes",
            get(project_entries::incomes::list).post(project_entries::incomes::create),
        )
        .route(
            "/projects/{id}/expenses",
            get(project_entries::expenses::list).post(project_entries::expenses::create),
        )
        .route("/incomes", get(project_entries::incomes::list_all))
        .route(
            "/incomes/{id}",
            get(project_entries::incomes::get)
                .patch(project_entries::incomes::update)
                .delete(project_entries::incomes::delete),
        )
        .route("/expenses", get(project_entries::expenses::list_all))
        .route(
            "/expenses/{id}",
            get(project_entries::expenses::get)
                .patch(project_entries::expenses::update)
                .delete(project_entries::expenses::delete),
        )
        .route("/members", get(payroll::members).post(payroll::member_new))
        .route("/members/{id}", get(payroll::member))
        .route(
            "/members/{id}/salaries",
            get(payroll::salaries).post(payroll::salary_new),
        )
        .route(
            "/salaries/{id}",
            get(payroll::salary)
                .patch(payroll::salary_update)
                .delete(payroll::salary_delete),
        )
        .route("/salaries/{id}/recalculate", post(payroll::recalculate))
        .route("/salaries/{id}/details", get(payroll::details))
        .route("/salaries/{id}/kasbons", get(payroll::kasbons))
        .route("/salary-details", post(payroll::detail_new))
        .route(
            "/salary-details/{id}",
            get(payroll::detail)
                .put(payroll::detail_update)
                .delete(payroll::detail_delete),
        )
        .route("/kasbons", post(payroll::kasbon_new))
        .route(
            "/kasbons/{id}",
            get(payroll::kasbon)
                .put(payroll::kasbon_update)
                .delete(payroll::kasbon_delete),
        )
        .route("/activities", get(activities::recent))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}
