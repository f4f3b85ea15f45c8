use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::{SyncWarning, WithWarnings};
use serde::Serialize;
pub use server::{router, run_with_listener};

mod activities;
mod ledger;
mod payroll;
mod project_entries;
mod projects;
mod server;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Recalculation(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Recalculation(msg) => {
            tracing::error!("salary recalculation failed: {msg}");
            format!("Recalculation failed: {msg}")
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Wraps the value of a synced write together with its ledger warnings.
fn with_warnings<T, U>(synced: engine::Synced<T>, map: impl FnOnce(T) -> U) -> WithWarnings<U> {
    let warnings = synced
        .warnings
        .into_iter()
        .map(|warning| SyncWarning {
            action: warning.action.as_str().to_string(),
            message: warning.message,
        })
        .collect();
    WithWarnings {
        data: map(synced.value),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_recalculation_maps_to_500() {
        let res = ServerError::from(EngineError::Recalculation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn database_error_message_is_generic() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("disk on fire".to_string()));
        assert_eq!(status_for_engine_error(&err), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message_for_engine_error(err), "internal server error");
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
