//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when input is rejected before any write.
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`Recalculation`] thrown when payroll figures cannot be recomputed.
//!
//! Ledger mirror failures are deliberately absent: they never abort a request
//! and travel as [`SyncWarning`]s instead.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Recalculation`]: EngineError::Recalculation
//!  [`SyncWarning`]: crate::SyncWarning
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Recalculation failed: {0}")]
    Recalculation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Recalculation(a), Self::Recalculation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
