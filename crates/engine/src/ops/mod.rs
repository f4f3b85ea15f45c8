use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod activity;
mod ledger;
mod payroll;
mod project_entries;
mod projects;
mod summary;
mod sync;

pub use ledger::{LedgerFilter, LedgerTotals, MonthlyComparison};
pub use summary::{CategoryTotal, ProjectFinancialSummary};
pub use sync::{SyncAction, SyncWarning, Synced};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

/// Run a ledger sync step inside a savepoint of `$db_tx`.
///
/// On failure only the savepoint is rolled back: the error is logged and
/// handed back as a [`SyncWarning`] so the enclosing write still commits.
macro_rules! best_effort {
    ($db_tx:expr, $action:expr, |$sp:ident| $body:expr) => {{
        let action: $crate::SyncAction = $action;
        let outcome = async {
            let $sp = $db_tx.begin().await?;
            let result: $crate::ResultEngine<_> = $body;
            match result {
                Ok(value) => {
                    $sp.commit().await?;
                    Ok::<_, $crate::EngineError>(value)
                }
                Err(err) => {
                    $sp.rollback().await?;
                    Err(err)
                }
            }
        }
        .await;
        outcome.map_err(|err| {
            tracing::warn!(%action, error = %err, "ledger sync failed, primary write kept");
            $crate::SyncWarning::new(action, &err)
        })
    }};
}

pub(crate) use best_effort;
pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
