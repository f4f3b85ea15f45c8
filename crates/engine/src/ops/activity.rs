use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ConnectionTrait, DatabaseTransaction, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{Activity, ActivityKind, EngineError, ResultEngine, activities};

use super::{Engine, with_tx};

async fn insert_activity<C: ConnectionTrait>(
    db: &C,
    kind: ActivityKind,
    title: &str,
    description: &str,
) -> ResultEngine<()> {
    let activity = Activity {
        id: Uuid::new_v4(),
        kind,
        title: title.to_string(),
        description: description.to_string(),
        timestamp: Utc::now(),
    };
    activities::ActiveModel::from(&activity).insert(db).await?;
    Ok(())
}

/// Appends to the activity feed inside a savepoint of `db_tx`.
///
/// A failed insert is logged and rolled back on its own; it never fails the
/// caller.
pub(super) async fn record_activity(
    db_tx: &DatabaseTransaction,
    kind: ActivityKind,
    title: &str,
    description: &str,
) {
    let outcome = async {
        let sp = db_tx.begin().await?;
        match insert_activity(&sp, kind, title, description).await {
            Ok(()) => {
                sp.commit().await?;
                Ok::<_, EngineError>(())
            }
            Err(err) => {
                sp.rollback().await?;
                Err(err)
            }
        }
    }
    .await;
    if let Err(err) = outcome {
        tracing::warn!(%kind, title, error = %err, "activity log failed");
    }
}

impl Engine {
    /// Appends to the activity feed. Failures are logged and swallowed.
    pub async fn log_activity(&self, kind: ActivityKind, title: &str, description: &str) {
        if let Err(err) = insert_activity(&self.database, kind, title, description).await {
            tracing::warn!(%kind, title, error = %err, "activity log failed");
        }
    }

    /// Most recent activities, newest first.
    pub async fn recent_activities(&self, limit: u64) -> ResultEngine<Vec<Activity>> {
        with_tx!(self, |db_tx| {
            let models = activities::Entity::find()
                .order_by_desc(activities::Column::Timestamp)
                .limit(limit)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Activity::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }
}
