//! Activity feed API endpoints

use api_types::activity::{ActivityKind as ApiKind, ActivityQuery, ActivityView};
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState};

const DEFAULT_LIMIT: u64 = 20;

fn map_kind(kind: engine::ActivityKind) -> ApiKind {
    match kind {
        engine::ActivityKind::Income => ApiKind::Income,
        engine::ActivityKind::Expense => ApiKind::Expense,
        engine::ActivityKind::Member => ApiKind::Member,
        engine::ActivityKind::Update => ApiKind::Update,
    }
}

/// Handle requests for the most recent activities
pub async fn recent(
    State(state): State<ServerState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityView>>, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let activities = state.engine.recent_activities(limit).await?;
    Ok(Json(
        activities
            .into_iter()
            .map(|activity| ActivityView {
                id: activity.id,
                kind: map_kind(activity.kind),
                title: activity.title,
                description: activity.description,
                timestamp: activity.timestamp,
            })
            .collect(),
    ))
}
