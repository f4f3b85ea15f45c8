//! Activity feed shown on the dashboard.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{ActivityKind, EngineError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Activity {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            kind: ActivityKind::try_from(model.kind.as_str())?,
            title: model.title,
            description: model.description,
            timestamp: model.timestamp,
        })
    }
}

impl From<&Activity> for ActiveModel {
    fn from(value: &Activity) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            title: ActiveValue::Set(value.title.clone()),
            description: ActiveValue::Set(value.description.clone()),
            timestamp: ActiveValue::Set(value.timestamp),
        }
    }
}
