//! Crew members: the owners of salary records.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub full_name: String,
    pub role: String,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    pub role: String,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::salaries::Entity")]
    Salaries,
}

impl Related<super::salaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salaries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Member {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            role: model.role,
            active: model.active,
        }
    }
}

impl From<&Member> for ActiveModel {
    fn from(value: &Member) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            full_name: ActiveValue::Set(value.full_name.clone()),
            role: ActiveValue::Set(value.role.clone()),
            active: ActiveValue::Set(value.active),
        }
    }
}
