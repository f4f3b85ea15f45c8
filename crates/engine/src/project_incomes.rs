//! `project_incomes` table.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, IncomeStatus, Money, ProjectIncome};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "project_incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub date: Date,
    pub category: String,
    pub description: String,
    pub amount_minor: i64,
    pub status: String,
    pub finance_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Project,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ProjectIncome {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            project_id: model.project_id,
            date: model.date,
            category: model.category,
            description: model.description,
            amount: Money::new(model.amount_minor),
            status: IncomeStatus::try_from(model.status.as_str())?,
            finance_id: model.finance_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&ProjectIncome> for ActiveModel {
    fn from(value: &ProjectIncome) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            project_id: ActiveValue::Set(value.project_id),
            date: ActiveValue::Set(value.date),
            category: ActiveValue::Set(value.category.clone()),
            description: ActiveValue::Set(value.description.clone()),
            amount_minor: ActiveValue::Set(value.amount.minor()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            finance_id: ActiveValue::Set(value.finance_id),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}
