//! Construction/rental projects.
//!
//! The finance core only reads projects: `total_revenue` is the contracted
//! amount used as denominator for margin and progress.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_revenue: Money,
    pub amount_paid: Money,
    pub unit_price: Money,
    /// Measured quantity (m³, hours), not money.
    pub total_volume: f64,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub total_revenue_minor: i64,
    pub amount_paid_minor: i64,
    pub unit_price_minor: i64,
    pub total_volume: f64,
    pub unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_incomes::Entity")]
    Incomes,
    #[sea_orm(has_many = "super::project_expenses::Entity")]
    Expenses,
}

impl Related<super::project_incomes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incomes.def()
    }
}

impl Related<super::project_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Project {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            status: model.status,
            start_date: model.start_date,
            end_date: model.end_date,
            total_revenue: Money::new(model.total_revenue_minor),
            amount_paid: Money::new(model.amount_paid_minor),
            unit_price: Money::new(model.unit_price_minor),
            total_volume: model.total_volume,
            unit: model.unit,
        }
    }
}

impl From<&Project> for ActiveModel {
    fn from(value: &Project) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            status: ActiveValue::Set(value.status.clone()),
            start_date: ActiveValue::Set(value.start_date),
            end_date: ActiveValue::Set(value.end_date),
            total_revenue_minor: ActiveValue::Set(value.total_revenue.minor()),
            amount_paid_minor: ActiveValue::Set(value.amount_paid.minor()),
            unit_price_minor: ActiveValue::Set(value.unit_price.minor()),
            total_volume: ActiveValue::Set(value.total_volume),
            unit: ActiveValue::Set(value.unit.clone()),
        }
    }
}

pub(crate) fn not_found(project_id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("project {project_id}"))
}
