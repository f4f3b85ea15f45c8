//! Kasbon: cash advances deducted from a salary.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kasbon {
    pub id: Uuid,
    pub salary_id: Uuid,
    pub date: NaiveDate,
    pub amount: Money,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "kasbons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub salary_id: Uuid,
    pub date: Date,
    pub amount_minor: i64,
    pub note: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::salaries::Entity",
        from = "Column::SalaryId",
        to = "super::salaries::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Salary,
}

impl Related<super::salaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Salary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Kasbon {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            salary_id: model.salary_id,
            date: model.date,
            amount: Money::new(model.amount_minor),
            note: model.note,
        }
    }
}

impl From<&Kasbon> for ActiveModel {
    fn from(value: &Kasbon) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            salary_id: ActiveValue::Set(value.salary_id),
            date: ActiveValue::Set(value.date),
            amount_minor: ActiveValue::Set(value.amount.minor()),
            note: ActiveValue::Set(value.note.clone()),
        }
    }
}
