//! Hourly detail lines of a salary record.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryDetail {
    pub id: Uuid,
    pub salary_id: Uuid,
    pub date: NaiveDate,
    pub hours: i32,
    pub rate_per_hour: Money,
    pub note: String,
}

impl SalaryDetail {
    /// `hours * rate_per_hour`.
    pub fn line_total(&self) -> ResultEngine<Money> {
        self.rate_per_hour
            .checked_mul(i64::from(self.hours))
            .ok_or_else(|| EngineError::Validation("salary detail total too large".to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "salary_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub salary_id: Uuid,
    pub date: Date,
    pub hours: i32,
    pub rate_per_hour_minor: i64,
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

impl From<Model> for SalaryDetail {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            salary_id: model.salary_id,
            date: model.date,
            hours: model.hours,
            rate_per_hour: Money::new(model.rate_per_hour_minor),
            note: model.note,
        }
    }
}

impl From<&SalaryDetail> for ActiveModel {
    fn from(value: &SalaryDetail) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            salary_id: ActiveValue::Set(value.salary_id),
            date: ActiveValue::Set(value.date),
            hours: ActiveValue::Set(value.hours),
            rate_per_hour_minor: ActiveValue::Set(value.rate_per_hour.minor()),
            note: ActiveValue::Set(value.note.clone()),
        }
    }
}
