//! Ledger entries: the unified income/expense book.
//!
//! Rows are either typed in by a person (`source = manual`) or mirrored from a
//! settled project income/expense (`source = project`).

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, LedgerKind, LedgerSource, LedgerStatus, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub unit_count: i32,
    pub price_per_unit: Money,
    /// Always `unit_count * price_per_unit`.
    pub amount: Money,
    pub note: String,
    pub kind: LedgerKind,
    pub category: String,
    pub status: LedgerStatus,
    pub project_id: Option<Uuid>,
    pub project_income_id: Option<Uuid>,
    pub project_expense_id: Option<Uuid>,
    pub source: LedgerSource,
}

impl LedgerEntry {
    pub fn is_project_mirror(&self) -> bool {
        self.source == LedgerSource::Project
    }
}

/// `unit_count * price_per_unit`, rejecting overflow.
pub(crate) fn line_total(unit_count: i32, price_per_unit: Money) -> ResultEngine<Money> {
    price_per_unit
        .checked_mul(i64::from(unit_count))
        .ok_or_else(|| EngineError::Validation("amount too large".to_string()))
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: Date,
    pub unit_count: i32,
    pub price_per_unit_minor: i64,
    pub amount_minor: i64,
    pub note: String,
    pub kind: String,
    pub category: String,
    pub status: String,
    pub project_id: Option<Uuid>,
    pub project_income_id: Option<Uuid>,
    pub project_expense_id: Option<Uuid>,
    pub source: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            date: model.date,
            unit_count: model.unit_count,
            price_per_unit: Money::new(model.price_per_unit_minor),
            amount: Money::new(model.amount_minor),
            note: model.note,
            kind: LedgerKind::try_from(model.kind.as_str())?,
            category: model.category,
            status: LedgerStatus::try_from(model.status.as_str())?,
            project_id: model.project_id,
            project_income_id: model.project_income_id,
            project_expense_id: model.project_expense_id,
            source: LedgerSource::try_from(model.source.as_str())?,
        })
    }
}

impl From<&LedgerEntry> for ActiveModel {
    fn from(value: &LedgerEntry) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            date: ActiveValue::Set(value.date),
            unit_count: ActiveValue::Set(value.unit_count),
            price_per_unit_minor: ActiveValue::Set(value.price_per_unit.minor()),
            amount_minor: ActiveValue::Set(value.amount.minor()),
            note: ActiveValue::Set(value.note.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            category: ActiveValue::Set(value.category.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            project_id: ActiveValue::Set(value.project_id),
            project_income_id: ActiveValue::Set(value.project_income_id),
            project_expense_id: ActiveValue::Set(value.project_expense_id),
            source: ActiveValue::Set(value.source.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_rejects_overflow() {
        assert!(line_total(2, Money::new(i64::MAX)).is_err());
    }
}
