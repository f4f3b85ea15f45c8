//! Salary records and their derived payroll figures.
//!
//! `gross_salary`, `loan` and `net_salary` are never written from input: the
//! only path that changes them is the payroll recalculation run after every
//! detail line or kasbon mutation.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, Kasbon, Money, ResultEngine, SalaryDetail, SalaryMonth};

pub const DEFAULT_STATUS: &str = "Pending";

/// Payroll figures derived from a salary's detail lines and kasbons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SalaryFigures {
    pub gross_salary: Money,
    pub loan: Money,
    /// `gross_salary - loan`, possibly negative.
    pub net_salary: Money,
}

impl SalaryFigures {
    /// Sums detail lines into gross and kasbons into loan.
    pub fn compute(details: &[SalaryDetail], kasbons: &[Kasbon]) -> ResultEngine<Self> {
        let overflow = || EngineError::Recalculation("salary figures overflow".to_string());

        let mut gross_salary = Money::ZERO;
        for detail in details {
            gross_salary = gross_salary
                .checked_add(detail.line_total()?)
                .ok_or_else(overflow)?;
        }
        let mut loan = Money::ZERO;
        for kasbon in kasbons {
            loan = loan.checked_add(kasbon.amount).ok_or_else(overflow)?;
        }
        let net_salary = gross_salary.checked_sub(loan).ok_or_else(overflow)?;

        Ok(Self {
            gross_salary,
            loan,
            net_salary,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Salary {
    pub id: Uuid,
    pub member_id: Uuid,
    pub month: SalaryMonth,
    pub status: String,
    pub documents: Vec<String>,
    #[serde(flatten)]
    figures: SalaryFigures,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Salary {
    pub(crate) fn new(member_id: Uuid, month: SalaryMonth, status: String, documents: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            member_id,
            month,
            status,
            documents,
            figures: SalaryFigures::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn figures(&self) -> SalaryFigures {
        self.figures
    }

    pub fn gross_salary(&self) -> Money {
        self.figures.gross_salary
    }

    pub fn loan(&self) -> Money {
        self.figures.loan
    }

    pub fn net_salary(&self) -> Money {
        self.figures.net_salary
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "salaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub member_id: Uuid,
    pub month: String,
    /// Mirrors `gross_salary_minor`.
    pub salary_minor: i64,
    pub gross_salary_minor: i64,
    pub loan_minor: i64,
    pub net_salary_minor: i64,
    pub status: String,
    pub documents: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::MemberId",
        to = "super::members::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Member,
    #[sea_orm(has_many = "super::salary_details::Entity")]
    Details,
    #[sea_orm(has_many = "super::kasbons::Entity")]
    Kasbons,
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::salary_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl Related<super::kasbons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kasbons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Salary {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let documents: Vec<String> = serde_json::from_value(model.documents)
            .map_err(|err| EngineError::Validation(format!("salary documents: {err}")))?;
        Ok(Self {
            id: model.id,
            member_id: model.member_id,
            month: model.month.parse()?,
            status: model.status,
            documents,
            figures: SalaryFigures {
                gross_salary: Money::new(model.gross_salary_minor),
                loan: Money::new(model.loan_minor),
                net_salary: Money::new(model.net_salary_minor),
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Salary> for ActiveModel {
    fn from(value: &Salary) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            member_id: ActiveValue::Set(value.member_id),
            month: ActiveValue::Set(value.month.to_string()),
            salary_minor: ActiveValue::Set(value.figures.gross_salary.minor()),
            gross_salary_minor: ActiveValue::Set(value.figures.gross_salary.minor()),
            loan_minor: ActiveValue::Set(value.figures.loan.minor()),
            net_salary_minor: ActiveValue::Set(value.figures.net_salary.minor()),
            status: ActiveValue::Set(value.status.clone()),
            documents: ActiveValue::Set(serde_json::Value::from(value.documents.clone())),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

/// Writes `figures` onto the stored salary row, leaving every authored field
/// alone.
pub(crate) fn figures_update(id: Uuid, figures: SalaryFigures) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Unchanged(id),
        salary_minor: ActiveValue::Set(figures.gross_salary.minor()),
        gross_salary_minor: ActiveValue::Set(figures.gross_salary.minor()),
        loan_minor: ActiveValue::Set(figures.loan.minor()),
        net_salary_minor: ActiveValue::Set(figures.net_salary.minor()),
        updated_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn detail(hours: i32, rate: i64) -> SalaryDetail {
        SalaryDetail {
            id: Uuid::new_v4(),
            salary_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            hours,
            rate_per_hour: Money::rupiah(rate),
            note: String::new(),
        }
    }

    fn kasbon(amount: i64) -> Kasbon {
        Kasbon {
            id: Uuid::new_v4(),
            salary_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            amount: Money::rupiah(amount),
            note: String::new(),
        }
    }

    #[test]
    fn empty_salary_is_all_zero() {
        assert_eq!(SalaryFigures::compute(&[], &[]).unwrap(), SalaryFigures::default());
    }

    #[test]
    fn figures_from_details_and_kasbons() {
        let figures = SalaryFigures::compute(
            &[detail(8, 50_000), detail(4, 50_000)],
            &[kasbon(100_000)],
        )
        .unwrap();
        assert_eq!(figures.gross_salary, Money::rupiah(600_000));
        assert_eq!(figures.loan, Money::rupiah(100_000));
        assert_eq!(figures.net_salary, Money::rupiah(500_000));
    }

    #[test]
    fn net_is_not_clamped() {
        let figures = SalaryFigures::compute(&[detail(1, 10_000)], &[kasbon(25_000)]).unwrap();
        assert_eq!(figures.net_salary, Money::rupiah(-15_000));
    }
}
