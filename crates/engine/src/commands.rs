//! Command structs for engine operations.
//!
//! These types group parameters for write operations (ledger rows, projects,
//! members, salaries and their child rows), keeping call sites readable and
//! avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{LedgerKind, LedgerStatus, Money, SalaryMonth};

/// Create or replace a manual ledger row.
///
/// The stored amount is always `unit_count * price_per_unit`.
#[derive(Clone, Debug)]
pub struct LedgerEntryCmd {
    pub date: NaiveDate,
    pub unit_count: i32,
    pub price_per_unit: Money,
    pub note: String,
    pub kind: LedgerKind,
    pub category: String,
    pub status: LedgerStatus,
    pub project_id: Option<Uuid>,
}

impl LedgerEntryCmd {
    #[must_use]
    pub fn new(
        date: NaiveDate,
        kind: LedgerKind,
        category: impl Into<String>,
        unit_count: i32,
        price_per_unit: Money,
    ) -> Self {
        Self {
            date,
            unit_count,
            price_per_unit,
            note: String::new(),
            kind,
            category: category.into(),
            status: LedgerStatus::Paid,
            project_id: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    #[must_use]
    pub fn status(mut self, status: LedgerStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn project_id(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

/// Create a project.
#[derive(Clone, Debug)]
pub struct ProjectNew {
    pub name: String,
    pub description: String,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_revenue: Money,
    pub amount_paid: Money,
    pub unit_price: Money,
    pub total_volume: f64,
    pub unit: String,
}

impl ProjectNew {
    #[must_use]
    pub fn new(name: impl Into<String>, total_revenue: Money) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            status: "Active".to_string(),
            start_date: None,
            end_date: None,
            total_revenue,
            amount_paid: Money::ZERO,
            unit_price: Money::ZERO,
            total_volume: 0.0,
            unit: String::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub fn dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    #[must_use]
    pub fn amount_paid(mut self, amount_paid: Money) -> Self {
        self.amount_paid = amount_paid;
        self
    }

    #[must_use]
    pub fn volume(mut self, unit_price: Money, total_volume: f64, unit: impl Into<String>) -> Self {
        self.unit_price = unit_price;
        self.total_volume = total_volume;
        self.unit = unit.into();
        self
    }
}

/// Register a crew member.
#[derive(Clone, Debug)]
pub struct MemberNew {
    pub full_name: String,
    pub role: String,
    pub active: bool,
}

impl MemberNew {
    #[must_use]
    pub fn new(full_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            role: role.into(),
            active: true,
        }
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Open a salary record for a pay period.
#[derive(Clone, Debug)]
pub struct SalaryNew {
    pub month: SalaryMonth,
    pub status: Option<String>,
    pub documents: Vec<String>,
}

impl SalaryNew {
    #[must_use]
    pub fn new(month: SalaryMonth) -> Self {
        Self {
            month,
            status: None,
            documents: Vec::new(),
        }
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn documents(mut self, documents: Vec<String>) -> Self {
        self.documents = documents;
        self
    }
}

/// Edit the authored fields of a salary. Payroll figures are not part of it.
#[derive(Clone, Debug, Default)]
pub struct SalaryPatch {
    pub month: Option<SalaryMonth>,
    pub status: Option<String>,
    pub documents: Option<Vec<String>>,
}

impl SalaryPatch {
    #[must_use]
    pub fn month(mut self, month: SalaryMonth) -> Self {
        self.month = Some(month);
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn documents(mut self, documents: Vec<String>) -> Self {
        self.documents = Some(documents);
        self
    }
}

/// Create or replace an hourly salary line.
#[derive(Clone, Debug)]
pub struct SalaryDetailCmd {
    pub salary_id: Uuid,
    pub date: NaiveDate,
    pub hours: i32,
    pub rate_per_hour: Money,
    pub note: String,
}

impl SalaryDetailCmd {
    #[must_use]
    pub fn new(salary_id: Uuid, date: NaiveDate, hours: i32, rate_per_hour: Money) -> Self {
        Self {
            salary_id,
            date,
            hours,
            rate_per_hour,
            note: String::new(),
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Create or replace a kasbon.
#[derive(Clone, Debug)]
pub struct KasbonCmd {
    pub salary_id: Uuid,
    pub date: NaiveDate,
    pub amount: Money,
    pub note: String,
}

impl KasbonCmd {
    #[must_use]
    pub fn new(salary_id: Uuid, date: NaiveDate, amount: Money) -> Self {
        Self {
            salary_id,
            date,
            amount,
            note: String::new(),
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}
