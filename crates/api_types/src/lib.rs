use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A ledger sync step that failed while the primary write was kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncWarning {
    /// Which sync step failed, e.g. `create_mirror` or `revert_source`.
    pub action: String,
    pub message: String,
}

/// Envelope of mutations that may touch the ledger as a side effect.
///
/// `warnings` is empty when every sync step succeeded.
#[derive(Debug, Serialize, Deserialize)]
pub struct WithWarnings<T> {
    pub data: T,
    pub warnings: Vec<SyncWarning>,
}

pub mod ledger {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LedgerKind {
        Income,
        Expense,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum LedgerStatus {
        Paid,
        Unpaid,
    }

    /// Who wrote a ledger row.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LedgerSource {
        Manual,
        Project,
    }

    /// Request body for creating or replacing a ledger entry.
    ///
    /// The amount is always `unit_count * price_per_unit_minor`, computed by
    /// the server.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerEntryNew {
        pub date: NaiveDate,
        pub unit_count: i32,
        pub price_per_unit_minor: i64,
        pub note: Option<String>,
        pub kind: LedgerKind,
        /// One of `Barang`, `Jasa`, `Sewa Alat Berat`, `Gaji`, `Uang Makan`,
        /// `Kasbon`, `Other`, or a project category.
        pub category: String,
        /// Defaults to `Paid`.
        pub status: Option<LedgerStatus>,
        pub project_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerEntryView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub unit_count: i32,
        pub price_per_unit_minor: i64,
        pub amount_minor: i64,
        pub note: String,
        pub kind: LedgerKind,
        pub category: String,
        pub status: LedgerStatus,
        pub project_id: Option<Uuid>,
        pub project_income_id: Option<Uuid>,
        pub project_expense_id: Option<Uuid>,
        pub source: LedgerSource,
    }

    /// Query string of `GET /ledger`. Every field narrows the result.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerQuery {
        pub kind: Option<LedgerKind>,
        pub category: Option<String>,
        pub status: Option<LedgerStatus>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub min_amount_minor: Option<i64>,
        pub max_amount_minor: Option<i64>,
        pub project_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerTotals {
        pub income_minor: i64,
        pub expense_minor: i64,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyComparison {
        /// `YYYY-MM`.
        pub month: String,
        pub income_minor: i64,
        pub expense_minor: i64,
    }
}

pub mod project {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum IncomeStatus {
        Received,
        Pending,
        Planned,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum ExpenseStatus {
        Paid,
        Unpaid,
        Pending,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        pub name: String,
        pub description: Option<String>,
        pub status: Option<String>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub total_revenue_minor: i64,
        pub amount_paid_minor: Option<i64>,
        pub unit_price_minor: Option<i64>,
        pub total_volume: Option<f64>,
        pub unit: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectView {
        pub id: Uuid,
        pub name: String,
        pub description: String,
        pub status: String,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub total_revenue_minor: i64,
        pub amount_paid_minor: i64,
        pub unit_price_minor: i64,
        pub total_volume: f64,
        pub unit: String,
    }

    /// Request body for creating a project income or expense.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryNew<S> {
        pub date: NaiveDate,
        pub category: String,
        pub description: Option<String>,
        pub amount_minor: i64,
        pub status: S,
    }

    /// Partial update of a project income or expense.
    ///
    /// Absent or empty fields are left untouched; `amount_minor` only applies
    /// when positive.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryUpdate<S> {
        pub date: Option<NaiveDate>,
        pub category: Option<String>,
        pub description: Option<String>,
        pub amount_minor: Option<i64>,
        pub status: Option<S>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryView<S> {
        pub id: Uuid,
        pub project_id: Uuid,
        pub date: NaiveDate,
        pub category: String,
        pub description: String,
        pub amount_minor: i64,
        pub status: S,
        /// Ledger row mirroring this record, if any.
        pub finance_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    pub type IncomeNew = EntryNew<IncomeStatus>;
    pub type IncomeUpdate = EntryUpdate<IncomeStatus>;
    pub type IncomeView = EntryView<IncomeStatus>;
    pub type ExpenseNew = EntryNew<ExpenseStatus>;
    pub type ExpenseUpdate = EntryUpdate<ExpenseStatus>;
    pub type ExpenseView = EntryView<ExpenseStatus>;
}

pub mod summary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: String,
        pub total_minor: i64,
        pub count: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectSummary {
        pub project_id: Uuid,
        pub project_name: String,
        pub total_revenue_minor: i64,
        pub total_income_minor: i64,
        pub income_received_minor: i64,
        pub income_pending_minor: i64,
        pub total_expenses_minor: i64,
        pub expenses_paid_minor: i64,
        pub expenses_unpaid_minor: i64,
        pub actual_profit_minor: i64,
        pub estimated_profit_minor: i64,
        /// Estimated profit as a percent of total revenue.
        pub profit_margin: f64,
        /// Percent of total revenue received.
        pub progress_percent: f64,
        pub income_by_category: Vec<CategoryTotal>,
        pub expenses_by_category: Vec<CategoryTotal>,
    }
}

pub mod payroll {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberNew {
        pub full_name: String,
        pub role: Option<String>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub id: Uuid,
        pub full_name: String,
        pub role: String,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalaryNew {
        /// `"January 2025"` or `"Januari 2025"`.
        pub month: String,
        pub status: Option<String>,
        pub documents: Option<Vec<String>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SalaryUpdate {
        pub month: Option<String>,
        pub status: Option<String>,
        pub documents: Option<Vec<String>>,
    }

    /// Stored salary. The figures are derived by the server and read only.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalaryView {
        pub id: Uuid,
        pub member_id: Uuid,
        pub month: String,
        pub status: String,
        pub documents: Vec<String>,
        pub gross_salary_minor: i64,
        pub loan_minor: i64,
        pub net_salary_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalaryFigures {
        pub gross_salary_minor: i64,
        pub loan_minor: i64,
        pub net_salary_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalaryDetailNew {
        pub salary_id: Uuid,
        pub date: NaiveDate,
        pub hours: i32,
        pub rate_per_hour_minor: i64,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalaryDetailView {
        pub id: Uuid,
        pub salary_id: Uuid,
        pub date: NaiveDate,
        pub hours: i32,
        pub rate_per_hour_minor: i64,
        pub note: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct KasbonNew {
        pub salary_id: Uuid,
        pub date: NaiveDate,
        pub amount_minor: i64,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct KasbonView {
        pub id: Uuid,
        pub salary_id: Uuid,
        pub date: NaiveDate,
        pub amount_minor: i64,
        pub note: String,
    }
}

pub mod activity {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ActivityKind {
        Income,
        Expense,
        Member,
        Update,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ActivityQuery {
        /// Defaults to 20.
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ActivityView {
        pub id: Uuid,
        pub kind: ActivityKind,
        pub title: String,
        pub description: String,
        pub timestamp: DateTime<Utc>,
    }
}
