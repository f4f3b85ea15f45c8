//! Back-office finance core: ledger, project incomes/expenses and the sync
//! between them, payroll and per-project financial summaries.

pub use activities::Activity;
pub use commands::{
    KasbonCmd, LedgerEntryCmd, MemberNew, ProjectNew, SalaryDetailCmd, SalaryNew, SalaryPatch,
};
pub use error::EngineError;
pub use kasbons::Kasbon;
pub use ledger::LedgerEntry;
pub use members::Member;
pub use money::Money;
pub use month::SalaryMonth;
pub use ops::{
    CategoryTotal, Engine, EngineBuilder, LedgerFilter, LedgerTotals, MonthlyComparison,
    ProjectFinancialSummary, SyncAction, SyncWarning, Synced,
};
pub use project_entry::{
    MirrorSide, ProjectEntry, ProjectEntryNew, ProjectEntryPatch, ProjectExpense,
    ProjectExpenseNew, ProjectExpensePatch, ProjectIncome, ProjectIncomeNew, ProjectIncomePatch,
};
pub use projects::Project;
pub use salaries::{Salary, SalaryFigures};
pub use salary_details::SalaryDetail;
pub use status::{
    ActivityKind, ExpenseStatus, IncomeStatus, LedgerCategory, LedgerKind, LedgerSource,
    LedgerStatus, Settlement,
};

mod activities;
mod commands;
mod error;
mod kasbons;
mod ledger;
mod members;
mod money;
mod month;
mod ops;
mod project_entry;
mod project_expenses;
mod project_incomes;
mod projects;
mod salaries;
mod salary_details;
mod status;

type ResultEngine<T> = Result<T, EngineError>;
