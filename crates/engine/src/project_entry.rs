//! Per-project income and expense records.
//!
//! Both sides share one shape and differ only in their status vocabulary, so
//! they are modelled as `ProjectEntry<S>` with [`ProjectIncome`] and
//! [`ProjectExpense`] aliases.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ExpenseStatus, IncomeStatus, LedgerKind, Money, Settlement};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry<S> {
    pub id: Uuid,
    pub project_id: Uuid,
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
    pub amount: Money,
    pub status: S,
    /// Ledger row mirroring this record while it is settled.
    pub finance_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type ProjectIncome = ProjectEntry<IncomeStatus>;
pub type ProjectExpense = ProjectEntry<ExpenseStatus>;

/// Ledger-facing traits of a project record status.
pub trait MirrorSide: Settlement {
    const LEDGER_KIND: LedgerKind;
    /// Prefix of the mirrored ledger note.
    const NOTE_LABEL: &'static str;
}

impl MirrorSide for IncomeStatus {
    const LEDGER_KIND: LedgerKind = LedgerKind::Income;
    const NOTE_LABEL: &'static str = "Project Income";
}

impl MirrorSide for ExpenseStatus {
    const LEDGER_KIND: LedgerKind = LedgerKind::Expense;
    const NOTE_LABEL: &'static str = "Project Expense";
}

impl<S: MirrorSide> ProjectEntry<S> {
    pub fn is_settled(&self) -> bool {
        self.status.is_settled()
    }

    /// Note written on the mirrored ledger row.
    pub fn mirror_note(&self) -> String {
        format!("{} - {}: {}", S::NOTE_LABEL, self.category, self.description)
    }
}

/// Recovers the description from a ledger note written by
/// [`ProjectEntry::mirror_note`]; other notes are returned as they are.
pub(crate) fn description_from_note<S: MirrorSide>(note: &str, category: &str) -> String {
    let prefix = format!("{} - {}: ", S::NOTE_LABEL, category);
    note.strip_prefix(&prefix).unwrap_or(note).to_string()
}

/// Input for creating a project income or expense.
#[derive(Clone, Debug)]
pub struct ProjectEntryNew<S> {
    pub project_id: Uuid,
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
    pub amount: Money,
    pub status: S,
}

impl<S> ProjectEntryNew<S> {
    #[must_use]
    pub fn new(
        project_id: Uuid,
        date: NaiveDate,
        category: impl Into<String>,
        amount: Money,
        status: S,
    ) -> Self {
        Self {
            project_id,
            date,
            category: category.into(),
            description: String::new(),
            amount,
            status,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial update of a project income or expense.
///
/// Absent or empty fields are left untouched; `amount` only applies when
/// positive.
#[derive(Clone, Debug)]
pub struct ProjectEntryPatch<S> {
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub status: Option<S>,
}

impl<S> Default for ProjectEntryPatch<S> {
    fn default() -> Self {
        Self {
            date: None,
            category: None,
            description: None,
            amount: None,
            status: None,
        }
    }
}

impl<S: Copy> ProjectEntryPatch<S> {
    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn status(mut self, status: S) -> Self {
        self.status = Some(status);
        self
    }

    pub(crate) fn apply_to(&self, entry: &mut ProjectEntry<S>) {
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(category) = self.category.as_deref().map(str::trim)
            && !category.is_empty()
        {
            entry.category = category.to_string();
        }
        if let Some(description) = self.description.as_deref()
            && !description.is_empty()
        {
            entry.description = description.to_string();
        }
        if let Some(amount) = self.amount
            && amount.is_positive()
        {
            entry.amount = amount;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
    }
}

pub type ProjectIncomeNew = ProjectEntryNew<IncomeStatus>;
pub type ProjectExpenseNew = ProjectEntryNew<ExpenseStatus>;
pub type ProjectIncomePatch = ProjectEntryPatch<IncomeStatus>;
pub type ProjectExpensePatch = ProjectEntryPatch<ExpenseStatus>;

#[cfg(test)]
mod tests {
    use super::*;

    fn income() -> ProjectIncome {
        let now = Utc::now();
        ProjectEntry {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            category: "Termin".to_string(),
            description: "Termin 1".to_string(),
            amount: Money::rupiah(60_000),
            status: IncomeStatus::Pending,
            finance_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn patch_ignores_empty_and_non_positive_fields() {
        let mut entry = income();
        ProjectIncomePatch::default()
            .category("  ")
            .description("")
            .amount(Money::ZERO)
            .apply_to(&mut entry);
        assert_eq!(entry.category, "Termin");
        assert_eq!(entry.description, "Termin 1");
        assert_eq!(entry.amount, Money::rupiah(60_000));
        assert_eq!(entry.status, IncomeStatus::Pending);
    }

    #[test]
    fn patch_applies_provided_fields() {
        let mut entry = income();
        ProjectIncomePatch::default()
            .amount(Money::rupiah(75_000))
            .status(IncomeStatus::Received)
            .apply_to(&mut entry);
        assert_eq!(entry.amount, Money::rupiah(75_000));
        assert!(entry.is_settled());
    }

    #[test]
    fn mirror_note_round_trips_description() {
        let entry = income();
        let note = entry.mirror_note();
        assert_eq!(note, "Project Income - Termin: Termin 1");
        assert_eq!(
            description_from_note::<IncomeStatus>(&note, "Termin"),
            "Termin 1"
        );
        assert_eq!(
            description_from_note::<IncomeStatus>("typed by hand", "Termin"),
            "typed by hand"
        );
    }
}
