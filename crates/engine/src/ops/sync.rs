//! Ledger mirroring of settled project incomes and expenses.
//!
//! A settled record (income `Received`, expense `Paid`) owns exactly one
//! `source = project` ledger row, referenced by its `finance_id`. The helpers
//! here only touch rows; callers run them through `best_effort!` so a failed
//! mirror never fails the write that triggered it.

use std::fmt;

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, LedgerEntry, LedgerKind, LedgerSource, LedgerStatus, MirrorSide, ProjectEntry,
    ProjectExpense, ProjectIncome, ResultEngine, ledger, project_entry::description_from_note,
    project_expenses, project_incomes,
};

/// Ledger side effect that was attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    CreateMirror,
    RefreshMirror,
    RemoveMirror,
    /// Ledger edit pushed back to the project record.
    PushLedgerEdit,
    /// Project record reverted after its ledger row was deleted.
    RevertSource,
}

impl SyncAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateMirror => "create_mirror",
            Self::RefreshMirror => "refresh_mirror",
            Self::RemoveMirror => "remove_mirror",
            Self::PushLedgerEdit => "push_ledger_edit",
            Self::RevertSource => "revert_source",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ledger side effect that failed and was rolled back on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncWarning {
    pub action: SyncAction,
    pub message: String,
}

impl SyncWarning {
    pub(crate) fn new(action: SyncAction, err: &EngineError) -> Self {
        Self {
            action,
            message: err.to_string(),
        }
    }
}

/// Result of a write that may have left the ledger out of step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Synced<T> {
    pub value: T,
    pub warnings: Vec<SyncWarning>,
}

impl<T> Synced<T> {
    pub(crate) fn new(value: T, warnings: Vec<SyncWarning>) -> Self {
        Self { value, warnings }
    }

    /// True when every ledger side effect went through.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// What an update means for the ledger mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MirrorChange {
    Keep,
    Create,
    Refresh(Uuid),
    Remove(Uuid),
}

/// Decides the mirror work from the pre-update snapshot and the updated record.
///
/// The link always comes from `before`. A settled record without a link (an
/// earlier mirror attempt failed) gets a fresh mirror instead of a refresh.
pub(crate) fn mirror_change<S: MirrorSide>(
    before: &ProjectEntry<S>,
    after: &ProjectEntry<S>,
) -> MirrorChange {
    match (after.is_settled(), before.finance_id) {
        (true, Some(finance_id)) => MirrorChange::Refresh(finance_id),
        (true, None) => MirrorChange::Create,
        (false, Some(finance_id)) => MirrorChange::Remove(finance_id),
        (false, None) => MirrorChange::Keep,
    }
}

/// Ledger row mirroring `record`.
pub(crate) fn mirror_entry<S: MirrorSide>(record: &ProjectEntry<S>, id: Uuid) -> LedgerEntry {
    let (project_income_id, project_expense_id) = match S::LEDGER_KIND {
        LedgerKind::Income => (Some(record.id), None),
        LedgerKind::Expense => (None, Some(record.id)),
    };
    LedgerEntry {
        id,
        date: record.date,
        unit_count: 1,
        price_per_unit: record.amount,
        amount: record.amount,
        note: record.mirror_note(),
        kind: S::LEDGER_KIND,
        category: record.category.clone(),
        status: LedgerStatus::Paid,
        project_id: Some(record.project_id),
        project_income_id,
        project_expense_id,
        source: LedgerSource::Project,
    }
}

pub(crate) async fn create_mirror<S: MirrorSide>(
    db_tx: &DatabaseTransaction,
    record: &ProjectEntry<S>,
) -> ResultEngine<Uuid> {
    let entry = mirror_entry(record, Uuid::new_v4());
    ledger::ActiveModel::from(&entry).insert(db_tx).await?;
    Ok(entry.id)
}

/// Overwrites the mirrored row in place with the record's current terms.
pub(crate) async fn refresh_mirror<S: MirrorSide>(
    db_tx: &DatabaseTransaction,
    finance_id: Uuid,
    record: &ProjectEntry<S>,
) -> ResultEngine<()> {
    let model = ledger::Entity::find_by_id(finance_id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("ledger entry {finance_id}")))?;
    let mut entry = LedgerEntry::try_from(model)?;
    entry.date = record.date;
    entry.unit_count = 1;
    entry.price_per_unit = record.amount;
    entry.amount = record.amount;
    entry.note = record.mirror_note();
    entry.category = record.category.clone();
    ledger::ActiveModel::from(&entry).update(db_tx).await?;
    Ok(())
}

pub(crate) async fn remove_mirror(db_tx: &DatabaseTransaction, finance_id: Uuid) -> ResultEngine<()> {
    ledger::Entity::delete_by_id(finance_id).exec(db_tx).await?;
    Ok(())
}

/// Copies a ledger edit onto the record it mirrors. The record stays settled.
///
/// A non-positive amount or a blank description leaves the record's value.
fn apply_ledger_edit<S: MirrorSide>(record: &mut ProjectEntry<S>, entry: &LedgerEntry) {
    record.date = entry.date;
    if entry.amount.is_positive() {
        record.amount = entry.amount;
    }
    let description = description_from_note::<S>(&entry.note, &record.category);
    if !description.trim().is_empty() {
        record.description = description;
    }
    record.category = entry.category.clone();
    record.status = S::SETTLED;
    record.updated_at = Utc::now();
}

/// Falls a record back to unsettled once its ledger row is gone.
fn apply_ledger_removal<S: MirrorSide>(record: &mut ProjectEntry<S>) {
    record.status = S::REVERTED;
    record.finance_id = None;
    record.updated_at = Utc::now();
}

fn ensure_linked<S>(record: &ProjectEntry<S>, entry: &LedgerEntry) -> ResultEngine<()> {
    if record.finance_id == Some(entry.id) {
        return Ok(());
    }
    Err(EngineError::Validation(format!(
        "ledger entry {} is no longer linked to project record {}",
        entry.id, record.id
    )))
}

/// Loads the linked record of one side, applies `$apply` and writes it back.
macro_rules! update_linked {
    ($db_tx:expr, $module:ident, $record_ty:ty, $id:expr, $entry:expr, |$record:ident| $apply:expr) => {{
        let id: Uuid = $id;
        let model = $module::Entity::find_by_id(id)
            .one($db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("project record {id}")))?;
        let mut $record = <$record_ty>::try_from(model)?;
        ensure_linked(&$record, $entry)?;
        $apply;
        $module::ActiveModel::from(&$record).update($db_tx).await?;
    }};
}

/// Pushes an edited `source = project` ledger row back to its record.
///
/// Writes the record row directly so the forward sync does not run again.
pub(crate) async fn push_ledger_edit(
    db_tx: &DatabaseTransaction,
    entry: &LedgerEntry,
) -> ResultEngine<()> {
    if let Some(income_id) = entry.project_income_id {
        update_linked!(db_tx, project_incomes, ProjectIncome, income_id, entry, |record| {
            apply_ledger_edit(&mut record, entry)
        });
    } else if let Some(expense_id) = entry.project_expense_id {
        update_linked!(db_tx, project_expenses, ProjectExpense, expense_id, entry, |record| {
            apply_ledger_edit(&mut record, entry)
        });
    }
    Ok(())
}

/// Reverts the record mirrored by a ledger row that is about to be deleted.
pub(crate) async fn revert_source(
    db_tx: &DatabaseTransaction,
    entry: &LedgerEntry,
) -> ResultEngine<()> {
    if let Some(income_id) = entry.project_income_id {
        update_linked!(db_tx, project_incomes, ProjectIncome, income_id, entry, |record| {
            apply_ledger_removal(&mut record)
        });
    } else if let Some(expense_id) = entry.project_expense_id {
        update_linked!(db_tx, project_expenses, ProjectExpense, expense_id, entry, |record| {
            apply_ledger_removal(&mut record)
        });
    }
    Ok(())
}

/// Active models carrying a `finance_id` column.
pub(crate) trait FinanceLink {
    fn link(id: Uuid, finance_id: Option<Uuid>) -> Self;
}

impl FinanceLink for project_incomes::ActiveModel {
    fn link(id: Uuid, finance_id: Option<Uuid>) -> Self {
        Self {
            id: ActiveValue::Set(id),
            finance_id: ActiveValue::Set(finance_id),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
    }
}

impl FinanceLink for project_expenses::ActiveModel {
    fn link(id: Uuid, finance_id: Option<Uuid>) -> Self {
        Self {
            id: ActiveValue::Set(id),
            finance_id: ActiveValue::Set(finance_id),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{ExpenseStatus, IncomeStatus, Money};

    fn income(status: IncomeStatus, finance_id: Option<Uuid>) -> ProjectIncome {
        let now = Utc::now();
        ProjectEntry {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            category: "Termin".to_string(),
            description: "DP".to_string(),
            amount: Money::rupiah(60_000),
            status,
            finance_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn change_from_snapshot_link_and_new_status() {
        let finance_id = Uuid::new_v4();
        let pending = income(IncomeStatus::Pending, None);
        let received = income(IncomeStatus::Received, Some(finance_id));

        let mut settled = pending.clone();
        settled.status = IncomeStatus::Received;
        assert_eq!(mirror_change(&pending, &settled), MirrorChange::Create);

        let mut reverted = received.clone();
        reverted.status = IncomeStatus::Pending;
        assert_eq!(mirror_change(&received, &reverted), MirrorChange::Remove(finance_id));

        let mut edited = received.clone();
        edited.amount = Money::rupiah(70_000);
        assert_eq!(mirror_change(&received, &edited), MirrorChange::Refresh(finance_id));

        let mut planned = pending.clone();
        planned.status = IncomeStatus::Planned;
        assert_eq!(mirror_change(&pending, &planned), MirrorChange::Keep);
    }

    #[test]
    fn settled_without_link_gets_a_new_mirror() {
        let unlinked = income(IncomeStatus::Received, None);
        assert_eq!(mirror_change(&unlinked, &unlinked), MirrorChange::Create);
    }

    #[test]
    fn mirror_entry_for_expense_points_back() {
        let now = Utc::now();
        let expense: ProjectExpense = ProjectEntry {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            category: "Solar".to_string(),
            description: "Excavator".to_string(),
            amount: Money::rupiah(30_000),
            status: ExpenseStatus::Paid,
            finance_id: None,
            created_at: now,
            updated_at: now,
        };
        let entry = mirror_entry(&expense, Uuid::nil());
        assert_eq!(entry.kind, LedgerKind::Expense);
        assert_eq!(entry.project_expense_id, Some(expense.id));
        assert_eq!(entry.project_income_id, None);
        assert_eq!(entry.amount, entry.price_per_unit);
        assert_eq!(entry.unit_count, 1);
        assert_eq!(entry.note, "Project Expense - Solar: Excavator");
        assert!(entry.is_project_mirror());
    }

    #[test]
    fn ledger_edit_keeps_record_settled() {
        let finance_id = Uuid::new_v4();
        let mut record = income(IncomeStatus::Received, Some(finance_id));
        let mut entry = mirror_entry(&record, finance_id);
        entry.amount = Money::rupiah(65_000);
        entry.note = "Project Income - Termin: DP revised".to_string();
        entry.category = "Pelunasan".to_string();

        apply_ledger_edit(&mut record, &entry);
        assert_eq!(record.amount, Money::rupiah(65_000));
        assert_eq!(record.description, "DP revised");
        assert_eq!(record.category, "Pelunasan");
        assert_eq!(record.status, IncomeStatus::Received);
    }

    #[test]
    fn removal_reverts_and_unlinks() {
        let mut record = income(IncomeStatus::Received, Some(Uuid::new_v4()));
        apply_ledger_removal(&mut record);
        assert_eq!(record.status, IncomeStatus::Pending);
        assert_eq!(record.finance_id, None);
    }
}
