use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    ActivityKind, EngineError, LedgerCategory, LedgerEntry, LedgerEntryCmd, LedgerKind,
    LedgerSource, LedgerStatus, Money, ResultEngine, ledger, ledger::line_total,
};

use super::{
    Engine, activity::record_activity, best_effort, normalize_required_text,
    sync::{self, SyncAction, Synced},
    with_tx,
};

/// Filters for listing ledger entries.
///
/// Date and amount bounds are inclusive.
#[derive(Clone, Debug, Default)]
pub struct LedgerFilter {
    pub kind: Option<LedgerKind>,
    pub category: Option<LedgerCategory>,
    pub status: Option<LedgerStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
    pub project_id: Option<Uuid>,
}

impl LedgerFilter {
    #[must_use]
    pub fn kind(mut self, kind: LedgerKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn category(mut self, category: LedgerCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn status(mut self, status: LedgerStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    #[must_use]
    pub fn amounts(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    #[must_use]
    pub fn project_id(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

fn validate_filter(filter: &LedgerFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::Validation(
            "invalid range: start date must not be after end date".to_string(),
        ));
    }
    if let (Some(min), Some(max)) = (filter.min_amount, filter.max_amount)
        && min > max
    {
        return Err(EngineError::Validation(
            "invalid range: minimum amount must not exceed maximum".to_string(),
        ));
    }
    Ok(())
}

trait ApplyLedgerFilters: QueryFilter + Sized {
    fn apply_ledger_filters(self, filter: &LedgerFilter) -> Self;
}

impl<T> ApplyLedgerFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_ledger_filters(mut self, filter: &LedgerFilter) -> Self {
        if let Some(kind) = filter.kind {
            self = self.filter(ledger::Column::Kind.eq(kind.as_str()));
        }
        if let Some(category) = filter.category {
            self = self.filter(ledger::Column::Category.eq(category.as_str()));
        }
        if let Some(status) = filter.status {
            self = self.filter(ledger::Column::Status.eq(status.as_str()));
        }
        if let Some(from) = filter.from {
            self = self.filter(ledger::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(ledger::Column::Date.lte(to));
        }
        if let Some(min) = filter.min_amount {
            self = self.filter(ledger::Column::AmountMinor.gte(min.minor()));
        }
        if let Some(max) = filter.max_amount {
            self = self.filter(ledger::Column::AmountMinor.lte(max.minor()));
        }
        if let Some(project_id) = filter.project_id {
            self = self.filter(ledger::Column::ProjectId.eq(project_id));
        }
        self
    }
}

/// Income and expense totals over the whole ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    pub income: Money,
    pub expense: Money,
}

impl LedgerTotals {
    pub fn balance(&self) -> Money {
        self.income - self.expense
    }

    fn record(&mut self, entry: &LedgerEntry) {
        match entry.kind {
            LedgerKind::Income => self.income += entry.amount,
            LedgerKind::Expense => self.expense += entry.amount,
        }
    }
}

/// Ledger totals of one calendar month (`"YYYY-MM"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyComparison {
    pub month: String,
    pub income: Money,
    pub expense: Money,
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn validate_cmd(cmd: &LedgerEntryCmd) -> ResultEngine<(Money, String)> {
    if cmd.unit_count <= 0 {
        return Err(EngineError::Validation(format!(
            "unit count must be positive, got {}",
            cmd.unit_count
        )));
    }
    if cmd.price_per_unit.is_negative() {
        return Err(EngineError::Validation(format!(
            "price per unit must not be negative, got {}",
            cmd.price_per_unit
        )));
    }
    let category = normalize_required_text(&cmd.category, "category")?;
    Ok((line_total(cmd.unit_count, cmd.price_per_unit)?, category))
}

fn activity_kind(kind: LedgerKind) -> ActivityKind {
    match kind {
        LedgerKind::Income => ActivityKind::Income,
        LedgerKind::Expense => ActivityKind::Expense,
    }
}

fn activity_text(entry: &LedgerEntry) -> String {
    format!("{} - {}", entry.note, entry.amount)
}

fn not_found(id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("ledger entry {id}"))
}

async fn require_entry(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<LedgerEntry> {
    let model = ledger::Entity::find_by_id(id)
        .one(db_tx)
        .await?
        .ok_or_else(|| not_found(id))?;
    LedgerEntry::try_from(model)
}

impl Engine {
    /// Records a manual ledger row.
    ///
    /// `amount` is always `unit_count * price_per_unit`.
    pub async fn create_ledger_entry(&self, cmd: LedgerEntryCmd) -> ResultEngine<LedgerEntry> {
        let (amount, category) = validate_cmd(&cmd)?;
        with_tx!(self, |db_tx| {
            let entry = LedgerEntry {
                id: Uuid::new_v4(),
                date: cmd.date,
                unit_count: cmd.unit_count,
                price_per_unit: cmd.price_per_unit,
                amount,
                note: cmd.note.trim().to_string(),
                kind: cmd.kind,
                category,
                status: cmd.status,
                project_id: cmd.project_id,
                project_income_id: None,
                project_expense_id: None,
                source: LedgerSource::Manual,
            };
            ledger::ActiveModel::from(&entry).insert(&db_tx).await?;
            record_activity(
                &db_tx,
                activity_kind(entry.kind),
                "New transaction",
                &activity_text(&entry),
            )
            .await;
            Ok(entry)
        })
    }

    /// Replaces the terms of a ledger row.
    ///
    /// Source and back-references are kept from the stored row. Edits to a
    /// project mirror are pushed back to the income/expense it mirrors.
    pub async fn update_ledger_entry(
        &self,
        id: Uuid,
        cmd: LedgerEntryCmd,
    ) -> ResultEngine<Synced<LedgerEntry>> {
        let (amount, category) = validate_cmd(&cmd)?;
        with_tx!(self, |db_tx| {
            let stored = require_entry(&db_tx, id).await?;
            if stored.is_project_mirror() && stored.kind != cmd.kind {
                return Err(EngineError::Validation(format!(
                    "ledger entry {id} mirrors a project {} and keeps its type",
                    stored.kind
                )));
            }

            let entry = LedgerEntry {
                date: cmd.date,
                unit_count: cmd.unit_count,
                price_per_unit: cmd.price_per_unit,
                amount,
                note: cmd.note.trim().to_string(),
                kind: cmd.kind,
                category,
                status: cmd.status,
                project_id: cmd.project_id.or(stored.project_id),
                ..stored
            };
            ledger::ActiveModel::from(&entry).update(&db_tx).await?;

            let mut warnings = Vec::new();
            if entry.is_project_mirror()
                && let Err(warning) = best_effort!(db_tx, SyncAction::PushLedgerEdit, |sp| {
                    sync::push_ledger_edit(&sp, &entry).await
                })
            {
                warnings.push(warning);
            }

            record_activity(
                &db_tx,
                activity_kind(entry.kind),
                "Transaction edited",
                &activity_text(&entry),
            )
            .await;
            Ok(Synced::new(entry, warnings))
        })
    }

    /// Deletes a ledger row.
    ///
    /// A deleted project mirror reverts its income/expense to unsettled.
    pub async fn delete_ledger_entry(&self, id: Uuid) -> ResultEngine<Synced<()>> {
        with_tx!(self, |db_tx| {
            let entry = require_entry(&db_tx, id).await?;

            let mut warnings = Vec::new();
            if entry.is_project_mirror()
                && let Err(warning) = best_effort!(db_tx, SyncAction::RevertSource, |sp| {
                    sync::revert_source(&sp, &entry).await
                })
            {
                warnings.push(warning);
            }

            ledger::Entity::delete_by_id(id).exec(&db_tx).await?;
            record_activity(
                &db_tx,
                activity_kind(entry.kind),
                "Transaction deleted",
                &activity_text(&entry),
            )
            .await;
            Ok(Synced::new((), warnings))
        })
    }

    pub async fn ledger_entry(&self, id: Uuid) -> ResultEngine<LedgerEntry> {
        with_tx!(self, |db_tx| require_entry(&db_tx, id).await)
    }

    /// Lists ledger rows matching `filter`, newest first.
    pub async fn list_ledger_entries(&self, filter: &LedgerFilter) -> ResultEngine<Vec<LedgerEntry>> {
        validate_filter(filter)?;
        with_tx!(self, |db_tx| {
            let models = ledger::Entity::find()
                .apply_ledger_filters(filter)
                .order_by_desc(ledger::Column::Date)
                .order_by_desc(ledger::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(LedgerEntry::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn ledger_totals(&self) -> ResultEngine<LedgerTotals> {
        let entries = self.list_ledger_entries(&LedgerFilter::default()).await?;
        let mut totals = LedgerTotals::default();
        for entry in &entries {
            totals.record(entry);
        }
        Ok(totals)
    }

    /// Income against expense per calendar month, oldest month first.
    pub async fn monthly_comparison(&self) -> ResultEngine<Vec<MonthlyComparison>> {
        let entries = self.list_ledger_entries(&LedgerFilter::default()).await?;
        let mut months: BTreeMap<String, LedgerTotals> = BTreeMap::new();
        for entry in &entries {
            months.entry(month_key(entry.date)).or_default().record(entry);
        }
        Ok(months
            .into_iter()
            .map(|(month, totals)| MonthlyComparison {
                month,
                income: totals.income,
                expense: totals.expense,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(month_key(date), "2025-03");
    }

    #[test]
    fn cmd_validation() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let ok = LedgerEntryCmd::new(date, LedgerKind::Expense, "Barang", 4, Money::rupiah(2_500));
        let (amount, category) = validate_cmd(&ok).unwrap();
        assert_eq!(amount, Money::rupiah(10_000));
        assert_eq!(category, "Barang");

        let zero_units = LedgerEntryCmd::new(date, LedgerKind::Expense, "Barang", 0, Money::rupiah(1));
        assert!(matches!(validate_cmd(&zero_units), Err(EngineError::Validation(_))));

        let negative = LedgerEntryCmd::new(date, LedgerKind::Income, "Jasa", 1, Money::rupiah(-1));
        assert!(matches!(validate_cmd(&negative), Err(EngineError::Validation(_))));

        let blank = LedgerEntryCmd::new(date, LedgerKind::Income, " ", 1, Money::rupiah(1));
        assert!(matches!(validate_cmd(&blank), Err(EngineError::Validation(_))));
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let filter = LedgerFilter::default().dates(
            NaiveDate::from_ymd_opt(2025, 2, 1),
            NaiveDate::from_ymd_opt(2025, 1, 1),
        );
        assert!(validate_filter(&filter).is_err());

        let filter = LedgerFilter::default().amounts(Some(Money::rupiah(10)), Some(Money::rupiah(5)));
        assert!(validate_filter(&filter).is_err());
    }
}
