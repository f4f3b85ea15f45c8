//! Per-project financial summary.
//!
//! Aggregates the project's own incomes and expenses, never the ledger, which
//! may lag behind them.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Money, MirrorSide, Project, ProjectEntry, ProjectExpense, ProjectIncome, ResultEngine,
    project_expenses, project_incomes, projects,
};

use super::{Engine, with_tx};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectFinancialSummary {
    pub project_id: Uuid,
    pub project_name: String,
    pub total_revenue: Money,
    pub total_income: Money,
    pub income_received: Money,
    pub income_pending: Money,
    pub total_expenses: Money,
    pub expenses_paid: Money,
    pub expenses_unpaid: Money,
    /// Settled money only: received income minus paid expenses.
    pub actual_profit: Money,
    /// Every booked record, settled or not.
    pub estimated_profit: Money,
    pub profit_margin: f64,
    pub progress_percent: f64,
    pub income_by_category: Vec<CategoryTotal>,
    pub expenses_by_category: Vec<CategoryTotal>,
}

/// Total, settled part and per-category breakdown of one side.
struct SideTotals {
    total: Money,
    settled: Money,
    by_category: Vec<CategoryTotal>,
}

fn side_totals<S: MirrorSide>(records: &[ProjectEntry<S>]) -> SideTotals {
    let mut total = Money::ZERO;
    let mut settled = Money::ZERO;
    let mut categories: BTreeMap<&str, (Money, u32)> = BTreeMap::new();
    for record in records {
        total += record.amount;
        if record.is_settled() {
            settled += record.amount;
        }
        let slot = categories.entry(record.category.as_str()).or_default();
        slot.0 += record.amount;
        slot.1 += 1;
    }
    SideTotals {
        total,
        settled,
        by_category: categories
            .into_iter()
            .map(|(category, (total, count))| CategoryTotal {
                category: category.to_string(),
                total,
                count,
            })
            .collect(),
    }
}

fn summarize(
    project: &Project,
    incomes: &[ProjectIncome],
    expenses: &[ProjectExpense],
) -> ProjectFinancialSummary {
    let income = side_totals(incomes);
    let expense = side_totals(expenses);
    let estimated_profit = income.total - expense.total;

    ProjectFinancialSummary {
        project_id: project.id,
        project_name: project.name.clone(),
        total_revenue: project.total_revenue,
        total_income: income.total,
        income_received: income.settled,
        income_pending: income.total - income.settled,
        total_expenses: expense.total,
        expenses_paid: expense.settled,
        expenses_unpaid: expense.total - expense.settled,
        actual_profit: income.settled - expense.settled,
        estimated_profit,
        profit_margin: estimated_profit.percent_of(project.total_revenue),
        progress_percent: income.settled.percent_of(project.total_revenue),
        income_by_category: income.by_category,
        expenses_by_category: expense.by_category,
    }
}

impl Engine {
    /// Read-only financial snapshot of a project.
    pub async fn project_financial_summary(
        &self,
        project_id: Uuid,
    ) -> ResultEngine<ProjectFinancialSummary> {
        with_tx!(self, |db_tx| {
            let project = projects::Entity::find_by_id(project_id)
                .one(&db_tx)
                .await?
                .map(Project::from)
                .ok_or_else(|| projects::not_found(project_id))?;

            let incomes = project_incomes::Entity::find()
                .filter(project_incomes::Column::ProjectId.eq(project_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(ProjectIncome::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            let expenses = project_expenses::Entity::find()
                .filter(project_expenses::Column::ProjectId.eq(project_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(ProjectExpense::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(summarize(&project, &incomes, &expenses))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::{ExpenseStatus, IncomeStatus};

    fn project(total_revenue: Money) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Jalan Desa".to_string(),
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

    fn entry<S>(project_id: Uuid, category: &str, amount: i64, status: S) -> ProjectEntry<S> {
        let now = Utc::now();
        ProjectEntry {
            id: Uuid::new_v4(),
            project_id,
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            category: category.to_string(),
            description: String::new(),
            amount: Money::rupiah(amount),
            status,
            finance_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn reference_scenario() {
        let project = project(Money::rupiah(100_000));
        let incomes = [
            entry(project.id, "Termin", 60_000, IncomeStatus::Received),
            entry(project.id, "Termin", 20_000, IncomeStatus::Pending),
        ];
        let expenses = [entry(project.id, "Solar", 30_000, ExpenseStatus::Paid)];

        let summary = summarize(&project, &incomes, &expenses);
        assert_eq!(summary.total_income, Money::rupiah(80_000));
        assert_eq!(summary.income_received, Money::rupiah(60_000));
        assert_eq!(summary.income_pending, Money::rupiah(20_000));
        assert_eq!(summary.total_expenses, Money::rupiah(30_000));
        assert_eq!(summary.expenses_paid, Money::rupiah(30_000));
        assert_eq!(summary.expenses_unpaid, Money::ZERO);
        assert_eq!(summary.actual_profit, Money::rupiah(30_000));
        assert_eq!(summary.estimated_profit, Money::rupiah(50_000));
        assert_eq!(summary.progress_percent, 60.0);
        assert_eq!(summary.profit_margin, 50.0);
        assert_eq!(
            summary.income_by_category,
            vec![CategoryTotal {
                category: "Termin".to_string(),
                total: Money::rupiah(80_000),
                count: 2,
            }]
        );
    }

    #[test]
    fn zero_revenue_yields_zero_ratios() {
        let project = project(Money::ZERO);
        let incomes = [entry(project.id, "Termin", 10_000, IncomeStatus::Received)];
        let summary = summarize(&project, &incomes, &[]);
        assert_eq!(summary.profit_margin, 0.0);
        assert_eq!(summary.progress_percent, 0.0);
        assert!(summary.profit_margin.is_finite());
    }

    #[test]
    fn categories_are_sorted_by_name() {
        let project = project(Money::rupiah(1_000));
        let expenses = [
            entry(project.id, "Solar", 10, ExpenseStatus::Unpaid),
            entry(project.id, "Gaji", 20, ExpenseStatus::Paid),
            entry(project.id, "Solar", 5, ExpenseStatus::Paid),
        ];
        let summary = summarize(&project, &[], &expenses);
        let names: Vec<&str> = summary
            .expenses_by_category
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, ["Gaji", "Solar"]);
        assert_eq!(summary.expenses_unpaid, Money::rupiah(10));
        assert_eq!(summary.estimated_profit, Money::rupiah(-35));
    }
}
