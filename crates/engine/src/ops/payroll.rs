//! Members, salaries and the recalculation of their payroll figures.
//!
//! Every detail line or kasbon write recalculates the owning salary in the
//! same database transaction, so stored figures never lag their children.

use chrono::Utc;
use uuid::Uuid;

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    ActivityKind, EngineError, Kasbon, KasbonCmd, Member, MemberNew, ResultEngine, Salary,
    SalaryDetail, SalaryDetailCmd, SalaryFigures, SalaryNew, SalaryPatch, kasbons, members,
    salaries, salary_details,
};

use super::{Engine, activity::record_activity, normalize_required_text, with_tx};

fn salary_not_found(id: Uuid) -> EngineError {
    EngineError::KeyNotFound(format!("salary {id}"))
}

fn validate_detail(cmd: &SalaryDetailCmd) -> ResultEngine<()> {
    if cmd.hours < 0 {
        return Err(EngineError::Validation(format!(
            "hours must not be negative, got {}",
            cmd.hours
        )));
    }
    if cmd.rate_per_hour.is_negative() {
        return Err(EngineError::Validation(format!(
            "rate per hour must not be negative, got {}",
            cmd.rate_per_hour
        )));
    }
    Ok(())
}

fn validate_kasbon(cmd: &KasbonCmd) -> ResultEngine<()> {
    if !cmd.amount.is_positive() {
        return Err(EngineError::Validation(format!(
            "kasbon amount must be positive, got {}",
            cmd.amount
        )));
    }
    Ok(())
}

fn normalize_status(status: &str) -> ResultEngine<String> {
    normalize_required_text(status, "salary status")
}

async fn find_salary(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<Option<Salary>> {
    salaries::Entity::find_by_id(id)
        .one(db_tx)
        .await?
        .map(Salary::try_from)
        .transpose()
}

async fn require_salary(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<Salary> {
    find_salary(db_tx, id)
        .await?
        .ok_or_else(|| salary_not_found(id))
}

async fn require_member(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<Member> {
    let model = members::Entity::find_by_id(id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("member {id}")))?;
    Ok(Member::from(model))
}

async fn require_detail(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<SalaryDetail> {
    let model = salary_details::Entity::find_by_id(id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("salary detail {id}")))?;
    Ok(SalaryDetail::from(model))
}

async fn require_kasbon(db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<Kasbon> {
    let model = kasbons::Entity::find_by_id(id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("kasbon {id}")))?;
    Ok(Kasbon::from(model))
}

async fn details_of(db_tx: &DatabaseTransaction, salary_id: Uuid) -> ResultEngine<Vec<SalaryDetail>> {
    let models = salary_details::Entity::find()
        .filter(salary_details::Column::SalaryId.eq(salary_id))
        .order_by_asc(salary_details::Column::Date)
        .all(db_tx)
        .await?;
    Ok(models.into_iter().map(SalaryDetail::from).collect())
}

async fn kasbons_of(db_tx: &DatabaseTransaction, salary_id: Uuid) -> ResultEngine<Vec<Kasbon>> {
    let models = kasbons::Entity::find()
        .filter(kasbons::Column::SalaryId.eq(salary_id))
        .order_by_asc(kasbons::Column::Date)
        .all(db_tx)
        .await?;
    Ok(models.into_iter().map(Kasbon::from).collect())
}

/// Recomputes and stores the figures of `salary_id` from its current children.
///
/// A missing salary is a [`EngineError::Recalculation`] error.
async fn recalculate(db_tx: &DatabaseTransaction, salary_id: Uuid) -> ResultEngine<SalaryFigures> {
    if find_salary(db_tx, salary_id).await?.is_none() {
        return Err(EngineError::Recalculation(format!(
            "salary {salary_id} does not exist"
        )));
    }
    let details = details_of(db_tx, salary_id).await?;
    let kasbons = kasbons_of(db_tx, salary_id).await?;
    let figures = SalaryFigures::compute(&details, &kasbons)?;
    salaries::figures_update(salary_id, figures)
        .update(db_tx)
        .await?;
    tracing::debug!(
        %salary_id,
        gross = %figures.gross_salary,
        loan = %figures.loan,
        net = %figures.net_salary,
        "salary recalculated"
    );
    Ok(figures)
}

/// Recalculates the salary a child was moved away from, then the one it now
/// belongs to.
async fn recalculate_owners(
    db_tx: &DatabaseTransaction,
    previous: Uuid,
    current: Uuid,
) -> ResultEngine<()> {
    if previous != current {
        recalculate(db_tx, previous).await?;
    }
    recalculate(db_tx, current).await?;
    Ok(())
}

async fn salary_owner_text(db_tx: &DatabaseTransaction, salary_id: Uuid) -> ResultEngine<String> {
    let salary = require_salary(db_tx, salary_id).await?;
    let member = require_member(db_tx, salary.member_id).await?;
    Ok(format!("{} - {}", member.full_name, salary.month))
}

impl Engine {
    /// Registers a crew member.
    pub async fn new_member(&self, cmd: MemberNew) -> ResultEngine<Member> {
        let full_name = normalize_required_text(&cmd.full_name, "member name")?;
        with_tx!(self, |db_tx| {
            let member = Member {
                id: Uuid::new_v4(),
                full_name,
                role: cmd.role.trim().to_string(),
                active: cmd.active,
            };
            members::ActiveModel::from(&member).insert(&db_tx).await?;
            record_activity(
                &db_tx,
                ActivityKind::Member,
                "New member",
                &format!("{} joined as {}", member.full_name, member.role),
            )
            .await;
            Ok(member)
        })
    }

    pub async fn member(&self, id: Uuid) -> ResultEngine<Member> {
        with_tx!(self, |db_tx| require_member(&db_tx, id).await)
    }

    /// Every member, by name.
    pub async fn members(&self) -> ResultEngine<Vec<Member>> {
        with_tx!(self, |db_tx| {
            let models = members::Entity::find()
                .order_by_asc(members::Column::FullName)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Member::from).collect())
        })
    }

    /// Opens a salary for `member_id`. Figures start at zero.
    pub async fn create_salary(&self, member_id: Uuid, cmd: SalaryNew) -> ResultEngine<Salary> {
        let status = match cmd.status.as_deref() {
            Some(status) => normalize_status(status)?,
            None => salaries::DEFAULT_STATUS.to_string(),
        };
        with_tx!(self, |db_tx| {
            let member = require_member(&db_tx, member_id).await?;
            let salary = Salary::new(member.id, cmd.month, status, cmd.documents);
            salaries::ActiveModel::from(&salary).insert(&db_tx).await?;
            record_activity(
                &db_tx,
                ActivityKind::Update,
                "Salary opened",
                &format!("Salary {} for {}", salary.month, member.full_name),
            )
            .await;
            Ok(salary)
        })
    }

    /// Changes the month, status or documents of a salary.
    pub async fn update_salary(&self, id: Uuid, patch: SalaryPatch) -> ResultEngine<Salary> {
        let status = patch.status.as_deref().map(normalize_status).transpose()?;
        with_tx!(self, |db_tx| {
            let mut salary = require_salary(&db_tx, id).await?;
            if let Some(month) = patch.month {
                salary.month = month;
            }
            if let Some(status) = status {
                salary.status = status;
            }
            if let Some(documents) = patch.documents {
                salary.documents = documents;
            }
            salary.updated_at = Utc::now();
            salaries::ActiveModel::from(&salary).update(&db_tx).await?;

            let owner = salary_owner_text(&db_tx, salary.id).await?;
            record_activity(&db_tx, ActivityKind::Update, "Salary updated", &owner).await;
            Ok(salary)
        })
    }

    /// Deletes a salary together with its detail lines and kasbons.
    pub async fn delete_salary(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let owner = salary_owner_text(&db_tx, id).await?;
            salary_details::Entity::delete_many()
                .filter(salary_details::Column::SalaryId.eq(id))
                .exec(&db_tx)
                .await?;
            kasbons::Entity::delete_many()
                .filter(kasbons::Column::SalaryId.eq(id))
                .exec(&db_tx)
                .await?;
            salaries::Entity::delete_by_id(id).exec(&db_tx).await?;
            record_activity(&db_tx, ActivityKind::Expense, "Salary deleted", &owner).await;
            Ok(())
        })
    }

    pub async fn salary(&self, id: Uuid) -> ResultEngine<Salary> {
        with_tx!(self, |db_tx| require_salary(&db_tx, id).await)
    }

    /// Salaries of one member, newest first.
    pub async fn salaries_for_member(&self, member_id: Uuid) -> ResultEngine<Vec<Salary>> {
        with_tx!(self, |db_tx| {
            require_member(&db_tx, member_id).await?;
            let models = salaries::Entity::find()
                .filter(salaries::Column::MemberId.eq(member_id))
                .order_by_desc(salaries::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            let mut items = models
                .into_iter()
                .map(Salary::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            items.sort_by(|a, b| b.month.cmp(&a.month));
            Ok(items)
        })
    }

    /// Recomputes gross, loan and net of a salary from its children.
    ///
    /// Idempotent: without intervening writes a second call yields the same
    /// figures.
    pub async fn recalculate_salary(&self, id: Uuid) -> ResultEngine<SalaryFigures> {
        with_tx!(self, |db_tx| recalculate(&db_tx, id).await)
    }

    pub async fn create_salary_detail(&self, cmd: SalaryDetailCmd) -> ResultEngine<SalaryDetail> {
        validate_detail(&cmd)?;
        with_tx!(self, |db_tx| {
            require_salary(&db_tx, cmd.salary_id).await?;
            let detail = SalaryDetail {
                id: Uuid::new_v4(),
                salary_id: cmd.salary_id,
                date: cmd.date,
                hours: cmd.hours,
                rate_per_hour: cmd.rate_per_hour,
                note: cmd.note.trim().to_string(),
            };
            detail.line_total()?;
            salary_details::ActiveModel::from(&detail).insert(&db_tx).await?;
            recalculate(&db_tx, detail.salary_id).await?;

            let owner = salary_owner_text(&db_tx, detail.salary_id).await?;
            record_activity(
                &db_tx,
                ActivityKind::Income,
                "Salary detail added",
                &format!("{owner}: {}", detail.note),
            )
            .await;
            Ok(detail)
        })
    }

    /// Replaces a detail line. Moving it to another salary recalculates both.
    pub async fn update_salary_detail(
        &self,
        id: Uuid,
        cmd: SalaryDetailCmd,
    ) -> ResultEngine<SalaryDetail> {
        validate_detail(&cmd)?;
        with_tx!(self, |db_tx| {
            let stored = require_detail(&db_tx, id).await?;
            if stored.salary_id != cmd.salary_id {
                require_salary(&db_tx, cmd.salary_id).await?;
            }
            let detail = SalaryDetail {
                id,
                salary_id: cmd.salary_id,
                date: cmd.date,
                hours: cmd.hours,
                rate_per_hour: cmd.rate_per_hour,
                note: cmd.note.trim().to_string(),
            };
            detail.line_total()?;
            salary_details::ActiveModel::from(&detail).update(&db_tx).await?;
            recalculate_owners(&db_tx, stored.salary_id, detail.salary_id).await?;

            let owner = salary_owner_text(&db_tx, detail.salary_id).await?;
            record_activity(
                &db_tx,
                ActivityKind::Update,
                "Salary detail updated",
                &format!("{owner}: {}", detail.note),
            )
            .await;
            Ok(detail)
        })
    }

    /// Deletes a detail line and recalculates the salary that owned it.
    pub async fn delete_salary_detail(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let detail = require_detail(&db_tx, id).await?;
            let salary_id = detail.salary_id;
            salary_details::Entity::delete_by_id(id).exec(&db_tx).await?;
            recalculate(&db_tx, salary_id).await?;

            let owner = salary_owner_text(&db_tx, salary_id).await?;
            record_activity(
                &db_tx,
                ActivityKind::Expense,
                "Salary detail deleted",
                &format!("{owner}: {}", detail.note),
            )
            .await;
            Ok(())
        })
    }

    pub async fn salary_detail(&self, id: Uuid) -> ResultEngine<SalaryDetail> {
        with_tx!(self, |db_tx| require_detail(&db_tx, id).await)
    }

    /// Detail lines of a salary, oldest first.
    pub async fn salary_details(&self, salary_id: Uuid) -> ResultEngine<Vec<SalaryDetail>> {
        with_tx!(self, |db_tx| {
            require_salary(&db_tx, salary_id).await?;
            details_of(&db_tx, salary_id).await
        })
    }

    pub async fn create_kasbon(&self, cmd: KasbonCmd) -> ResultEngine<Kasbon> {
        validate_kasbon(&cmd)?;
        with_tx!(self, |db_tx| {
            require_salary(&db_tx, cmd.salary_id).await?;
            let kasbon = Kasbon {
                id: Uuid::new_v4(),
                salary_id: cmd.salary_id,
                date: cmd.date,
                amount: cmd.amount,
                note: cmd.note.trim().to_string(),
            };
            kasbons::ActiveModel::from(&kasbon).insert(&db_tx).await?;
            recalculate(&db_tx, kasbon.salary_id).await?;

            let owner = salary_owner_text(&db_tx, kasbon.salary_id).await?;
            record_activity(
                &db_tx,
                ActivityKind::Income,
                "Kasbon created",
                &format!("Kasbon {} for {owner}", kasbon.amount),
            )
            .await;
            Ok(kasbon)
        })
    }

    /// Replaces a kasbon. Moving it to another salary recalculates both.
    pub async fn update_kasbon(&self, id: Uuid, cmd: KasbonCmd) -> ResultEngine<Kasbon> {
        validate_kasbon(&cmd)?;
        with_tx!(self, |db_tx| {
            let stored = require_kasbon(&db_tx, id).await?;
            if stored.salary_id != cmd.salary_id {
                require_salary(&db_tx, cmd.salary_id).await?;
            }
            let kasbon = Kasbon {
                id,
                salary_id: cmd.salary_id,
                date: cmd.date,
                amount: cmd.amount,
                note: cmd.note.trim().to_string(),
            };
            kasbons::ActiveModel::from(&kasbon).update(&db_tx).await?;
            recalculate_owners(&db_tx, stored.salary_id, kasbon.salary_id).await?;

            let owner = salary_owner_text(&db_tx, kasbon.salary_id).await?;
            record_activity(
                &db_tx,
                ActivityKind::Update,
                "Kasbon updated",
                &format!("Kasbon {} for {owner}", kasbon.amount),
            )
            .await;
            Ok(kasbon)
        })
    }

    /// Deletes a kasbon and recalculates the salary that owned it.
    pub async fn delete_kasbon(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let kasbon = require_kasbon(&db_tx, id).await?;
            let salary_id = kasbon.salary_id;
            kasbons::Entity::delete_by_id(id).exec(&db_tx).await?;
            recalculate(&db_tx, salary_id).await?;

            let owner = salary_owner_text(&db_tx, salary_id).await?;
            record_activity(
                &db_tx,
                ActivityKind::Expense,
                "Kasbon deleted",
                &format!("Kasbon {} for {owner}", kasbon.amount),
            )
            .await;
            Ok(())
        })
    }

    pub async fn kasbon(&self, id: Uuid) -> ResultEngine<Kasbon> {
        with_tx!(self, |db_tx| require_kasbon(&db_tx, id).await)
    }

    /// Kasbons of a salary, oldest first.
    pub async fn kasbons(&self, salary_id: Uuid) -> ResultEngine<Vec<Kasbon>> {
        with_tx!(self, |db_tx| {
            require_salary(&db_tx, salary_id).await?;
            kasbons_of(&db_tx, salary_id).await
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::Money;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn detail_validation() {
        let salary_id = Uuid::new_v4();
        assert!(validate_detail(&SalaryDetailCmd::new(salary_id, date(), 0, Money::ZERO)).is_ok());
        assert!(matches!(
            validate_detail(&SalaryDetailCmd::new(salary_id, date(), -1, Money::rupiah(1))),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            validate_detail(&SalaryDetailCmd::new(salary_id, date(), 8, Money::rupiah(-1))),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn kasbon_must_be_positive() {
        let salary_id = Uuid::new_v4();
        assert!(validate_kasbon(&KasbonCmd::new(salary_id, date(), Money::rupiah(1))).is_ok());
        assert!(validate_kasbon(&KasbonCmd::new(salary_id, date(), Money::ZERO)).is_err());
    }
}
