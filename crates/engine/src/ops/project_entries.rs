use chrono::Utc;
use uuid::Uuid;

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    ActivityKind, EngineError, MirrorSide, ProjectEntry, ProjectEntryNew, ProjectExpense,
    ProjectExpenseNew, ProjectExpensePatch, ProjectIncome, ProjectIncomeNew, ProjectIncomePatch,
    ResultEngine, project_expenses, project_incomes, projects,
};

use super::{
    Engine, activity::record_activity, best_effort, normalize_required_text,
    sync::{self, FinanceLink, MirrorChange, SyncAction, Synced},
    with_tx,
};

fn validate_new<S>(cmd: &ProjectEntryNew<S>, label: &str) -> ResultEngine<String> {
    let category = normalize_required_text(&cmd.category, "category")?;
    if !cmd.amount.is_positive() {
        return Err(EngineError::Validation(format!(
            "{label} amount must be positive, got {}",
            cmd.amount
        )));
    }
    Ok(category)
}

fn build_entry<S: MirrorSide>(cmd: ProjectEntryNew<S>, category: String) -> ProjectEntry<S> {
    let now = Utc::now();
    ProjectEntry {
        id: Uuid::new_v4(),
        project_id: cmd.project_id,
        date: cmd.date,
        category,
        description: cmd.description.trim().to_string(),
        amount: cmd.amount,
        status: cmd.status,
        finance_id: None,
        created_at: now,
        updated_at: now,
    }
}

fn activity_text<S>(record: &ProjectEntry<S>) -> String {
    format!("{} - {}", record.category, record.amount)
}

/// Mirrors `$record` into the ledger and stores the link on its row.
macro_rules! link_new_mirror {
    ($sp:expr, $module:ident, $record:expr) => {{
        let record = $record;
        let finance_id = sync::create_mirror($sp, record).await?;
        <$module::ActiveModel as FinanceLink>::link(record.id, Some(finance_id))
            .update($sp)
            .await?;
        Ok(finance_id)
    }};
}

/// Generates create/update/delete/read methods for one side of the project
/// books. Every write that settles, edits or unsettles a record drives its
/// ledger mirror.
macro_rules! impl_project_entry_ops {
    (
        label: $label:literal,
        entity: $module:ident,
        record: $record:ty,
        new: $new:ty,
        patch: $patch:ty,
        activity: $activity:expr,
        create: $create:ident,
        update: $update:ident,
        delete: $delete:ident,
        get: $get:ident,
        require: $require:ident,
        list: $list:ident,
        list_all: $list_all:ident $(,)?
    ) => {
        /// Records a new entry. A settled entry is mirrored into the ledger.
        pub async fn $create(&self, cmd: $new) -> ResultEngine<Synced<$record>> {
            let category = validate_new(&cmd, $label)?;
            with_tx!(self, |db_tx| {
                projects::Entity::find_by_id(cmd.project_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| projects::not_found(cmd.project_id))?;

                let mut record: $record = build_entry(cmd, category);
                $module::ActiveModel::from(&record).insert(&db_tx).await?;

                let mut warnings = Vec::new();
                if record.is_settled() {
                    match best_effort!(db_tx, SyncAction::CreateMirror, |sp| {
                        link_new_mirror!(&sp, $module, &record)
                    }) {
                        Ok(finance_id) => record.finance_id = Some(finance_id),
                        Err(warning) => warnings.push(warning),
                    }
                }

                record_activity(
                    &db_tx,
                    $activity,
                    concat!("New project ", $label),
                    &activity_text(&record),
                )
                .await;
                Ok(Synced::new(record, warnings))
            })
        }

        /// Applies `patch` and brings the ledger mirror in line with the
        /// transition from the stored state to the patched one.
        pub async fn $update(&self, id: Uuid, patch: $patch) -> ResultEngine<Synced<$record>> {
            with_tx!(self, |db_tx| {
                let before = self.$require(&db_tx, id).await?;
                let mut record = before.clone();
                patch.apply_to(&mut record);
                record.updated_at = Utc::now();
                $module::ActiveModel::from(&record).update(&db_tx).await?;

                let mut warnings = Vec::new();
                match sync::mirror_change(&before, &record) {
                    MirrorChange::Keep => {}
                    MirrorChange::Create => {
                        match best_effort!(db_tx, SyncAction::CreateMirror, |sp| {
                            link_new_mirror!(&sp, $module, &record)
                        }) {
                            Ok(finance_id) => record.finance_id = Some(finance_id),
                            Err(warning) => warnings.push(warning),
                        }
                    }
                    MirrorChange::Refresh(finance_id) => {
                        if let Err(warning) = best_effort!(db_tx, SyncAction::RefreshMirror, |sp| {
                            sync::refresh_mirror(&sp, finance_id, &record).await
                        }) {
                            warnings.push(warning);
                        }
                    }
                    MirrorChange::Remove(finance_id) => {
                        match best_effort!(db_tx, SyncAction::RemoveMirror, |sp| {
                            sync::remove_mirror(&sp, finance_id).await?;
                            <$module::ActiveModel as FinanceLink>::link(record.id, None)
                                .update(&sp)
                                .await?;
                            Ok(())
                        }) {
                            Ok(()) => record.finance_id = None,
                            Err(warning) => warnings.push(warning),
                        }
                    }
                }

                record_activity(
                    &db_tx,
                    $activity,
                    concat!("Project ", $label, " updated"),
                    &activity_text(&record),
                )
                .await;
                Ok(Synced::new(record, warnings))
            })
        }

        /// Deletes the entry only. Its ledger mirror, if any, stays in the
        /// ledger untouched.
        pub async fn $delete(&self, id: Uuid) -> ResultEngine<()> {
            with_tx!(self, |db_tx| {
                let record = self.$require(&db_tx, id).await?;
                $module::Entity::delete_by_id(id).exec(&db_tx).await?;
                record_activity(
                    &db_tx,
                    $activity,
                    concat!("Project ", $label, " deleted"),
                    &activity_text(&record),
                )
                .await;
                Ok(())
            })
        }

        async fn $require(&self, db_tx: &DatabaseTransaction, id: Uuid) -> ResultEngine<$record> {
            let model = $module::Entity::find_by_id(id)
                .one(db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!(concat!("project ", $label, " {}"), id)))?;
            <$record>::try_from(model)
        }

        pub async fn $get(&self, id: Uuid) -> ResultEngine<$record> {
            with_tx!(self, |db_tx| self.$require(&db_tx, id).await)
        }

        /// Entries of one project, newest first.
        pub async fn $list(&self, project_id: Uuid) -> ResultEngine<Vec<$record>> {
            with_tx!(self, |db_tx| {
                let models = $module::Entity::find()
                    .filter($module::Column::ProjectId.eq(project_id))
                    .order_by_desc($module::Column::Date)
                    .order_by_desc($module::Column::CreatedAt)
                    .all(&db_tx)
                    .await?;
                models
                    .into_iter()
                    .map(<$record>::try_from)
                    .collect::<ResultEngine<Vec<_>>>()
            })
        }

        /// Entries of every project, newest first.
        pub async fn $list_all(&self) -> ResultEngine<Vec<$record>> {
            with_tx!(self, |db_tx| {
                let models = $module::Entity::find()
                    .order_by_desc($module::Column::Date)
                    .order_by_desc($module::Column::CreatedAt)
                    .all(&db_tx)
                    .await?;
                models
                    .into_iter()
                    .map(<$record>::try_from)
                    .collect::<ResultEngine<Vec<_>>>()
            })
        }
    };
}

impl Engine {
    impl_project_entry_ops!(
        label: "income",
        entity: project_incomes,
        record: ProjectIncome,
        new: ProjectIncomeNew,
        patch: ProjectIncomePatch,
        activity: ActivityKind::Income,
        create: create_project_income,
        update: update_project_income,
        delete: delete_project_income,
        get: project_income,
        require: require_project_income,
        list: project_incomes,
        list_all: all_project_incomes,
    );

    impl_project_entry_ops!(
        label: "expense",
        entity: project_expenses,
        record: ProjectExpense,
        new: ProjectExpenseNew,
        patch: ProjectExpensePatch,
        activity: ActivityKind::Expense,
        create: create_project_expense,
        update: update_project_expense,
        delete: delete_project_expense,
        get: project_expense,
        require: require_project_expense,
        list: project_expenses,
        list_all: all_project_expenses,
    );
}
