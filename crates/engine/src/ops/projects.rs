use uuid::Uuid;

use sea_orm::{QueryOrder, TransactionTrait, prelude::*};

use crate::{ActivityKind, EngineError, Project, ProjectNew, ResultEngine, projects};

use super::{Engine, activity::record_activity, normalize_required_text, with_tx};

impl Engine {
    /// Creates a project the incomes and expenses can be booked against.
    pub async fn new_project(&self, cmd: ProjectNew) -> ResultEngine<Project> {
        let name = normalize_required_text(&cmd.name, "project name")?;
        for (label, amount) in [
            ("total revenue", cmd.total_revenue),
            ("amount paid", cmd.amount_paid),
            ("unit price", cmd.unit_price),
        ] {
            if amount.is_negative() {
                return Err(EngineError::Validation(format!(
                    "{label} must not be negative, got {amount}"
                )));
            }
        }
        if let (Some(start), Some(end)) = (cmd.start_date, cmd.end_date)
            && end < start
        {
            return Err(EngineError::Validation(
                "project end date must not be before its start date".to_string(),
            ));
        }
        if !cmd.total_volume.is_finite() || cmd.total_volume < 0.0 {
            return Err(EngineError::Validation(format!(
                "total volume must be a non-negative number, got {}",
                cmd.total_volume
            )));
        }

        with_tx!(self, |db_tx| {
            let project = Project {
                id: Uuid::new_v4(),
                name,
                description: cmd.description.trim().to_string(),
                status: cmd.status.trim().to_string(),
                start_date: cmd.start_date,
                end_date: cmd.end_date,
                total_revenue: cmd.total_revenue,
                amount_paid: cmd.amount_paid,
                unit_price: cmd.unit_price,
                total_volume: cmd.total_volume,
                unit: cmd.unit.trim().to_string(),
            };
            projects::ActiveModel::from(&project).insert(&db_tx).await?;
            record_activity(
                &db_tx,
                ActivityKind::Income,
                "New project",
                &format!("Project {} started", project.name),
            )
            .await;
            Ok(project)
        })
    }

    pub async fn project(&self, id: Uuid) -> ResultEngine<Project> {
        with_tx!(self, |db_tx| {
            let model = projects::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| projects::not_found(id))?;
            Ok(Project::from(model))
        })
    }

    /// Every project, by name.
    pub async fn projects(&self) -> ResultEngine<Vec<Project>> {
        with_tx!(self, |db_tx| {
            let models = projects::Entity::find()
                .order_by_asc(projects::Column::Name)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Project::from).collect())
        })
    }
}
