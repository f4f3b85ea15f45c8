//! Initial schema migration - creates all tables from scratch.
//!
//! - `projects`: contracts incomes and expenses are booked against
//! - `project_incomes` / `project_expenses`: per-project books
//! - `ledger_entries`: the unified income/expense ledger, manual or mirrored
//! - `members`, `salaries`, `salary_details`, `kasbons`: payroll
//! - `activities`: dashboard activity feed

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    Name,
    Description,
    Status,
    StartDate,
    EndDate,
    TotalRevenueMinor,
    AmountPaidMinor,
    UnitPriceMinor,
    TotalVolume,
    Unit,
}

#[derive(Clone, Copy, Iden)]
enum ProjectIncomes {
    Table,
}

#[derive(Clone, Copy, Iden)]
enum ProjectExpenses {
    Table,
}

/// Columns shared by `project_incomes` and `project_expenses`.
#[derive(Iden)]
enum ProjectEntry {
    Id,
    ProjectId,
    Date,
    Category,
    Description,
    AmountMinor,
    Status,
    FinanceId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum LedgerEntries {
    Table,
    Id,
    Date,
    UnitCount,
    PricePerUnitMinor,
    AmountMinor,
    Note,
    Kind,
    Category,
    Status,
    ProjectId,
    ProjectIncomeId,
    ProjectExpenseId,
    Source,
}

#[derive(Iden)]
enum Members {
    Table,
    Id,
    FullName,
    Role,
    Active,
}

#[derive(Iden)]
enum Salaries {
    Table,
    Id,
    MemberId,
    Month,
    SalaryMinor,
    GrossSalaryMinor,
    LoanMinor,
    NetSalaryMinor,
    Status,
    Documents,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SalaryDetails {
    Table,
    Id,
    SalaryId,
    Date,
    Hours,
    RatePerHourMinor,
    Note,
}

#[derive(Iden)]
enum Kasbons {
    Table,
    Id,
    SalaryId,
    Date,
    AmountMinor,
    Note,
}

#[derive(Iden)]
enum Activities {
    Table,
    Id,
    Kind,
    Title,
    Description,
    Timestamp,
}

fn project_entry_table<T>(table: T, fk_name: &str) -> TableCreateStatement
where
    T: Iden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(ProjectEntry::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(ProjectEntry::ProjectId).uuid().not_null())
        .col(ColumnDef::new(ProjectEntry::Date).date().not_null())
        .col(ColumnDef::new(ProjectEntry::Category).string().not_null())
        .col(
            ColumnDef::new(ProjectEntry::Description)
                .string()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(ProjectEntry::AmountMinor)
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(ProjectEntry::Status).string().not_null())
        .col(ColumnDef::new(ProjectEntry::FinanceId).uuid())
        .col(
            ColumnDef::new(ProjectEntry::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(ProjectEntry::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name(fk_name)
                .from(table, ProjectEntry::ProjectId)
                .to(Projects::Table, Projects::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Projects
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(
                        ColumnDef::new(Projects::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Projects::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(ColumnDef::new(Projects::StartDate).date())
                    .col(ColumnDef::new(Projects::EndDate).date())
                    .col(
                        ColumnDef::new(Projects::TotalRevenueMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Projects::AmountPaidMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Projects::UnitPriceMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Projects::TotalVolume)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Projects::Unit)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Project incomes and expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(project_entry_table(
                ProjectIncomes::Table,
                "fk-project_incomes-project_id",
            ))
            .await?;
        manager
            .create_table(project_entry_table(
                ProjectExpenses::Table,
                "fk-project_expenses-project_id",
            ))
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-project_incomes-project_id-date")
                    .table(ProjectIncomes::Table)
                    .col(ProjectEntry::ProjectId)
                    .col(ProjectEntry::Date)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-project_expenses-project_id-date")
                    .table(ProjectExpenses::Table)
                    .col(ProjectEntry::ProjectId)
                    .col(ProjectEntry::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Ledger entries
        // ───────────────────────────────────────────────────────────────────
        // Back-references carry no foreign keys: a mirror outlives the
        // record it was created from.
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerEntries::Date).date().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::UnitCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::PricePerUnitMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::Note)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(LedgerEntries::Kind).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Category).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Status).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::ProjectId).uuid())
                    .col(ColumnDef::new(LedgerEntries::ProjectIncomeId).uuid())
                    .col(ColumnDef::new(LedgerEntries::ProjectExpenseId).uuid())
                    .col(
                        ColumnDef::new(LedgerEntries::Source)
                            .string()
                            .not_null()
                            .default("manual"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-date")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Members::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Members::FullName).string().not_null())
                    .col(
                        ColumnDef::new(Members::Role)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Members::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Salaries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Salaries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Salaries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Salaries::MemberId).uuid().not_null())
                    .col(ColumnDef::new(Salaries::Month).string().not_null())
                    .col(
                        ColumnDef::new(Salaries::SalaryMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Salaries::GrossSalaryMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Salaries::LoanMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Salaries::NetSalaryMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Salaries::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Salaries::Documents).json().not_null())
                    .col(
                        ColumnDef::new(Salaries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Salaries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-salaries-member_id")
                            .from(Salaries::Table, Salaries::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Salary details and kasbons
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SalaryDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalaryDetails::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SalaryDetails::SalaryId).uuid().not_null())
                    .col(ColumnDef::new(SalaryDetails::Date).date().not_null())
                    .col(ColumnDef::new(SalaryDetails::Hours).integer().not_null())
                    .col(
                        ColumnDef::new(SalaryDetails::RatePerHourMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalaryDetails::Note)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-salary_details-salary_id")
                            .from(SalaryDetails::Table, SalaryDetails::SalaryId)
                            .to(Salaries::Table, Salaries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Kasbons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Kasbons::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Kasbons::SalaryId).uuid().not_null())
                    .col(ColumnDef::new(Kasbons::Date).date().not_null())
                    .col(ColumnDef::new(Kasbons::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Kasbons::Note)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-kasbons-salary_id")
                            .from(Kasbons::Table, Kasbons::SalaryId)
                            .to(Salaries::Table, Salaries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Activities
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::Kind).string().not_null())
                    .col(ColumnDef::new(Activities::Title).string().not_null())
                    .col(
                        ColumnDef::new(Activities::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Activities::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-activities-timestamp")
                    .table(Activities::Table)
                    .col(Activities::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Kasbons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SalaryDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Salaries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectExpenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectIncomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        Ok(())
    }
}
