use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    ActivityKind, Engine, EngineError, LedgerCategory, LedgerEntryCmd, LedgerFilter, LedgerKind,
    LedgerSource, LedgerStatus, Money,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

#[tokio::test]
async fn amount_is_units_times_price() {
    let (engine, _db) = engine_with_db().await;

    let entry = engine
        .create_ledger_entry(
            LedgerEntryCmd::new(date(3, 1), LedgerKind::Expense, "Barang", 3, Money::rupiah(25_000))
                .note("Semen"),
        )
        .await
        .unwrap();
    assert_eq!(entry.amount, Money::rupiah(75_000));
    assert_eq!(entry.source, LedgerSource::Manual);
    assert_eq!(entry.project_income_id, None);
    assert_eq!(entry.project_expense_id, None);

    let edited = engine
        .update_ledger_entry(
            entry.id,
            LedgerEntryCmd::new(date(3, 2), LedgerKind::Expense, "Barang", 4, Money::rupiah(25_000))
                .note("Semen"),
        )
        .await
        .unwrap();
    assert!(edited.is_clean());
    assert_eq!(edited.value.amount, Money::rupiah(100_000));

    let stored = engine.ledger_entry(entry.id).await.unwrap();
    assert_eq!(Some(stored.amount), stored.price_per_unit.checked_mul(4));
}

#[tokio::test]
async fn invalid_terms_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_ledger_entry(LedgerEntryCmd::new(
            date(3, 1),
            LedgerKind::Income,
            "Jasa",
            0,
            Money::rupiah(10),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .update_ledger_entry(
            Uuid::new_v4(),
            LedgerEntryCmd::new(date(3, 1), LedgerKind::Income, "Jasa", 1, Money::rupiah(10)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine.delete_ledger_entry(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn filters_combine() {
    let (engine, _db) = engine_with_db().await;
    for (day, kind, category, price, status) in [
        (1, LedgerKind::Income, "Jasa", 500_000, LedgerStatus::Paid),
        (5, LedgerKind::Expense, "Barang", 120_000, LedgerStatus::Paid),
        (9, LedgerKind::Expense, "Sewa Alat Berat", 300_000, LedgerStatus::Unpaid),
        (20, LedgerKind::Expense, "Barang", 80_000, LedgerStatus::Unpaid),
    ] {
        engine
            .create_ledger_entry(
                LedgerEntryCmd::new(date(4, day), kind, category, 1, Money::rupiah(price))
                    .status(status),
            )
            .await
            .unwrap();
    }

    let expenses = engine
        .list_ledger_entries(&LedgerFilter::default().kind(LedgerKind::Expense))
        .await
        .unwrap();
    assert_eq!(expenses.len(), 3);
    assert!(expenses.windows(2).all(|w| w[0].date >= w[1].date));

    let goods = engine
        .list_ledger_entries(&LedgerFilter::default().category(LedgerCategory::Goods))
        .await
        .unwrap();
    assert_eq!(goods.len(), 2);

    let unpaid_in_range = engine
        .list_ledger_entries(
            &LedgerFilter::default()
                .status(LedgerStatus::Unpaid)
                .dates(Some(date(4, 1)), Some(date(4, 9))),
        )
        .await
        .unwrap();
    assert_eq!(unpaid_in_range.len(), 1);
    assert_eq!(unpaid_in_range[0].category, "Sewa Alat Berat");

    let mid_amounts = engine
        .list_ledger_entries(
            &LedgerFilter::default().amounts(Some(Money::rupiah(100_000)), Some(Money::rupiah(300_000))),
        )
        .await
        .unwrap();
    assert_eq!(mid_amounts.len(), 2);
}

#[tokio::test]
async fn totals_and_monthly_comparison() {
    let (engine, _db) = engine_with_db().await;
    for (month, kind, price) in [
        (1, LedgerKind::Income, 1_000_000),
        (1, LedgerKind::Expense, 400_000),
        (2, LedgerKind::Expense, 250_000),
        (3, LedgerKind::Income, 700_000),
    ] {
        engine
            .create_ledger_entry(LedgerEntryCmd::new(
                date(month, 15),
                kind,
                "Other",
                1,
                Money::rupiah(price),
            ))
            .await
            .unwrap();
    }

    let totals = engine.ledger_totals().await.unwrap();
    assert_eq!(totals.income, Money::rupiah(1_700_000));
    assert_eq!(totals.expense, Money::rupiah(650_000));
    assert_eq!(totals.balance(), Money::rupiah(1_050_000));

    let months = engine.monthly_comparison().await.unwrap();
    let keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(keys, ["2025-01", "2025-02", "2025-03"]);
    assert_eq!(months[0].income, Money::rupiah(1_000_000));
    assert_eq!(months[0].expense, Money::rupiah(400_000));
    assert_eq!(months[1].income, Money::ZERO);
}

#[tokio::test]
async fn writes_are_logged_as_activities() {
    let (engine, _db) = engine_with_db().await;
    let entry = engine
        .create_ledger_entry(
            LedgerEntryCmd::new(date(5, 1), LedgerKind::Income, "Jasa", 1, Money::rupiah(10_000))
                .note("Konsultasi"),
        )
        .await
        .unwrap();
    engine.delete_ledger_entry(entry.id).await.unwrap();

    let activities = engine.recent_activities(10).await.unwrap();
    assert_eq!(activities.len(), 2);
    assert!(activities.iter().all(|a| a.kind == ActivityKind::Income));
    assert!(activities.iter().any(|a| a.title == "New transaction"));
    assert!(activities.iter().any(|a| a.title == "Transaction deleted"));

    let latest = engine.recent_activities(1).await.unwrap();
    assert_eq!(latest.len(), 1);
}

#[tokio::test]
async fn activity_log_failures_never_fail_the_write() {
    let (engine, db) = engine_with_db().await;
    engine
        .log_activity(ActivityKind::Member, "Member added", "Budi joined as Operator")
        .await;
    assert_eq!(engine.recent_activities(5).await.unwrap()[0].kind, ActivityKind::Member);

    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "DROP TABLE activities".to_string()))
        .await
        .unwrap();

    engine
        .log_activity(ActivityKind::Update, "Ignored", "activities table is gone")
        .await;
    let entry = engine
        .create_ledger_entry(LedgerEntryCmd::new(
            date(5, 2),
            LedgerKind::Expense,
            "Barang",
            2,
            Money::rupiah(5_000),
        ))
        .await
        .unwrap();
    assert_eq!(engine.ledger_entry(entry.id).await.unwrap(), entry);
}
