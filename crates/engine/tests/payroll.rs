use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, EngineError, KasbonCmd, MemberNew, Money, Salary, SalaryDetailCmd, SalaryFigures,
    SalaryMonth, SalaryNew, SalaryPatch,
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

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

async fn new_salary(engine: &Engine) -> Salary {
    let member = engine
        .new_member(MemberNew::new("Budi Santoso", "Operator"))
        .await
        .unwrap();
    let month: SalaryMonth = "Januari 2025".parse().unwrap();
    engine
        .create_salary(member.id, SalaryNew::new(month))
        .await
        .unwrap()
}

async fn stored_figures(engine: &Engine, salary_id: Uuid) -> SalaryFigures {
    engine.salary(salary_id).await.unwrap().figures()
}

#[tokio::test]
async fn new_salary_starts_at_zero() {
    let (engine, _db) = engine_with_db().await;
    let salary = new_salary(&engine).await;

    assert_eq!(salary.month.to_string(), "January 2025");
    assert_eq!(salary.status, "Pending");
    assert_eq!(salary.figures(), SalaryFigures::default());
    assert_eq!(
        engine.recalculate_salary(salary.id).await.unwrap(),
        SalaryFigures::default()
    );
}

#[tokio::test]
async fn details_and_kasbons_drive_figures() {
    let (engine, _db) = engine_with_db().await;
    let salary = new_salary(&engine).await;

    engine
        .create_salary_detail(SalaryDetailCmd::new(salary.id, day(6), 8, Money::rupiah(50_000)))
        .await
        .unwrap();
    engine
        .create_salary_detail(SalaryDetailCmd::new(salary.id, day(7), 4, Money::rupiah(50_000)))
        .await
        .unwrap();
    engine
        .create_kasbon(KasbonCmd::new(salary.id, day(10), Money::rupiah(100_000)))
        .await
        .unwrap();

    let figures = stored_figures(&engine, salary.id).await;
    assert_eq!(figures.gross_salary, Money::rupiah(600_000));
    assert_eq!(figures.loan, Money::rupiah(100_000));
    assert_eq!(figures.net_salary, Money::rupiah(500_000));

    let again = engine.recalculate_salary(salary.id).await.unwrap();
    assert_eq!(again, figures);
    assert_eq!(engine.recalculate_salary(salary.id).await.unwrap(), again);
}

#[tokio::test]
async fn deleting_kasbon_recalculates_its_salary() {
    let (engine, _db) = engine_with_db().await;
    let salary = new_salary(&engine).await;
    engine
        .create_salary_detail(SalaryDetailCmd::new(salary.id, day(6), 10, Money::rupiah(20_000)))
        .await
        .unwrap();
    let kasbon = engine
        .create_kasbon(KasbonCmd::new(salary.id, day(10), Money::rupiah(50_000)))
        .await
        .unwrap();
    assert_eq!(
        stored_figures(&engine, salary.id).await.net_salary,
        Money::rupiah(150_000)
    );

    engine.delete_kasbon(kasbon.id).await.unwrap();

    let figures = stored_figures(&engine, salary.id).await;
    assert_eq!(figures.loan, Money::ZERO);
    assert_eq!(figures.net_salary, Money::rupiah(200_000));
    assert!(engine.kasbons(salary.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_detail_recalculates_its_salary() {
    let (engine, _db) = engine_with_db().await;
    let salary = new_salary(&engine).await;
    let detail = engine
        .create_salary_detail(SalaryDetailCmd::new(salary.id, day(6), 8, Money::rupiah(50_000)))
        .await
        .unwrap();

    engine.delete_salary_detail(detail.id).await.unwrap();

    assert_eq!(stored_figures(&engine, salary.id).await, SalaryFigures::default());
}

#[tokio::test]
async fn net_may_go_negative() {
    let (engine, _db) = engine_with_db().await;
    let salary = new_salary(&engine).await;
    engine
        .create_kasbon(KasbonCmd::new(salary.id, day(3), Money::rupiah(75_000)))
        .await
        .unwrap();

    let figures = stored_figures(&engine, salary.id).await;
    assert_eq!(figures.gross_salary, Money::ZERO);
    assert_eq!(figures.net_salary, Money::rupiah(-75_000));
}

#[tokio::test]
async fn moving_a_kasbon_recalculates_both_salaries() {
    let (engine, _db) = engine_with_db().await;
    let first = new_salary(&engine).await;
    let second = new_salary(&engine).await;
    let kasbon = engine
        .create_kasbon(KasbonCmd::new(first.id, day(3), Money::rupiah(40_000)))
        .await
        .unwrap();

    engine
        .update_kasbon(kasbon.id, KasbonCmd::new(second.id, day(3), Money::rupiah(45_000)))
        .await
        .unwrap();

    assert_eq!(stored_figures(&engine, first.id).await.loan, Money::ZERO);
    assert_eq!(
        stored_figures(&engine, second.id).await.loan,
        Money::rupiah(45_000)
    );
}

#[tokio::test]
async fn updating_detail_recalculates() {
    let (engine, _db) = engine_with_db().await;
    let salary = new_salary(&engine).await;
    let detail = engine
        .create_salary_detail(SalaryDetailCmd::new(salary.id, day(6), 8, Money::rupiah(50_000)))
        .await
        .unwrap();

    engine
        .update_salary_detail(
            detail.id,
            SalaryDetailCmd::new(salary.id, day(6), 6, Money::rupiah(50_000)).note("Hujan"),
        )
        .await
        .unwrap();

    assert_eq!(
        stored_figures(&engine, salary.id).await.gross_salary,
        Money::rupiah(300_000)
    );
    assert_eq!(engine.salary_detail(detail.id).await.unwrap().note, "Hujan");
}

#[tokio::test]
async fn recalculating_missing_salary_fails() {
    let (engine, _db) = engine_with_db().await;
    let err = engine.recalculate_salary(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::Recalculation(_)));
}

#[tokio::test]
async fn child_of_vanished_salary_cannot_be_deleted_silently() {
    let (engine, db) = engine_with_db().await;
    let salary = new_salary(&engine).await;
    let kasbon = engine
        .create_kasbon(KasbonCmd::new(salary.id, day(3), Money::rupiah(10_000)))
        .await
        .unwrap();

    // Orphan the kasbon behind the engine's back.
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "PRAGMA foreign_keys = OFF".to_string()))
        .await
        .unwrap();
    db.execute(Statement::from_string(backend, "DELETE FROM salaries".to_string()))
        .await
        .unwrap();

    let err = engine.delete_kasbon(kasbon.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Recalculation(_)));
    // The failed recalculation rolled the delete back.
    assert!(engine.kasbon(kasbon.id).await.is_ok());
}

#[tokio::test]
async fn children_require_an_existing_salary() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .create_kasbon(KasbonCmd::new(Uuid::new_v4(), day(3), Money::rupiah(10_000)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn invalid_children_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let salary = new_salary(&engine).await;

    let err = engine
        .create_kasbon(KasbonCmd::new(salary.id, day(3), Money::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .create_salary_detail(SalaryDetailCmd::new(salary.id, day(3), -2, Money::rupiah(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn salary_patch_never_touches_figures() {
    let (engine, _db) = engine_with_db().await;
    let salary = new_salary(&engine).await;
    engine
        .create_salary_detail(SalaryDetailCmd::new(salary.id, day(6), 8, Money::rupiah(50_000)))
        .await
        .unwrap();

    let updated = engine
        .update_salary(
            salary.id,
            SalaryPatch::default()
                .month("Februari 2025".parse().unwrap())
                .status("Paid")
                .documents(vec!["slip-januari.pdf".to_string()]),
        )
        .await
        .unwrap();
    assert_eq!(updated.month.to_string(), "February 2025");
    assert_eq!(updated.status, "Paid");
    assert_eq!(updated.documents, ["slip-januari.pdf"]);
    assert_eq!(updated.gross_salary(), Money::rupiah(400_000));
}

#[tokio::test]
async fn salary_requires_member_and_delete_cascades() {
    let (engine, _db) = engine_with_db().await;
    let month: SalaryMonth = "March 2025".parse().unwrap();
    let err = engine
        .create_salary(Uuid::new_v4(), SalaryNew::new(month))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let salary = new_salary(&engine).await;
    let detail = engine
        .create_salary_detail(SalaryDetailCmd::new(salary.id, day(6), 8, Money::rupiah(50_000)))
        .await
        .unwrap();
    let kasbon = engine
        .create_kasbon(KasbonCmd::new(salary.id, day(7), Money::rupiah(5_000)))
        .await
        .unwrap();

    engine.delete_salary(salary.id).await.unwrap();
    assert!(engine.salary(salary.id).await.is_err());
    assert!(engine.salary_detail(detail.id).await.is_err());
    assert!(engine.kasbon(kasbon.id).await.is_err());
    assert!(
        engine
            .salaries_for_member(salary.member_id)
            .await
            .unwrap()
            .is_empty()
    );
}
