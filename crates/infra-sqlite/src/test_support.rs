// Fixtures shared by the adapter tests

use crate::{create_pool, run_migrations, SqliteContractRepository, SqliteJobRepository, SqliteUserRepository};
use chrono::{TimeZone, Utc};
use opskill_core::domain::{
    ContractStatus, JobCategory, JobStatus, NewContract, NewJob, NewUser, PayType, PaymentStatus,
    UserId, UserRole,
};
use opskill_core::port::{ContractRepository, FixedTimeProvider, JobRepository, UserRepository};
use sqlx::SqlitePool;
use std::sync::Arc;

pub(crate) async fn setup_test_db() -> SqlitePool {
    let pool = create_pool("sqlite::memory:", 1).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub(crate) fn new_talent(email: &str, name: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: "$argon2id$test".to_string(),
        name: name.to_string(),
        role: UserRole::Talent,
        phone: None,
        address: None,
        city: None,
        state: None,
        pincode: None,
        profile_photo: None,
        aadhaar_number: None,
        gst_number: None,
        skills: vec!["Catering".to_string(), "Hospitality".to_string()],
        bio: None,
        experience_years: Some(2),
        hourly_rate: Some(300),
    }
}

async fn insert_user(pool: &SqlitePool, user: NewUser) -> UserId {
    SqliteUserRepository::new(pool.clone(), Arc::new(FixedTimeProvider(1)))
        .insert(&user)
        .await
        .unwrap()
        .id
}

pub(crate) async fn insert_talent(pool: &SqlitePool, email: &str) -> UserId {
    insert_user(pool, new_talent(email, "Talent")).await
}

pub(crate) async fn insert_company(pool: &SqlitePool, email: &str) -> UserId {
    let mut company = new_talent(email, "Acme Events");
    company.role = UserRole::Company;
    company.skills = Vec::new();
    insert_user(pool, company).await
}

pub(crate) fn new_job(company_id: UserId, title: &str) -> NewJob {
    NewJob {
        company_id,
        title: title.to_string(),
        description: "Serve guests at a three day corporate event".to_string(),
        category: JobCategory::Hospitality,
        location: "Mumbai, Maharashtra".to_string(),
        pay_type: PayType::Fixed,
        pay_amount: 2_500.0,
        start_date: None,
        end_date: None,
        status: JobStatus::Open,
    }
}

pub(crate) async fn insert_job(pool: &SqlitePool, company_id: UserId) -> i64 {
    SqliteJobRepository::new(pool.clone(), Arc::new(FixedTimeProvider(2)))
        .insert(&new_job(company_id, "Banquet staff"))
        .await
        .unwrap()
        .id
}

pub(crate) fn new_contract(
    job_id: i64,
    talent_id: UserId,
    company_id: UserId,
    total_amount: f64,
) -> NewContract {
    NewContract {
        job_id,
        talent_id,
        company_id,
        status: ContractStatus::Active,
        payment_status: PaymentStatus::Pending,
        total_amount,
        amount_paid: 0.0,
        start_date: Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap(),
        end_date: Some(Utc.with_ymd_and_hms(2025, 1, 12, 0, 0, 0).unwrap()),
        terms: None,
    }
}

pub(crate) async fn insert_contract_row(
    pool: &SqlitePool,
    job_id: i64,
    talent_id: UserId,
    company_id: UserId,
) -> i64 {
    SqliteContractRepository::new(pool.clone(), Arc::new(FixedTimeProvider(3)))
        .insert(&new_contract(job_id, talent_id, company_id, 1_000.0))
        .await
        .unwrap()
        .id
}
