//! End-to-end hiring workflow over a real SQLite database
//!
//! Registration through review, plus the guard rails that keep each step honest.

use std::sync::Arc;

use opskill_core::application::MarketplaceService;
use opskill_core::domain::{
    Application, ApplicationDraft, ApplicationStatus, Contract, ContractStatus, ContractTerms,
    Job, JobDraft, JobStatus, PaymentStatus, ReviewDraft, User, UserDraft, UserUpdate,
};
use opskill_core::error::AppError;
use opskill_core::port::{
    ApplicationRepository, Argon2PasswordHasher, ContractRepository, JobRepository,
    SystemTimeProvider, UserRepository,
};
use opskill_infra_sqlite::{create_pool, repositories, run_migrations, SqlitePool};

const PASSWORD: &str = "Test@1234";

async fn setup() -> (SqlitePool, MarketplaceService) {
    let pool = create_pool("sqlite::memory:", 1).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let repos = repositories(&pool, Arc::new(SystemTimeProvider));
    let service = MarketplaceService::new(repos, Arc::new(Argon2PasswordHasher::new()));
    (pool, service)
}

async fn register(service: &MarketplaceService, email: &str, role: &str) -> User {
    let draft = UserDraft {
        city: Some("Mumbai".to_string()),
        state: Some("Maharashtra".to_string()),
        skills: vec!["Photography".to_string(), "Editing".to_string()],
        ..UserDraft::new(email, PASSWORD, "Test User").with_role(role)
    };
    service.register_user(draft).await.unwrap()
}

async fn post_job(service: &MarketplaceService, company: &User) -> Job {
    service
        .post_job(JobDraft {
            company_id: company.id,
            title: "Wedding photographer".to_string(),
            description: "Cover a two-day wedding in Bandra".to_string(),
            category: "Photography".to_string(),
            location: "Mumbai, Maharashtra".to_string(),
            pay_amount: 15000.0,
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn apply(service: &MarketplaceService, job: &Job, talent: &User) -> Application {
    service
        .apply(ApplicationDraft {
            cover_letter: Some("Ten years behind the lens".to_string()),
            proposed_rate: Some(15000.0),
            ..ApplicationDraft::new(job.id, talent.id)
        })
        .await
        .unwrap()
}

fn terms(total_amount: f64) -> ContractTerms {
    ContractTerms {
        total_amount,
        start_date: "2024-06-01T09:00:00Z".to_string(),
        end_date: Some("2024-06-03T09:00:00Z".to_string()),
        terms: Some("Raw files delivered within a week".to_string()),
    }
}

/// Company, talent, job, application and an ACTIVE contract
async fn hired(service: &MarketplaceService) -> (User, User, Job, Contract) {
    let company = register(service, "company@example.com", "COMPANY").await;
    let talent = register(service, "talent@example.com", "TALENT").await;
    let job = post_job(service, &company).await;
    let application = apply(service, &job, &talent).await;
    let contract = service.hire(application.id, terms(15000.0)).await.unwrap();
    (company, talent, job, contract)
}

#[tokio::test]
async fn test_full_hiring_workflow() {
    let (_pool, service) = setup().await;
    let (company, talent, job, contract) = hired(&service).await;
    let repos = service.repositories();

    assert_eq!(contract.status, ContractStatus::Active);
    assert_eq!(contract.payment_status, PaymentStatus::Pending);
    assert_eq!(contract.company_id, company.id);
    assert_eq!(contract.talent_id, talent.id);

    let job_now = repos.jobs.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(job_now.status, JobStatus::InProgress);
    let applications = repos.applications.find_by_job(job.id).await.unwrap();
    assert_eq!(applications[0].status, ApplicationStatus::Hired);

    let partial = service.record_payment(contract.id, 5000.0).await.unwrap();
    assert_eq!(partial.payment_status, PaymentStatus::PartiallyPaid);
    let paid = service.record_payment(contract.id, 10000.0).await.unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.amount_paid, 15000.0);

    let completed = service.complete_contract(contract.id).await.unwrap();
    assert_eq!(completed.status, ContractStatus::Completed);
    let job_now = repos.jobs.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(job_now.status, JobStatus::Completed);

    service
        .leave_review(ReviewDraft {
            contract_id: contract.id,
            reviewer_id: company.id,
            reviewee_id: talent.id,
            rating: 5,
            comment: Some("Stunning shots".to_string()),
        })
        .await
        .unwrap();
    service
        .leave_review(ReviewDraft {
            contract_id: contract.id,
            reviewer_id: talent.id,
            reviewee_id: company.id,
            rating: 4,
            comment: None,
        })
        .await
        .unwrap();

    let talent_now = repos.users.find_by_id(talent.id).await.unwrap().unwrap();
    assert_eq!(talent_now.jobs_completed, 1);
    assert_eq!(talent_now.rating, Some(5.0));
    let company_now = repos.users.find_by_id(company.id).await.unwrap().unwrap();
    assert_eq!(company_now.rating, Some(4.0));
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let (_pool, service) = setup().await;
    register(&service, "dup@example.com", "TALENT").await;

    let again = UserDraft::new("  DUP@Example.com ", PASSWORD, "Someone Else");
    let err = service.register_user(again).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_invalid_registration_reports_every_field() {
    let (_pool, service) = setup().await;
    let draft = UserDraft {
        phone: Some("call me maybe".to_string()),
        ..UserDraft::new("not-an-email", "short", "A")
    };

    let err = service.register_user(draft).await.unwrap_err();
    let issues = err.validation_errors().expect("validation failure");
    for field in ["email", "password", "name", "phone"] {
        assert!(issues.has(field), "missing issue for {}", field);
    }
}

#[tokio::test]
async fn test_verify_credentials() {
    let (_pool, service) = setup().await;
    let user = register(&service, "login@example.com", "TALENT").await;

    let found = service
        .verify_credentials("Login@Example.com", PASSWORD)
        .await
        .unwrap();
    assert_eq!(found.id, user.id);
    assert_ne!(found.password_hash, PASSWORD);

    let wrong = service
        .verify_credentials("login@example.com", "Wrong@1234")
        .await
        .unwrap_err();
    let unknown = service
        .verify_credentials("nobody@example.com", PASSWORD)
        .await
        .unwrap_err();
    // Same message either way so emails cannot be enumerated
    assert_eq!(wrong.to_string(), unknown.to_string());

    service.set_banned(user.id, true).await.unwrap();
    let banned = service
        .verify_credentials("login@example.com", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(banned, AppError::Forbidden(msg) if msg.contains("banned")));
}

#[tokio::test]
async fn test_update_profile() {
    let (_pool, service) = setup().await;
    let user = register(&service, "profile@example.com", "TALENT").await;

    let updated = service
        .update_profile(
            user.id,
            UserUpdate {
                bio: Some("Event photographer".to_string()),
                hourly_rate: Some(800),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("Event photographer"));
    assert_eq!(updated.hourly_rate, Some(800));
    assert_eq!(updated.name, user.name);

    let unchanged = service
        .update_profile(user.id, UserUpdate::default())
        .await
        .unwrap();
    assert_eq!(unchanged.hourly_rate, Some(800));

    let missing = service
        .update_profile(9999, UserUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_roles_and_bans_are_enforced() {
    let (_pool, service) = setup().await;
    let company = register(&service, "company@example.com", "COMPANY").await;
    let talent = register(&service, "talent@example.com", "TALENT").await;

    // A talent cannot post jobs
    let err = service
        .post_job(JobDraft {
            company_id: talent.id,
            title: "Not allowed here".to_string(),
            description: "Talents do not post jobs".to_string(),
            category: "Catering".to_string(),
            location: "Pune".to_string(),
            pay_amount: 100.0,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let job = post_job(&service, &company).await;

    // A company cannot apply
    let err = service
        .apply(ApplicationDraft::new(job.id, company.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    service.set_banned(talent.id, true).await.unwrap();
    let err = service
        .apply(ApplicationDraft::new(job.id, talent.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    service.set_banned(company.id, true).await.unwrap();
    let err = service
        .post_job(JobDraft {
            company_id: company.id,
            title: "Banned company job".to_string(),
            description: "Should never be stored".to_string(),
            category: "Security".to_string(),
            location: "Pune".to_string(),
            pay_amount: 100.0,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_duplicate_application_is_conflict() {
    let (_pool, service) = setup().await;
    let company = register(&service, "company@example.com", "COMPANY").await;
    let talent = register(&service, "talent@example.com", "TALENT").await;
    let job = post_job(&service, &company).await;
    apply(&service, &job, &talent).await;

    let err = service
        .apply(ApplicationDraft::new(job.id, talent.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_closed_job_rejects_applications_and_hires() {
    let (_pool, service) = setup().await;
    let (_company, _talent, job, _contract) = hired(&service).await;
    let latecomer = register(&service, "late@example.com", "TALENT").await;

    let err = service
        .apply(ApplicationDraft::new(job.id, latecomer.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn test_hire_requires_hireable_application() {
    let (_pool, service) = setup().await;
    let company = register(&service, "company@example.com", "COMPANY").await;
    let talent = register(&service, "talent@example.com", "TALENT").await;
    let job = post_job(&service, &company).await;
    let application = apply(&service, &job, &talent).await;

    let rejected = service
        .review_application(application.id, ApplicationStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(rejected.status, ApplicationStatus::Rejected);

    let err = service
        .hire(application.id, terms(15000.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let err = service
        .review_application(application.id, ApplicationStatus::Hired)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let err = service.hire(424242, terms(15000.0)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_shortlisted_application_can_be_hired() {
    let (_pool, service) = setup().await;
    let company = register(&service, "company@example.com", "COMPANY").await;
    let talent = register(&service, "talent@example.com", "TALENT").await;
    let job = post_job(&service, &company).await;
    let application = apply(&service, &job, &talent).await;

    service
        .review_application(application.id, ApplicationStatus::Shortlisted)
        .await
        .unwrap();
    let contract = service.hire(application.id, terms(12000.0)).await.unwrap();
    assert_eq!(contract.total_amount, 12000.0);
}

#[tokio::test]
async fn test_invalid_terms_roll_back_the_hire() {
    let (pool, service) = setup().await;
    let company = register(&service, "company@example.com", "COMPANY").await;
    let talent = register(&service, "talent@example.com", "TALENT").await;
    let job = post_job(&service, &company).await;
    let application = apply(&service, &job, &talent).await;

    let bad_terms = ContractTerms {
        total_amount: 1000.0,
        start_date: "2024-06-10T09:00:00Z".to_string(),
        end_date: Some("2024-06-01T09:00:00Z".to_string()),
        terms: None,
    };
    let err = service.hire(application.id, bad_terms).await.unwrap_err();
    assert!(err.validation_errors().is_some(), "got {:?}", err);

    let repos = service.repositories();
    let job_now = repos.jobs.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(job_now.status, JobStatus::Open);
    let application_now = repos
        .applications
        .find_by_id(application.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(application_now.status, ApplicationStatus::Pending);

    let contracts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contracts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(contracts, 0);
}

#[tokio::test]
async fn test_payment_rules() {
    let (_pool, service) = setup().await;
    let (_company, _talent, _job, contract) = hired(&service).await;

    let err = service
        .record_payment(contract.id, 20000.0)
        .await
        .unwrap_err();
    assert!(err.validation_errors().is_some(), "got {:?}", err);

    let err = service.record_payment(contract.id, 0.0).await.unwrap_err();
    assert!(err.validation_errors().is_some());

    let unchanged = service
        .repositories()
        .contracts
        .find_by_id(contract.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.amount_paid, 0.0);

    service.terminate_contract(contract.id).await.unwrap();
    let err = service
        .record_payment(contract.id, 100.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn test_terminated_contract_cannot_complete() {
    let (_pool, service) = setup().await;
    let (_company, talent, _job, contract) = hired(&service).await;

    let terminated = service.terminate_contract(contract.id).await.unwrap();
    assert_eq!(terminated.status, ContractStatus::Terminated);

    let err = service.complete_contract(contract.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    let err = service.terminate_contract(contract.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let talent_now = service
        .repositories()
        .users
        .find_by_id(talent.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(talent_now.jobs_completed, 0);
}

#[tokio::test]
async fn test_review_rules() {
    let (_pool, service) = setup().await;
    let (company, talent, _job, contract) = hired(&service).await;
    let outsider = register(&service, "outsider@example.com", "TALENT").await;

    let review = |reviewer_id, reviewee_id| ReviewDraft {
        contract_id: contract.id,
        reviewer_id,
        reviewee_id,
        rating: 4,
        comment: None,
    };

    // Still ACTIVE
    let err = service
        .leave_review(review(company.id, talent.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    service.complete_contract(contract.id).await.unwrap();

    let err = service
        .leave_review(review(outsider.id, talent.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = service
        .leave_review(review(company.id, company.id))
        .await
        .unwrap_err();
    assert!(err.validation_errors().is_some());

    service
        .leave_review(review(company.id, talent.id))
        .await
        .unwrap();
    let err = service
        .leave_review(review(company.id, talent.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = service
        .leave_review(ReviewDraft {
            rating: 6,
            ..review(talent.id, company.id)
        })
        .await
        .unwrap_err();
    assert!(err.validation_errors().is_some());
}
