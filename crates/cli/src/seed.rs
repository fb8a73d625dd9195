//! Deterministic demo data, created through the marketplace use cases

use anyhow::{Context, Result};
use opskill_core::application::MarketplaceService;
use opskill_core::domain::{
    ApplicationDraft, ContractTerms, JobDraft, ReviewDraft, TicketDraft, User, UserDraft, UserId,
};
use serde::Serialize;
use tracing::info;

pub const ADMIN_EMAIL: &str = "admin@opskill.dev";
pub const DEMO_PASSWORD: &str = "Demo@1234";

struct Talent {
    email: &'static str,
    name: &'static str,
    city: &'static str,
    state: &'static str,
    skills: &'static [&'static str],
    experience_years: i64,
    hourly_rate: i64,
}

const TALENTS: &[Talent] = &[
    Talent {
        email: "priya.sharma@opskill.dev",
        name: "Priya Sharma",
        city: "Mumbai",
        state: "Maharashtra",
        skills: &["Event Management", "Hospitality"],
        experience_years: 5,
        hourly_rate: 450,
    },
    Talent {
        email: "arjun.mehta@opskill.dev",
        name: "Arjun Mehta",
        city: "Bengaluru",
        state: "Karnataka",
        skills: &["Photography"],
        experience_years: 3,
        hourly_rate: 800,
    },
    Talent {
        email: "kavya.nair@opskill.dev",
        name: "Kavya Nair",
        city: "Kochi",
        state: "Kerala",
        skills: &["Catering", "Hospitality"],
        experience_years: 4,
        hourly_rate: 350,
    },
    Talent {
        email: "rohan.das@opskill.dev",
        name: "Rohan Das",
        city: "Kolkata",
        state: "West Bengal",
        skills: &["Security"],
        experience_years: 6,
        hourly_rate: 300,
    },
];

// (email, name, city, state, gst)
const COMPANIES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "events@stellar.dev",
        "Stellar Events Pvt Ltd",
        "Mumbai",
        "Maharashtra",
        "27AAPFU0939F1ZV",
    ),
    (
        "hr@grandstay.dev",
        "Grand Stay Hotels",
        "Bengaluru",
        "Karnataka",
        "29AAGCR4375J1ZU",
    ),
];

// (company index, title, category, location, pay type, amount)
const JOBS: &[(usize, &str, &str, &str, &str, f64)] = &[
    (0, "Wedding Event Coordinator", "Event Management", "Mumbai, Maharashtra", "DAILY", 3_500.0),
    (0, "Event Photographer", "Photography", "Mumbai, Maharashtra", "FIXED", 15_000.0),
    (1, "Banquet Service Staff", "Hospitality", "Bengaluru, Karnataka", "HOURLY", 250.0),
    (1, "Night Security Guard", "Security", "Bengaluru, Karnataka", "DAILY", 1_200.0),
];

// (talent index, job index)
const APPLICATIONS: &[(usize, usize)] = &[(0, 0), (1, 1), (2, 2), (3, 3), (2, 0)];

#[derive(Debug, Default, Serialize)]
pub struct SeedSummary {
    pub users: usize,
    pub jobs: usize,
    pub applications: usize,
    pub contracts: usize,
    pub reviews: usize,
    pub tickets: usize,
}

/// Populate an empty database; returns None when the demo admin already exists
pub async fn run(service: &MarketplaceService) -> Result<Option<SeedSummary>> {
    if service
        .repositories()
        .users
        .find_by_email(ADMIN_EMAIL)
        .await?
        .is_some()
    {
        info!("Demo data already present, skipping seed");
        return Ok(None);
    }

    let mut summary = SeedSummary::default();

    service
        .register_user(UserDraft::new(ADMIN_EMAIL, DEMO_PASSWORD, "OpSkill Admin").with_role("ADMIN"))
        .await
        .context("Failed to create admin")?;
    summary.users += 1;

    let mut companies: Vec<User> = Vec::with_capacity(COMPANIES.len());
    for (email, name, city, state, gst) in COMPANIES {
        let mut draft = UserDraft::new(*email, DEMO_PASSWORD, *name).with_role("COMPANY");
        draft.city = Some(city.to_string());
        draft.state = Some(state.to_string());
        draft.gst_number = Some(gst.to_string());
        companies.push(
            service
                .register_user(draft)
                .await
                .with_context(|| format!("Failed to create company {}", email))?,
        );
        summary.users += 1;
    }

    let mut talents: Vec<User> = Vec::with_capacity(TALENTS.len());
    for talent in TALENTS {
        let mut draft =
            UserDraft::new(talent.email, DEMO_PASSWORD, talent.name).with_role("TALENT");
        draft.city = Some(talent.city.to_string());
        draft.state = Some(talent.state.to_string());
        draft.skills = talent.skills.iter().map(|s| s.to_string()).collect();
        draft.experience_years = Some(talent.experience_years);
        draft.hourly_rate = Some(talent.hourly_rate);
        talents.push(
            service
                .register_user(draft)
                .await
                .with_context(|| format!("Failed to create talent {}", talent.email))?,
        );
        summary.users += 1;
    }

    let mut jobs = Vec::with_capacity(JOBS.len());
    for (company, title, category, location, pay_type, amount) in JOBS {
        let draft = JobDraft {
            company_id: companies[*company].id,
            title: title.to_string(),
            description: format!("{} needed for an upcoming engagement. Prior experience preferred.", title),
            category: category.to_string(),
            location: location.to_string(),
            pay_type: Some(pay_type.to_string()),
            pay_amount: *amount,
            status: None,
            start_date: Some("2025-03-01T09:00:00Z".to_string()),
            end_date: Some("2025-03-03T09:00:00Z".to_string()),
        };
        jobs.push(
            service
                .post_job(draft)
                .await
                .with_context(|| format!("Failed to post job {:?}", title))?,
        );
        summary.jobs += 1;
    }

    let mut applications = Vec::with_capacity(APPLICATIONS.len());
    for (talent, job) in APPLICATIONS {
        let mut draft = ApplicationDraft::new(jobs[*job].id, talents[*talent].id);
        draft.cover_letter = Some(format!(
            "{} has {} years of relevant experience.",
            talents[*talent].name, TALENTS[*talent].experience_years
        ));
        draft.estimated_days = Some(3);
        applications.push(service.apply(draft).await.context("Failed to apply")?);
        summary.applications += 1;
    }

    // One finished engagement so ratings and completion counts are non-zero
    let photographer = &applications[1];
    let contract = service
        .hire(
            photographer.id,
            ContractTerms {
                total_amount: 15_000.0,
                start_date: "2025-03-01T09:00:00Z".to_string(),
                end_date: Some("2025-03-02T09:00:00Z".to_string()),
                terms: Some("Full-day coverage with edited photos delivered in a week".to_string()),
            },
        )
        .await
        .context("Failed to hire photographer")?;
    summary.contracts += 1;

    service.record_payment(contract.id, 15_000.0).await?;
    let contract = service.complete_contract(contract.id).await?;

    for (reviewer, reviewee, rating, comment) in [
        (contract.company_id, contract.talent_id, 5, "Outstanding work, delivered early"),
        (contract.talent_id, contract.company_id, 4, "Well organised event"),
    ] {
        leave_review(service, contract.id, reviewer, reviewee, rating, comment).await?;
        summary.reviews += 1;
    }

    service
        .open_ticket(TicketDraft {
            user_id: talents[2].id,
            subject: "Unable to update profile photo".to_string(),
            description: "Uploading a photo from the mobile app fails silently.".to_string(),
            status: None,
            priority: Some("LOW".to_string()),
        })
        .await?;
    summary.tickets += 1;

    info!(
        users = summary.users,
        jobs = summary.jobs,
        applications = summary.applications,
        "Demo data seeded"
    );
    Ok(Some(summary))
}

async fn leave_review(
    service: &MarketplaceService,
    contract_id: i64,
    reviewer_id: UserId,
    reviewee_id: UserId,
    rating: i64,
    comment: &str,
) -> Result<()> {
    service
        .leave_review(ReviewDraft {
            contract_id,
            reviewer_id,
            reviewee_id,
            rating,
            comment: Some(comment.to_string()),
        })
        .await
        .context("Failed to leave review")?;
    Ok(())
}
