//! Subcommand handlers

use crate::output::{print_json, print_table, JobRow, TalentRow, TicketRow};
use crate::seed;
use crate::settings::Settings;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use opskill_core::application::{HealthService, HealthStatus, MarketplaceService};
use opskill_core::domain::search::DEFAULT_PAGE_SIZE;
use opskill_core::domain::{JobCategory, JobSearch, Page, PayType, TalentSearch, UserId};
use opskill_core::port::{Argon2PasswordHasher, SystemTimeProvider, TimeProvider};
use opskill_infra_sqlite::{
    create_pool, repositories, run_migrations, SqliteHealthCheck, SqlitePool,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Args)]
pub struct JobSearchArgs {
    /// Job category, e.g. "Event Management"
    #[arg(long)]
    pub category: Option<String>,

    /// Case-insensitive substring of the job location
    #[arg(long)]
    pub location: Option<String>,

    /// Minimum pay amount
    #[arg(long)]
    pub min_pay: Option<f64>,

    /// HOURLY, DAILY or FIXED
    #[arg(long)]
    pub pay_type: Option<String>,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: i64,

    #[arg(long, default_value_t = 0)]
    pub offset: i64,
}

impl JobSearchArgs {
    fn into_search(self) -> Result<JobSearch> {
        Ok(JobSearch {
            category: self
                .category
                .as_deref()
                .map(str::parse::<JobCategory>)
                .transpose()?,
            location: self.location,
            min_pay: self.min_pay,
            pay_type: self
                .pay_type
                .as_deref()
                .map(|p| p.to_uppercase().parse::<PayType>())
                .transpose()?,
            page: Page::new(self.limit, self.offset),
        })
    }
}

#[derive(Debug, Args)]
pub struct TalentSearchArgs {
    /// Required skill; repeat or comma-separate for several
    #[arg(long = "skill", value_delimiter = ',')]
    pub skills: Vec<String>,

    /// Case-insensitive substring of "city, state"
    #[arg(long)]
    pub location: Option<String>,

    /// Minimum average review rating
    #[arg(long)]
    pub min_rating: Option<f64>,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: i64,

    #[arg(long, default_value_t = 0)]
    pub offset: i64,
}

impl TalentSearchArgs {
    fn into_search(self) -> TalentSearch {
        TalentSearch {
            skills: self.skills,
            location: self.location,
            min_rating: self.min_rating,
            page: Page::new(self.limit, self.offset),
        }
    }
}

/// Pool plus the services built on it
pub struct App {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
    json: bool,
}

impl App {
    pub async fn connect(settings: &Settings, json: bool) -> Result<Self> {
        info!(database_url = %settings.database_url, "Opening database...");
        let pool = create_pool(&settings.database_url, settings.max_connections)
            .await
            .context("DB pool creation failed")?;
        Ok(Self {
            pool,
            time_provider: Arc::new(SystemTimeProvider),
            json,
        })
    }

    async fn marketplace(&self) -> Result<MarketplaceService> {
        run_migrations(&self.pool).await.context("Migration failed")?;
        Ok(MarketplaceService::new(
            repositories(&self.pool, Arc::clone(&self.time_provider)),
            Arc::new(Argon2PasswordHasher::new()),
        ))
    }

    pub async fn migrate(&self) -> Result<()> {
        let applied = run_migrations(&self.pool).await.context("Migration failed")?;
        if self.json {
            return print_json(&serde_json::json!({ "applied": applied }));
        }
        if applied == 0 {
            println!("{}", "✓ Schema already up to date".green().bold());
        } else {
            println!("{}", format!("✓ Applied {} migration(s)", applied).green().bold());
        }
        Ok(())
    }

    pub async fn health(&self, settings: &Settings) -> Result<()> {
        let service = HealthService::new(
            Arc::new(SqliteHealthCheck::new(self.pool.clone())),
            Arc::clone(&self.time_provider),
            settings.environment.clone(),
        );
        let report = service.report().await;

        if self.json {
            print_json(&report)?;
        } else {
            println!("{}", "OpSkill Health".cyan().bold());
            println!();
            let status = match report.status {
                HealthStatus::Ok => "OK".green(),
                HealthStatus::Error => "ERROR".red(),
            };
            println!("  {} {}", "Status:".bold(), status);
            println!("  {} {}", "Environment:".bold(), report.environment);
            println!("  {} {}", "Timestamp:".bold(), report.timestamp);
            println!("  {} {}", "Uptime:".bold(), report.uptime);
            if let Some(db) = &report.database {
                println!("  {} {} ms", "DB Latency:".bold(), db.latency_ms);
                println!(
                    "  {} {:.2} MB",
                    "DB Size:".bold(),
                    db.db_size_bytes as f64 / (1024.0 * 1024.0)
                );
                println!("  {} {}", "Schema:".bold(), db.schema_version);
                for (table, count) in &db.table_counts {
                    println!("    {} {}", format!("{}:", table).dimmed(), count);
                }
            }
            if let Some(error) = &report.error {
                println!("  {} {}", "Error:".bold(), error);
            }
        }

        if report.status == HealthStatus::Error {
            anyhow::bail!("database health check failed");
        }
        Ok(())
    }

    pub async fn seed(&self, settings: &Settings) -> Result<()> {
        if settings.is_production() {
            anyhow::bail!("Refusing to seed demo data in production");
        }
        let service = self.marketplace().await?;

        match seed::run(&service).await? {
            Some(summary) if self.json => print_json(&summary)?,
            Some(summary) => {
                println!("{}", "✓ Demo data seeded".green().bold());
                println!("  {} {}", "Users:".bold(), summary.users);
                println!("  {} {}", "Jobs:".bold(), summary.jobs);
                println!("  {} {}", "Applications:".bold(), summary.applications);
                println!("  {} {}", "Contracts:".bold(), summary.contracts);
                println!("  {} {}", "Reviews:".bold(), summary.reviews);
                println!("  {} {}", "Tickets:".bold(), summary.tickets);
                println!();
                println!("  Log in as {} / {}", seed::ADMIN_EMAIL, seed::DEMO_PASSWORD);
            }
            None if self.json => print_json(&serde_json::json!({ "seeded": false }))?,
            None => println!("{}", "○ Demo data already present".yellow()),
        }
        Ok(())
    }

    pub async fn search_jobs(&self, args: JobSearchArgs) -> Result<()> {
        let search = args.into_search().context("Invalid job search filter")?;
        let jobs = self.marketplace().await?.search_jobs(&search).await?;

        if self.json {
            return print_json(&jobs);
        }
        if jobs.is_empty() {
            println!("{}", "No open jobs match".yellow());
        } else {
            println!("{}", print_table::<_, JobRow>(&jobs));
        }
        Ok(())
    }

    pub async fn search_talents(&self, args: TalentSearchArgs) -> Result<()> {
        let talents = self
            .marketplace()
            .await?
            .search_talents(&args.into_search())
            .await?;

        if self.json {
            return print_json(&talents);
        }
        if talents.is_empty() {
            println!("{}", "No talents match".yellow());
        } else {
            println!("{}", print_table::<_, TalentRow>(&talents));
        }
        Ok(())
    }

    pub async fn list_tickets(&self, user: Option<UserId>) -> Result<()> {
        let tickets = self.marketplace().await?.list_tickets(user).await?;

        if self.json {
            return print_json(&tickets);
        }
        if tickets.is_empty() {
            println!("{}", "No tickets".yellow());
        } else {
            println!("{}", print_table::<_, TicketRow>(&tickets));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_args() -> JobSearchArgs {
        JobSearchArgs {
            category: None,
            location: None,
            min_pay: None,
            pay_type: None,
            limit: 500,
            offset: 0,
        }
    }

    #[test]
    fn test_job_args_parse_filters() {
        let search = JobSearchArgs {
            category: Some("Photography".to_string()),
            pay_type: Some("daily".to_string()),
            ..job_args()
        }
        .into_search()
        .unwrap();
        assert_eq!(search.category, Some(JobCategory::Photography));
        assert_eq!(search.pay_type, Some(PayType::Daily));
        assert_eq!(search.page.limit, 100);
    }

    #[test]
    fn test_job_args_reject_unknown_category() {
        let err = JobSearchArgs {
            category: Some("Plumbing".to_string()),
            ..job_args()
        }
        .into_search()
        .unwrap_err();
        assert!(err.to_string().contains("Invalid option"));
    }
}
