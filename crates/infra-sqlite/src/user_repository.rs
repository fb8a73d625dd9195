// SQLite UserRepository Implementation

use crate::error::{escape_like, map_sqlx_error};
use async_trait::async_trait;
use opskill_core::domain::user::normalize_email;
use opskill_core::domain::{NewUser, Page, TalentSearch, TalentSummary, User, UserId, UserRole, UserUpdate};
use opskill_core::error::{AppError, Result};
use opskill_core::port::{TimeProvider, UserRepository};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;

pub struct SqliteUserRepository {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User> {
        let now = self.time_provider.now_millis();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (
                email, password_hash, name, role,
                phone, address, city, state, pincode, profile_photo,
                aadhaar_number, gst_number,
                skills, bio, experience_years, hourly_rate,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(normalize_email(&user.email))
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(&user.phone)
        .bind(&user.address)
        .bind(&user.city)
        .bind(&user.state)
        .bind(&user.pincode)
        .bind(&user.profile_photo)
        .bind(&user.aadhaar_number)
        .bind(&user.gst_number)
        .bind(join_skills(&user.skills))
        .bind(&user.bio)
        .bind(user.experience_years)
        .bind(user.hourly_rate)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("User {} vanished after insert", id)))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update(&self, id: UserId, update: &UserUpdate) -> Result<User> {
        let now = self.time_provider.now_millis();

        // Absent fields bind NULL and COALESCE keeps the stored value
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?, name),
                phone = COALESCE(?, phone),
                address = COALESCE(?, address),
                city = COALESCE(?, city),
                state = COALESCE(?, state),
                pincode = COALESCE(?, pincode),
                profile_photo = COALESCE(?, profile_photo),
                aadhaar_number = COALESCE(?, aadhaar_number),
                aadhaar_verified = COALESCE(?, aadhaar_verified),
                gst_number = COALESCE(?, gst_number),
                gst_verified = COALESCE(?, gst_verified),
                skills = COALESCE(?, skills),
                bio = COALESCE(?, bio),
                experience_years = COALESCE(?, experience_years),
                hourly_rate = COALESCE(?, hourly_rate),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.phone)
        .bind(&update.address)
        .bind(&update.city)
        .bind(&update.state)
        .bind(&update.pincode)
        .bind(&update.profile_photo)
        .bind(&update.aadhaar_number)
        .bind(update.aadhaar_verified.map(i64::from))
        .bind(&update.gst_number)
        .bind(update.gst_verified.map(i64::from))
        .bind(update.skills.as_deref().map(join_skills))
        .bind(&update.bio)
        .bind(update.experience_years)
        .bind(update.hourly_rate)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User", id));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    async fn set_banned(&self, id: UserId, banned: bool) -> Result<()> {
        let result = sqlx::query("UPDATE users SET is_banned = ?, updated_at = ? WHERE id = ?")
            .bind(i64::from(banned))
            .bind(self.time_provider.now_millis())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User", id));
        }
        Ok(())
    }

    async fn search_talents(&self, search: &TalentSearch) -> Result<Vec<TalentSummary>> {
        let page = Page::new(search.page.limit, search.page.offset);

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT * FROM (
                SELECT u.id, u.name, u.profile_photo, u.city, u.state,
                       u.aadhaar_verified, u.skills, u.created_at,
                       COALESCE(
                           (SELECT AVG(r.rating) FROM reviews r WHERE r.reviewee_id = u.id),
                           0.0
                       ) AS rating,
                       (SELECT COUNT(DISTINCT c.id) FROM contracts c
                        WHERE c.talent_id = u.id AND c.status = 'COMPLETED') AS jobs_completed
                FROM users u
                WHERE u.role = "#,
        );
        query.push_bind(UserRole::Talent.as_str());
        query.push(" AND u.is_banned = 0");

        if let Some(pattern) = search.location_pattern() {
            query.push(
                " AND LOWER(COALESCE(u.city, '') || ', ' || COALESCE(u.state, '')) LIKE ",
            );
            query.push_bind(pattern);
            query.push(" ESCAPE '\\'");
        }

        // Whole-entry match against the comma separated skills column
        for needle in search.skill_needles() {
            query.push(" AND (',' || LOWER(u.skills) || ',') LIKE ");
            query.push_bind(format!("%,{},%", escape_like(&needle)));
            query.push(" ESCAPE '\\'");
        }

        query.push(") AS t");
        if let Some(min_rating) = search.min_rating {
            query.push(" WHERE t.rating >= ");
            query.push_bind(min_rating);
        }

        query.push(" ORDER BY t.created_at ASC, t.id ASC LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset);

        let rows = query
            .build_query_as::<TalentSummaryRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TalentSummaryRow::into_summary).collect())
    }
}

pub(crate) fn join_skills(skills: &[String]) -> String {
    skills.join(",")
}

pub(crate) fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    profile_photo: Option<String>,
    aadhaar_number: Option<String>,
    aadhaar_verified: i64, // SQLite boolean as integer
    gst_number: Option<String>,
    gst_verified: i64,
    is_banned: i64,
    skills: String,
    bio: Option<String>,
    experience_years: Option<i64>,
    hourly_rate: Option<i64>,
    rating: Option<f64>,
    jobs_completed: i64,
    created_at: i64,
    updated_at: i64,
}

impl UserRow {
    fn into_user(self) -> Result<User> {
        Ok(User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            name: self.name,
            role: self.role.parse()?,
            phone: self.phone,
            address: self.address,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            profile_photo: self.profile_photo,
            aadhaar_number: self.aadhaar_number,
            aadhaar_verified: self.aadhaar_verified != 0,
            gst_number: self.gst_number,
            gst_verified: self.gst_verified != 0,
            is_banned: self.is_banned != 0,
            skills: split_skills(&self.skills),
            bio: self.bio,
            experience_years: self.experience_years,
            hourly_rate: self.hourly_rate,
            rating: self.rating,
            jobs_completed: self.jobs_completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TalentSummaryRow {
    id: i64,
    name: String,
    profile_photo: Option<String>,
    city: Option<String>,
    state: Option<String>,
    aadhaar_verified: i64,
    skills: String,
    rating: f64,
    jobs_completed: i64,
}

impl TalentSummaryRow {
    fn into_summary(self) -> TalentSummary {
        TalentSummary {
            id: self.id,
            name: self.name,
            profile_photo: self.profile_photo,
            city: self.city,
            state: self.state,
            aadhaar_verified: self.aadhaar_verified != 0,
            skills: split_skills(&self.skills),
            rating: self.rating,
            jobs_completed: self.jobs_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_talent, setup_test_db};
    use opskill_core::port::FixedTimeProvider;

    fn repo(pool: SqlitePool) -> SqliteUserRepository {
        SqliteUserRepository::new(pool, Arc::new(FixedTimeProvider(1_000)))
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let pool = setup_test_db().await;
        let repo = repo(pool);

        let user = repo.insert(&new_talent("ravi@example.com", "Ravi")).await.unwrap();
        assert_eq!(user.role, UserRole::Talent);
        assert_eq!(user.skills, vec!["Catering".to_string(), "Hospitality".to_string()]);
        assert_eq!(user.created_at, 1_000);
        assert!(!user.is_banned);

        let by_email = repo.find_by_email("  RAVI@example.com ").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
        assert!(repo.find_by_id(user.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = setup_test_db().await;
        let repo = repo(pool);

        repo.insert(&new_talent("dup@example.com", "One")).await.unwrap();
        let err = repo
            .insert(&new_talent("dup@example.com", "Two"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("Email")));
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let pool = setup_test_db().await;
        let repo = repo(pool);
        let user = repo.insert(&new_talent("asha@example.com", "Asha")).await.unwrap();

        let update = UserUpdate {
            city: Some("Pune".to_string()),
            aadhaar_verified: Some(true),
            skills: Some(vec!["Security".to_string()]),
            ..Default::default()
        };
        let updated = repo.update(user.id, &update).await.unwrap();
        assert_eq!(updated.name, "Asha");
        assert_eq!(updated.city.as_deref(), Some("Pune"));
        assert!(updated.aadhaar_verified);
        assert_eq!(updated.skills, vec!["Security".to_string()]);

        let missing = repo.update(9_999, &update).await.unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_talents_filters() {
        let pool = setup_test_db().await;
        let repo = repo(pool);

        let mut mumbai = new_talent("a@example.com", "A");
        mumbai.city = Some("Mumbai".to_string());
        mumbai.state = Some("Maharashtra".to_string());
        let a = repo.insert(&mumbai).await.unwrap();

        let mut delhi = new_talent("b@example.com", "B");
        delhi.city = Some("New Delhi".to_string());
        delhi.state = Some("Delhi".to_string());
        delhi.skills = vec!["Photography".to_string()];
        let b = repo.insert(&delhi).await.unwrap();

        let banned = repo.insert(&new_talent("c@example.com", "C")).await.unwrap();
        repo.set_banned(banned.id, true).await.unwrap();

        let all = repo.search_talents(&TalentSearch::default()).await.unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![a.id, b.id]);
        assert!(all.iter().all(|t| t.rating == 0.0 && t.jobs_completed == 0));

        let by_state = repo
            .search_talents(&TalentSearch {
                location: Some("maharashtra".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_state.len(), 1);
        assert_eq!(by_state[0].id, a.id);

        let by_skills = repo
            .search_talents(&TalentSearch {
                skills: vec!["CATERING".to_string(), "hospitality".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_skills.len(), 1);
        assert_eq!(by_skills[0].id, a.id);

        // Partial skill names do not match
        let partial = repo
            .search_talents(&TalentSearch {
                skills: vec!["Photo".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(partial.is_empty());

        let rated = repo
            .search_talents(&TalentSearch {
                min_rating: Some(1.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(rated.is_empty());
    }

    #[test]
    fn test_split_skills() {
        assert_eq!(split_skills(""), Vec::<String>::new());
        assert_eq!(split_skills("A, B,,C"), vec!["A", "B", "C"]);
    }
}
