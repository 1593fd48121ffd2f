/// User persistence operations
///
/// The credential store. Email uniqueness is enforced by the `UNIQUE`
/// constraint on `users.email`, so concurrent registrations of the same
/// address produce exactly one row and one `DuplicateKey` error.
use super::{unix_now, Result, StoreError};
use sdk::types::{normalize_email, NewUser, UserProfile};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const USER_COLUMNS: &str = "id, name, email, password_hash, grade, interests, goals, created_at";

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user unless the email is already registered
    pub async fn create_user(&self, user: &NewUser) -> Result<UserProfile> {
        let id = uuid::Uuid::new_v4().to_string();
        let email = normalize_email(&user.email);
        let interests = serde_json::to_string(&user.interests)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let now = unix_now();

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, grade, interests, goals, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&user.name)
        .bind(&email)
        .bind(&user.password_hash)
        .bind(&user.grade)
        .bind(&interests)
        .bind(&user.goals)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => StoreError::DuplicateKey,
            _ => StoreError::Database(e),
        })?;

        tracing::debug!(user_id = %id, "Created user");

        Ok(UserProfile {
            id,
            name: user.name.clone(),
            email,
            password_hash: user.password_hash.clone(),
            grade: user.grade.clone(),
            interests: user.interests.clone(),
            goals: user.goals.clone(),
            created_at: now,
        })
    }

    /// Look a user up by email (normalized before the query)
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    /// Look a user up by id
    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    /// Number of registered users
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn user_from_row(r: &SqliteRow) -> Result<UserProfile> {
    let interests: String = r.get("interests");
    let interests = serde_json::from_str(&interests)
        .map_err(|e| StoreError::Corrupt(format!("interests column: {}", e)))?;

    Ok(UserProfile {
        id: r.get("id"),
        name: r.get("name"),
        email: r.get("email"),
        password_hash: r.get("password_hash"),
        grade: r.get("grade"),
        interests,
        goals: r.get("goals"),
        created_at: r.get("created_at"),
    })
}
