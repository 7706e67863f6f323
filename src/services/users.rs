use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    auth::password,
    error::{is_unique_violation, AppError, Result},
    models::user::User,
};

#[derive(Clone)]
pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Creates a user with a hashed password. Usernames and emails compare
    /// case-insensitively. The lookups are a fast path for friendly messages;
    /// concurrent registrations are settled by the unique indexes on insert.
    pub async fn register(&self, username: &str, email: &str, plaintext: &str) -> Result<User> {
        if self.find_by_username(username).await?.is_some() {
            tracing::warn!(username, "registration rejected: username taken");
            return Err(AppError::Conflict("username already exists".to_string()));
        }

        let email_taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE email = ? AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        if email_taken > 0 {
            tracing::warn!(username, "registration rejected: email taken");
            return Err(AppError::Conflict("email already exists".to_string()));
        }

        let password_hash = password::hash(plaintext).await?;
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, username, email, password_hash, created_at, updated_at",
        )
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                tracing::warn!(username, "registration lost a uniqueness race");
                AppError::Conflict("username or email already exists".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Unknown username and wrong password produce the same error and
    /// roughly the same latency.
    pub async fn login(&self, username: &str, plaintext: &str) -> Result<User> {
        let Some(user) = self.find_by_username(username).await? else {
            password::verify_dummy(plaintext).await?;
            tracing::warn!(username, "login failed: unknown user");
            return Err(AppError::InvalidCredentials);
        };

        if !password::verify(plaintext, &user.password_hash).await? {
            tracing::warn!(user_id = user.id, "login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, "user logged in");
        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at, updated_at \
             FROM users WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        self.find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at, updated_at \
             FROM users WHERE username = ? AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
