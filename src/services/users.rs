use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{User, UserDraft, UserUpdate};

/// Draft passwords are expected to be hashed by the save pipeline before
/// reaching this function.
pub async fn create(pool: &PgPool, draft: &UserDraft) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, role, password, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&draft.name)
    .bind(&draft.email)
    .bind(draft.role.as_str())
    .bind(&draft.password)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn update_details(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    email: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as("UPDATE users SET name = $2, email = $3 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
}

pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as("UPDATE users SET password = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(password_hash)
        .fetch_one(pool)
        .await
}

/// Stores the hashed reset token with its expiry timestamp.
pub async fn set_reset_token(
    pool: &PgPool,
    id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET reset_password_token = $2, reset_password_expire = $3 WHERE id = $1",
    )
    .bind(id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Matches on the hashed token and rejects anything past its expiry.
pub async fn find_by_valid_reset_token(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM users WHERE reset_password_token = $1 AND reset_password_expire > NOW()",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await
}

pub async fn clear_reset_token(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET reset_password_token = NULL, reset_password_expire = NULL WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// `password_hash` of None keeps the stored hash in place.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    update: &UserUpdate,
    password_hash: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE users SET name = $2, email = $3, role = $4,
            password = COALESCE($5, password)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&update.name)
    .bind(&update.email)
    .bind(update.role.as_str())
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
