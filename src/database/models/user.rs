use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::access::Role;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_expire: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Registration payload; the `hash-password` save step rewrites `password`
/// before the row is written.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub password: String,
}

/// Admin update payload. `password` is optional; when omitted the stored
/// hash is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub password: Option<String>,
}

fn default_role() -> Role {
    Role::User
}
