//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidAccountRole(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidAccountRole(s) => write!(f, "Invalid account role: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Account role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Admin,
    User,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Admin => "admin",
            AccountRole::User => "user",
        }
    }

    /// Privileged roles are capped at a single holder.
    pub fn is_privileged(&self) -> bool {
        matches!(self, AccountRole::Admin)
    }
}

impl Default for AccountRole {
    fn default() -> Self {
        AccountRole::User
    }
}

impl FromStr for AccountRole {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AccountRole::Admin),
            "user" => Ok(AccountRole::User),
            _ => Err(ParseError::InvalidAccountRole(s.to_string())),
        }
    }
}

/// Account model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub company: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: AccountRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New account (for insertion)
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub company: String,
    pub password_hash: String,
    pub role: AccountRole,
}

/// Session model
///
/// One row per successful login. The access-token field is replaced in
/// place on refresh; the refresh token is stable for the row's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub account_id: i64,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New session (for insertion)
#[derive(Debug, Clone)]
pub struct NewSession {
    pub account_id: i64,
    pub access_token: String,
    pub refresh_token: String,
    pub user_agent: String,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for Account {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let role_str: String = row.try_get("role")?;
        Ok(Account {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            company: row.try_get("company")?,
            password_hash: row.try_get("password_hash")?,
            role: AccountRole::from_str(&role_str).unwrap_or(AccountRole::User),
            is_active: row.try_get("is_active")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Session {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Session {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            access_token: row.try_get("access_token")?,
            refresh_token: row.try_get("refresh_token")?,
            user_agent: row.try_get("user_agent")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}
