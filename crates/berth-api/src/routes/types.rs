//! Request and response types for the account API

use berth_db::Account;
use serde::{Deserialize, Serialize};

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    pub password: String,
    pub role: Option<String>,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account response (without password hash)
#[derive(Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub company: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            company: account.company,
            role: account.role.as_str().to_string(),
            is_active: account.is_active,
            created_at: account.created_at.to_rfc3339(),
            updated_at: account.updated_at.to_rfc3339(),
        }
    }
}

/// Login and refresh response: account details plus the token pair
#[derive(Serialize)]
pub struct TokenPairResponse {
    pub details: AccountResponse,
    pub access_token: String,
    pub refresh_token: String,
}
