//! Account operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Account, AccountRole, NewAccount};

use super::{Database, bounded};

impl Database {
    /// Insert a new account
    ///
    /// Email uniqueness is enforced by a pre-insert existence check, with the
    /// UNIQUE column constraint as backstop against concurrent inserts.
    pub async fn insert_account(&self, account: NewAccount) -> Result<Account, DbError> {
        let now = Utc::now();

        let existing = self.get_account_by_email(&account.email).await?;
        if existing.is_some() {
            return Err(DbError::Duplicate("email already exists".to_string()));
        }

        let result = bounded(
            sqlx::query(
                r#"
                INSERT INTO accounts (email, name, company, password_hash, role, is_active, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, 0, ?, ?)
                RETURNING id
                "#,
            )
            .bind(&account.email)
            .bind(&account.name)
            .bind(&account.company)
            .bind(&account.password_hash)
            .bind(account.role.as_str())
            .bind(now.to_rfc3339())
            .bind(now.to_rfc3339())
            .fetch_one(&self.pool),
        )
        .await?;

        let id: i64 = result.get("id");

        Ok(Account {
            id,
            email: account.email,
            name: account.name,
            company: account.company,
            password_hash: account.password_hash,
            role: account.role,
            is_active: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an account by email
    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError> {
        let result = bounded(
            sqlx::query(
                r#"
                SELECT id, email, name, company, password_hash, role, is_active, created_at, updated_at
                FROM accounts
                WHERE email = ?
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await?;

        result.map(|row| Account::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get an account by ID
    pub async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>, DbError> {
        let result = bounded(
            sqlx::query(
                r#"
                SELECT id, email, name, company, password_hash, role, is_active, created_at, updated_at
                FROM accounts
                WHERE id = ?
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?;

        result.map(|row| Account::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get any account holding the given role
    ///
    /// Used for the pre-insert capacity check on privileged roles.
    pub async fn get_account_by_role(&self, role: &AccountRole) -> Result<Option<Account>, DbError> {
        let result = bounded(
            sqlx::query(
                r#"
                SELECT id, email, name, company, password_hash, role, is_active, created_at, updated_at
                FROM accounts
                WHERE role = ?
                LIMIT 1
                "#,
            )
            .bind(role.as_str())
            .fetch_optional(&self.pool),
        )
        .await?;

        result.map(|row| Account::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all accounts
    pub async fn list_accounts(&self) -> Result<Vec<Account>, DbError> {
        let rows = bounded(
            sqlx::query(
                r#"
                SELECT id, email, name, company, password_hash, role, is_active, created_at, updated_at
                FROM accounts
                ORDER BY email
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await?;

        rows.iter()
            .map(|row| Account::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Mark an account as active
    pub async fn set_account_active(&self, id: i64) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = bounded(
            sqlx::query(
                r#"
                UPDATE accounts
                SET is_active = 1, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(now.to_rfc3339())
            .bind(id)
            .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an account
    pub async fn delete_account(&self, id: i64) -> Result<bool, DbError> {
        let result = bounded(
            sqlx::query("DELETE FROM accounts WHERE id = ?")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
