//! PostgreSQL store
//!
//! Every operation is a single statement; ownership checks are repeated in the
//! `WHERE` clause of mutating statements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Expense, User};

use super::{ExpenseRepository, StoreError, UserRepository};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    date: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            date: row.date,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    amount: Decimal,
    date: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Self {
            id: row.id,
            user: row.user_id,
            name: row.name,
            amount: row.amount,
            date: row.date,
        }
    }
}

/// Store backed by a Postgres pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, password_hash, date FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, password_hash, date FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.date)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateEmail(user.email.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ExpenseRepository for PgStore {
    async fn list_expenses(&self, owner: Uuid) -> Result<Vec<Expense>, StoreError> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, name, amount, date
            FROM expenses
            WHERE user_id = $1
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn find_expense(&self, id: Uuid) -> Result<Option<Expense>, StoreError> {
        let row: Option<ExpenseRow> = sqlx::query_as(
            "SELECT id, user_id, name, amount, date FROM expenses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Expense::from))
    }

    async fn insert_expense(&self, expense: &Expense) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, user_id, name, amount, date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(expense.id)
        .bind(expense.user)
        .bind(&expense.name)
        .bind(expense.amount)
        .bind(expense.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_expense(&self, expense: &Expense) -> Result<Option<Expense>, StoreError> {
        let row: Option<ExpenseRow> = sqlx::query_as(
            r#"
            UPDATE expenses
            SET name = $3, amount = $4, date = $5
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, amount, date
            "#,
        )
        .bind(expense.id)
        .bind(expense.user)
        .bind(&expense.name)
        .bind(expense.amount)
        .bind(expense.date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Expense::from))
    }

    async fn delete_expense(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
