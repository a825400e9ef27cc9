//! Store module
//!
//! Persistence seam for users and expenses. Handlers only see the repository traits;
//! the process-wide handle is created once at startup and injected through `AppState`.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Expense, User};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up a user by normalized email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert a new user. Fails with `StoreError::DuplicateEmail` when the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
}

/// Expense persistence
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// All expenses owned by `owner`, ascending by date
    async fn list_expenses(&self, owner: Uuid) -> Result<Vec<Expense>, StoreError>;

    async fn find_expense(&self, id: Uuid) -> Result<Option<Expense>, StoreError>;

    async fn insert_expense(&self, expense: &Expense) -> Result<(), StoreError>;

    /// Overwrite name/amount/date of the record matching both id and owner.
    /// Returns the stored record, or `None` when no such record exists.
    async fn update_expense(&self, expense: &Expense) -> Result<Option<Expense>, StoreError>;

    /// Permanently remove the record matching both id and owner.
    /// Returns whether a record was removed.
    async fn delete_expense(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;
}

/// Everything the HTTP layer needs from storage
pub trait Store: UserRepository + ExpenseRepository {}

impl<T> Store for T where T: UserRepository + ExpenseRepository {}
