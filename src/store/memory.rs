//! In-memory store
//!
//! Keeps users and expenses in process memory. Expenses are kept in insertion
//! order so equal dates list in the order they were created.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Expense, User};

use super::{ExpenseRepository, StoreError, UserRepository};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    expenses: Vec<Expense>,
}

/// Store held entirely in memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored expenses across all users
    pub async fn expense_count(&self) -> usize {
        self.state.read().await.expenses.len()
    }

    /// Remove a user and everything they own
    pub async fn remove_user(&self, id: Uuid) {
        let mut state = self.state.write().await;
        state.users.remove(&id);
        state.expenses.retain(|e| e.user != id);
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email.clone()));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl ExpenseRepository for MemoryStore {
    async fn list_expenses(&self, owner: Uuid) -> Result<Vec<Expense>, StoreError> {
        let state = self.state.read().await;
        let mut expenses: Vec<Expense> = state
            .expenses
            .iter()
            .filter(|e| e.user == owner)
            .cloned()
            .collect();
        // stable: equal dates keep insertion order
        expenses.sort_by_key(|e| e.date);
        Ok(expenses)
    }

    async fn find_expense(&self, id: Uuid) -> Result<Option<Expense>, StoreError> {
        let state = self.state.read().await;
        Ok(state.expenses.iter().find(|e| e.id == id).cloned())
    }

    async fn insert_expense(&self, expense: &Expense) -> Result<(), StoreError> {
        self.state.write().await.expenses.push(expense.clone());
        Ok(())
    }

    async fn update_expense(&self, expense: &Expense) -> Result<Option<Expense>, StoreError> {
        let mut state = self.state.write().await;
        let Some(stored) = state
            .expenses
            .iter_mut()
            .find(|e| e.id == expense.id && e.user == expense.user)
        else {
            return Ok(None);
        };

        stored.name = expense.name.clone();
        stored.amount = expense.amount;
        stored.date = expense.date;
        Ok(Some(stored.clone()))
    }

    async fn delete_expense(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let before = state.expenses.len();
        state.expenses.retain(|e| !(e.id == id && e.user == owner));
        Ok(state.expenses.len() < before)
    }
}
