//! Expense Handler
//!
//! List/create/update/delete over the caller's expenses. Existence and ownership
//! are resolved before any change is applied.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Expense, ExpenseChanges, NewExpense, OperationContext};
use crate::error::{AppError, AppResult};
use crate::store::Store;

/// Handler for expense operations
pub struct ExpenseHandler {
    store: Arc<dyn Store>,
}

impl ExpenseHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// All expenses of the acting user, ascending by date
    pub async fn list(&self, context: &OperationContext) -> AppResult<Vec<Expense>> {
        Ok(self.store.list_expenses(context.user_id).await?)
    }

    /// Persist a new expense owned by the acting user and return it
    pub async fn create(
        &self,
        input: NewExpense,
        context: &OperationContext,
    ) -> AppResult<Expense> {
        let expense = Expense::create(context.user_id, input);
        self.store.insert_expense(&expense).await?;

        tracing::debug!(
            expense_id = %expense.id,
            user_id = %context.user_id,
            correlation_id = ?context.correlation_id,
            "Expense created"
        );

        Ok(expense)
    }

    /// Fetch an expense and check it belongs to the acting user
    pub async fn find_owned(
        &self,
        expense_id: Uuid,
        context: &OperationContext,
    ) -> AppResult<Expense> {
        let expense = self
            .store
            .find_expense(expense_id)
            .await?
            .ok_or(AppError::ExpenseNotFound)?;

        if !context.owns(expense.user) {
            tracing::warn!(
                expense_id = %expense_id,
                user_id = %context.user_id,
                correlation_id = ?context.correlation_id,
                "Rejected access to expense owned by another user"
            );
            return Err(AppError::NotAuthorized);
        }

        Ok(expense)
    }

    /// Merge the provided fields into an expense returned by `find_owned`
    pub async fn update(
        &self,
        existing: Expense,
        changes: ExpenseChanges,
        context: &OperationContext,
    ) -> AppResult<Expense> {
        if !context.owns(existing.user) {
            return Err(AppError::NotAuthorized);
        }

        if changes.is_empty() {
            return Ok(existing);
        }

        let updated = existing.apply(changes);

        // The record can disappear between lookup and write
        let stored = self
            .store
            .update_expense(&updated)
            .await?
            .ok_or(AppError::ExpenseNotFound)?;

        tracing::debug!(
            expense_id = %stored.id,
            user_id = %context.user_id,
            correlation_id = ?context.correlation_id,
            "Expense updated"
        );

        Ok(stored)
    }

    /// Permanently remove an expense owned by the acting user
    pub async fn delete(&self, expense_id: Uuid, context: &OperationContext) -> AppResult<()> {
        let existing = self.find_owned(expense_id, context).await?;

        if !self.store.delete_expense(existing.id, existing.user).await? {
            return Err(AppError::ExpenseNotFound);
        }

        tracing::debug!(
            expense_id = %expense_id,
            user_id = %context.user_id,
            correlation_id = ?context.correlation_id,
            "Expense removed"
        );

        Ok(())
    }
}
