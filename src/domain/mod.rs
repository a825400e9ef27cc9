//! Domain module
//!
//! Core domain types and validation rules.

pub mod context;
pub mod expense;
pub mod user;
pub mod validation;

pub use context::OperationContext;
pub use expense::{Expense, ExpenseChanges, NewExpense};
pub use user::{User, UserProfile};
pub use validation::{FieldError, ValidationErrors};
