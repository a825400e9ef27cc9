//! Command Handlers module
//!
//! Handlers run the per-request check-then-act sequence against the store.

mod auth_handler;
mod commands;
mod expense_handler;
mod user_handler;


pub use auth_handler::{CurrentUserHandler, LoginHandler};
pub use commands::*;
pub use expense_handler::ExpenseHandler;
pub use user_handler::RegisterUserHandler;
