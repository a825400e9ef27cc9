//! Quick Save Library
//!
//! Re-exports modules for the server binary and integration testing.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod store;

pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{Expense, OperationContext, User, UserProfile};
pub use error::{AppError, AppResult, MessageResponse};
