//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Extension, Path, State},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::domain::expense::{amount_fits_json, deserialize_optional_date};
use crate::domain::validation::{is_valid_email, non_empty, normalize_email};
use crate::domain::{Expense, ExpenseChanges, NewExpense, OperationContext, UserProfile, ValidationErrors};
use crate::error::{AppError, AppResult, MessageResponse};
use crate::handlers::{
    CurrentUserHandler, ExpenseHandler, LoginCommand, LoginHandler, RegisterUserCommand,
    RegisterUserHandler, TokenResult,
};

use super::middleware::{auth_middleware, logging_middleware};
use super::AppState;

const WELCOME_MSG: &str = "Welcome to Quick Save";
const EXPENSE_REMOVED_MSG: &str = "Expense Removed";
const NAME_REQUIRED_MSG: &str = "Name is required";
const AMOUNT_PRECISION_MSG: &str = "Amount has more precision than can be returned";
const MIN_PASSWORD_LEN: usize = 6;

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl RegisterUserRequest {
    /// Check every field, reporting all failures at once
    pub fn validate(self) -> Result<RegisterUserCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = non_empty(self.name.as_deref()).map(str::to_string);
        if name.is_none() {
            errors.push("name", "Please add name");
        }

        let email = self.email.filter(|e| is_valid_email(e));
        if email.is_none() {
            errors.push("email", "Please include a valid email");
        }

        let password = self
            .password
            .filter(|p| p.chars().count() >= MIN_PASSWORD_LEN);
        if password.is_none() {
            errors.push(
                "password",
                format!("Please enter a password with {} or more characters", MIN_PASSWORD_LEN),
            );
        }

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => Ok(
                RegisterUserCommand::new(name, normalize_email(&email), password),
            ),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<LoginCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = self.email.filter(|e| is_valid_email(e));
        if email.is_none() {
            errors.push("email", "Please include a valid email");
        }

        let password = self.password.filter(|p| !p.is_empty());
        if password.is_none() {
            errors.push("password", "Password is required");
        }

        match (email, password) {
            (Some(email), Some(password)) => Ok(LoginCommand::new(normalize_email(&email), password)),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<DateTime<Utc>>,
}

impl CreateExpenseRequest {
    /// Name is required; amount defaults to zero and date to now
    pub fn validate(self) -> Result<NewExpense, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = non_empty(self.name.as_deref()).map(str::to_string);
        if name.is_none() {
            errors.push("name", NAME_REQUIRED_MSG);
        }

        let amount = self.amount.unwrap_or(Decimal::ZERO);
        if !amount_fits_json(amount) {
            errors.push("amount", AMOUNT_PRECISION_MSG);
        }

        match name {
            Some(name) if errors.is_empty() => Ok(NewExpense {
                name,
                amount,
                date: self.date.unwrap_or_else(Utc::now),
            }),
            _ => Err(errors),
        }
    }
}

/// Partial update body. Has no owner field; unknown keys are ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<DateTime<Utc>>,
}

impl UpdateExpenseRequest {
    pub fn validate(self) -> Result<ExpenseChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = match self.name {
            Some(raw) => {
                let name = non_empty(Some(&raw)).map(str::to_string);
                if name.is_none() {
                    errors.push("name", NAME_REQUIRED_MSG);
                }
                name
            }
            None => None,
        };

        if self.amount.is_some_and(|amount| !amount_fits_json(amount)) {
            errors.push("amount", AMOUNT_PRECISION_MSG);
        }

        errors.into_result()?;

        Ok(ExpenseChanges {
            name,
            amount: self.amount,
            date: self.date,
        })
    }

    /// Parse a PUT body; an empty body is an empty change set
    pub fn from_body(body: &[u8]) -> Result<Self, ValidationErrors> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body).map_err(|e| {
            ValidationErrors::single(
                "body",
                format!("Failed to deserialize the JSON body into the target type: {}", e),
            )
        })
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the application router with all routes and layers
pub fn create_router(state: AppState) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    // route_layer only covers the methods registered before it
    let api_router = Router::new()
        .route("/users", post(register_user))
        .route(
            "/auth",
            get(current_user).route_layer(auth.clone()).post(login),
        )
        .route(
            "/expenses",
            get(list_expenses)
                .post(create_expense)
                .route_layer(auth.clone()),
        )
        .route(
            "/expenses/:id",
            put(update_expense).delete(delete_expense).route_layer(auth),
        );

    Router::new()
        .route("/", get(welcome))
        .nest("/api", api_router)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

// =========================================================================
// GET /
// =========================================================================

async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new(WELCOME_MSG))
}

// =========================================================================
// POST /api/users
// =========================================================================

/// Register a new user
async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> AppResult<Json<TokenResult>> {
    let Json(request) = payload?;
    let command = request.validate()?;

    let handler = RegisterUserHandler::new(state.store, state.tokens);
    Ok(Json(handler.execute(command).await?))
}

// =========================================================================
// POST /api/auth, GET /api/auth
// =========================================================================

/// Log in and receive a token
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResult>> {
    let Json(request) = payload?;
    let command = request.validate()?;

    let handler = LoginHandler::new(state.store, state.tokens);
    Ok(Json(handler.execute(command).await?))
}

/// Profile of the logged-in user
async fn current_user(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
) -> AppResult<Json<UserProfile>> {
    let handler = CurrentUserHandler::new(state.store);
    Ok(Json(handler.execute(&context).await?))
}

// =========================================================================
// GET /api/expenses
// =========================================================================

async fn list_expenses(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
) -> AppResult<Json<Vec<Expense>>> {
    let handler = ExpenseHandler::new(state.store);
    Ok(Json(handler.list(&context).await?))
}

// =========================================================================
// POST /api/expenses
// =========================================================================

async fn create_expense(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    payload: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> AppResult<Json<Expense>> {
    let Json(request) = payload?;
    let input = request.validate()?;

    let handler = ExpenseHandler::new(state.store);
    Ok(Json(handler.create(input, &context).await?))
}

// =========================================================================
// PUT /api/expenses/:id
// =========================================================================

/// Missing and foreign expenses are reported before the body is looked at
async fn update_expense(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<Expense>> {
    let expense_id = parse_expense_id(&id)?;

    let handler = ExpenseHandler::new(state.store);
    let existing = handler.find_owned(expense_id, &context).await?;

    let changes = UpdateExpenseRequest::from_body(&body)?.validate()?;
    Ok(Json(handler.update(existing, changes, &context).await?))
}

// =========================================================================
// DELETE /api/expenses/:id
// =========================================================================

async fn delete_expense(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let expense_id = parse_expense_id(&id)?;

    let handler = ExpenseHandler::new(state.store);
    handler.delete(expense_id, &context).await?;

    Ok(Json(MessageResponse::new(EXPENSE_REMOVED_MSG)))
}

/// Ids that are not UUIDs cannot name a stored expense
fn parse_expense_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::ExpenseNotFound)
}
