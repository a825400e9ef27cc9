//! Authentication module
//!
//! Token signing/verification and password hashing.

mod password;
mod token;

pub use password::{hash_password, verify_against_decoy, verify_password, PasswordError};
pub use token::{Claims, ClaimsUser, TokenError, TokenService};
