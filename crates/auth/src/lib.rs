//! `auth` crate: request authentication and authorization.
//!
//! - [`TokenAuthenticator`] issues and verifies HS256 bearer tokens and turns
//!   an `Authorization` header into an optional [`Identity`].
//! - [`Capability`] is the per-route gate that decides whether that identity
//!   may proceed.
//! - [`password`] hashes and verifies user passwords with bcrypt.
//!
//! Nothing here touches HTTP types or the database.

pub mod error;
pub mod identity;
pub mod token;
pub mod gate;
pub mod password;

pub use error::AuthError;
pub use identity::Identity;
pub use token::{bearer_token, Claims, TokenAuthenticator};
pub use gate::{ensure_admin, ensure_logged_in, ensure_same_user_or_admin, Capability};
