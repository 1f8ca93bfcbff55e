//! `db` crate: pure persistence layer.
//!
//! Provides a connection pool, typed row structs, and repository functions
//! for every table in the job board schema.  No business logic lives here:
//! passwords arrive already hashed and authorization has already happened.

pub mod error;
pub mod pool;
pub mod repository;
pub mod models;

pub use pool::{DbPool, PoolSettings};
pub use error::DbError;
