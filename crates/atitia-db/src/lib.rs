//! Atitia DB - Repository traits and PostgreSQL implementations
//!
//! Storage layer for the subscription lifecycle sweeper:
//! - Repository traits the sweep logic is written against
//! - Row models mapping to database rows
//! - PostgreSQL implementations, with compound lifecycle transitions
//!   applied inside a single transaction

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pool::{create_pool, DbPool};
pub use repo::*;
