//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the customer registry using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and
//! return row structs, and `PostgresCustomerAdapter` maps those rows onto the
//! domain ports.
//!
//! # Schema
//!
//! - `addresses`: keyed by canonical postal code, written once
//! - `customers`: `BIGSERIAL` id, name, and a foreign key to `addresses`
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresCustomerAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/customers")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresCustomerAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, DatabaseConfig, create_pool, run_migrations};
pub use error::DatabaseError;
pub use adapters::PostgresCustomerAdapter;
