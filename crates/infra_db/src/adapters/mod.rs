//! Domain Adapters
//!
//! Adapter implementations for the customer domain ports, connecting them to
//! the PostgreSQL repositories.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresCustomerAdapter;
//! use domain_customer::CustomerPort;
//!
//! let adapter = PostgresCustomerAdapter::new(pool);
//! let customers = adapter.find_all_customers().await?;
//! ```

pub mod customer;

pub use customer::PostgresCustomerAdapter;
