//! Repository implementations for the customer registry tables
//!
//! Repositories encapsulate SQL queries and map between database rows and
//! plain row structs. Queries are checked at runtime (`sqlx::query_as` with
//! `FromRow`), so building the crate does not need a live database.

pub mod address;
pub mod customer;

pub use address::{AddressRepository, AddressRow};
pub use customer::{CustomerRepository, CustomerWithAddressRow};
