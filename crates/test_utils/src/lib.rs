//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! customer service test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `stubs`: Controllable port implementations (lookup service, failing store)
//! - `database`: Database test helpers and container management
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod stubs;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use stubs::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
