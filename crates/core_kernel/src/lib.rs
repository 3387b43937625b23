//! Core Kernel - Foundational types shared by the customer registry crates
//!
//! This crate provides the building blocks used across the workspace:
//! - Strongly typed identifiers (`CustomerId`, `PostalCode`)
//! - Port infrastructure for the hexagonal architecture (`PortError`,
//!   health checking, circuit breaker settings)

pub mod identifiers;
pub mod ports;

pub use identifiers::{CustomerId, PostalCode};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
    CircuitBreakerConfig,
};
