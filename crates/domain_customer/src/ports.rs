//! Customer Domain Ports
//!
//! This module defines the port interfaces the customer domain depends on,
//! enabling swappable implementations (PostgreSQL, in-memory, remote HTTP).
//!
//! # Architecture
//!
//! - `CustomerPort`: persistence of customers
//! - `AddressPort`: persistence of addresses, keyed by postal code
//! - `AddressLookupPort`: the external postal-code lookup service
//!
//! Application services receive the ports as trait objects:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_customer::{AddressResolver, CustomerService, InMemoryStore};
//!
//! let store = Arc::new(InMemoryStore::new());
//! let resolver = Arc::new(AddressResolver::new(store.clone(), lookup));
//! let service = CustomerService::new(store, resolver);
//! ```

use async_trait::async_trait;

use core_kernel::{CustomerId, DomainPort, HealthCheckable, PortError, PostalCode};

use crate::address::Address;
use crate::customer::{Customer, SaveCustomerRequest};

/// Storage port for customers
///
/// All methods return `Result<T, PortError>`; absence is expressed with
/// `Option` or `bool`, never with `PortError::NotFound`.
#[async_trait]
pub trait CustomerPort: DomainPort + HealthCheckable {
    /// Returns every stored customer, ordered by id
    async fn find_all_customers(&self) -> Result<Vec<Customer>, PortError>;

    /// Retrieves a customer by ID
    ///
    /// # Returns
    ///
    /// `None` if no customer has this id
    async fn find_customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, PortError>;

    /// Persists a customer
    ///
    /// # Arguments
    ///
    /// * `request` - With `id: None` a new customer is inserted and assigned
    ///   an id. With `Some(id)` the existing customer is replaced; a missing
    ///   row yields `PortError::NotFound`.
    ///
    /// # Returns
    ///
    /// The stored customer
    async fn save_customer(&self, request: SaveCustomerRequest) -> Result<Customer, PortError>;

    /// Deletes a customer by ID
    ///
    /// # Returns
    ///
    /// Whether a customer was removed
    async fn delete_customer_by_id(&self, id: CustomerId) -> Result<bool, PortError>;
}

/// Storage port for addresses
#[async_trait]
pub trait AddressPort: DomainPort + HealthCheckable {
    /// Retrieves an address by postal code
    async fn find_address_by_postal_code(
        &self,
        postal_code: &PostalCode,
    ) -> Result<Option<Address>, PortError>;

    /// Stores an address unless one with the same postal code exists
    ///
    /// Never overwrites. Returns whichever address is stored under the
    /// postal code once the call completes.
    async fn save_address(&self, address: Address) -> Result<Address, PortError>;
}

/// Port for the external postal-code lookup service
///
/// # Sentinel convention
///
/// A postal code the service does not know is not an error: `lookup` returns
/// `Ok(Address::unresolved())`, an address whose postal code is empty.
/// `Err` is reserved for transport-level failures (timeouts, outages).
#[async_trait]
pub trait AddressLookupPort: DomainPort + HealthCheckable {
    /// Looks up the address for a postal code
    async fn lookup(&self, postal_code: &PostalCode) -> Result<Address, PortError>;
}
