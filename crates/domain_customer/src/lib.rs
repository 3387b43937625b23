//! Customer Management Domain
//!
//! This crate manages customers and the postal addresses they reference.
//! A client only supplies a customer's name and postal code; the full
//! address is resolved from local storage or, on a miss, from an external
//! lookup service, and stored for reuse.
//!
//! # Resolution Flow
//!
//! 1. Look the postal code up in the address store
//! 2. On a miss, query the `AddressLookupPort`
//! 3. Reject codes the lookup does not know (`InvalidPostalCode`)
//! 4. Store the new address, then persist the customer referencing it
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_customer::{AddressResolver, CustomerInput, CustomerService, InMemoryStore};
//!
//! let store = Arc::new(InMemoryStore::new());
//! let resolver = Arc::new(AddressResolver::new(store.clone(), lookup));
//! let service = CustomerService::new(store, resolver);
//!
//! let ana = service.insert(CustomerInput::new("Ana", "01001-000")).await?;
//! assert_eq!(ana.address.city, "São Paulo");
//! ```

pub mod address;
pub mod customer;
pub mod error;
pub mod ports;
pub mod resolver;
pub mod service;
pub mod memory;
pub mod adapters;

pub use address::Address;
pub use customer::{AddressInput, Customer, CustomerInput, SaveCustomerRequest};
pub use error::{CustomerError, ResolutionError};
pub use ports::{AddressLookupPort, AddressPort, CustomerPort};
pub use resolver::AddressResolver;
pub use service::CustomerService;
pub use memory::InMemoryStore;
pub use adapters::{ViaCepAdapter, ViaCepConfig};
