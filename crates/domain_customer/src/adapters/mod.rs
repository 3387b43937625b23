//! External Adapters for the Customer Domain
//!
//! Implementations of `AddressLookupPort` backed by remote services.
//!
//! # Available Adapters
//!
//! - **ViaCepAdapter**: Brazilian postal codes via the ViaCEP REST API
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_customer::adapters::{ViaCepAdapter, ViaCepConfig};
//! use domain_customer::AddressLookupPort;
//! use std::sync::Arc;
//!
//! let config = ViaCepConfig::new("https://viacep.com.br/".parse()?);
//! let lookup: Arc<dyn AddressLookupPort> = Arc::new(ViaCepAdapter::new(config)?);
//! ```

pub mod viacep;

pub use viacep::{ViaCepAdapter, ViaCepConfig};
