//! Customer domain errors
//!
//! Resolution failures and storage failures are kept apart so the HTTP
//! boundary can tell a bad postal code (client error) from an outage.
//! "Customer not found" is not an error at all: the service reports it as
//! `None`.

use thiserror::Error;

use core_kernel::{PortError, PostalCode};

/// Errors raised while turning a postal code into a stored address
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The lookup service answered but does not know this postal code
    #[error("Invalid or unknown postal code: {0}")]
    InvalidPostalCode(PostalCode),

    /// The lookup service could not be reached or failed
    #[error("Address lookup unavailable: {0}")]
    LookupUnavailable(#[source] PortError),

    /// Reading or writing the address store failed
    #[error("Address storage failed: {0}")]
    Storage(#[source] PortError),
}

impl ResolutionError {
    /// Returns true if retrying later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ResolutionError::InvalidPostalCode(_) => false,
            ResolutionError::LookupUnavailable(e) | ResolutionError::Storage(e) => e.is_transient(),
        }
    }
}

/// Errors that can occur in the customer domain
#[derive(Debug, Error)]
pub enum CustomerError {
    /// The customer's address could not be resolved
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The customer store failed
    #[error("Customer storage failed: {0}")]
    Storage(#[from] PortError),
}
