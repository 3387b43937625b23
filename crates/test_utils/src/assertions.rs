//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::{PortError, PostalCode};
use domain_customer::{Customer, CustomerError, ResolutionError};

/// Asserts that a customer references the address stored under `postal_code`
pub fn assert_customer_at(customer: &Customer, postal_code: &PostalCode) {
    assert_eq!(
        &customer.address.postal_code, postal_code,
        "Customer {} ({}) lives at {}, expected {}",
        customer.id, customer.name, customer.address.postal_code, postal_code
    );
    assert!(
        !customer.address.street.is_empty() && !customer.address.city.is_empty(),
        "Customer {} has an incomplete address: {:?}",
        customer.id,
        customer.address
    );
}

/// Asserts that a service call failed because the postal code is unknown
pub fn assert_invalid_postal_code<T: std::fmt::Debug>(result: &Result<T, CustomerError>) {
    assert!(
        matches!(
            result,
            Err(CustomerError::Resolution(ResolutionError::InvalidPostalCode(_)))
        ),
        "Expected InvalidPostalCode, got {:?}",
        result
    );
}

/// Asserts that a service call failed because the lookup service is down
pub fn assert_lookup_unavailable<T: std::fmt::Debug>(result: &Result<T, CustomerError>) {
    assert!(
        matches!(
            result,
            Err(CustomerError::Resolution(ResolutionError::LookupUnavailable(_)))
        ),
        "Expected LookupUnavailable, got {:?}",
        result
    );
}

/// Asserts that a port error is worth retrying
pub fn assert_transient(error: &PortError) {
    assert!(error.is_transient(), "Expected transient error, got {:?}", error);
}
