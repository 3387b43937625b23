//! Property-Based Test Generators
//!
//! Provides proptest strategies and `fake`-backed helpers for generating
//! random test data that maintains domain invariants.

use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;

use core_kernel::PostalCode;
use domain_customer::Address;

/// Strategy for generating eight-digit postal codes without punctuation
pub fn postal_code_digits_strategy() -> impl Strategy<Value = String> {
    "[0-9]{8}"
}

/// Strategy for generating canonical postal codes
pub fn postal_code_strategy() -> impl Strategy<Value = PostalCode> {
    postal_code_digits_strategy().prop_map(PostalCode::new)
}

/// Strategy for generating non-blank customer names
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,12}( [A-Z][a-z]{1,12}){0,2}"
}

/// Strategy for generating resolvable addresses
pub fn address_strategy() -> impl Strategy<Value = Address> {
    (
        postal_code_strategy(),
        "[A-Z][a-z]{2,15}",
        "[A-Z][a-z]{2,15}",
        "[A-Z][a-z]{2,15}",
        "[A-Z]{2}",
    )
        .prop_map(|(postal_code, street, neighborhood, city, state)| {
            Address::new(postal_code, street, neighborhood, city, state)
        })
}

/// Generates a realistic customer name
pub fn fake_customer_name() -> String {
    Name().fake()
}
