//! Customer aggregate and the inputs used to write it

use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, PostalCode};

use crate::address::Address;

/// A persisted customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: Address,
}

/// Reference to an address by postal code, as supplied by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    pub postal_code: PostalCode,
}

/// Client payload for creating or updating a customer
///
/// Only the postal code of the embedded address is used; the rest of the
/// address is resolved. A client-supplied `id` is never trusted: inserts
/// ignore it and updates overwrite it with the id being updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub id: Option<CustomerId>,
    pub name: String,
    pub address: AddressInput,
}

impl CustomerInput {
    pub fn new(name: impl Into<String>, postal_code: impl Into<PostalCode>) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: AddressInput {
                postal_code: postal_code.into(),
            },
        }
    }

    pub fn postal_code(&self) -> &PostalCode {
        &self.address.postal_code
    }
}

/// What the customer store is asked to persist
///
/// `id: None` inserts a new row and lets storage assign the identity;
/// `Some(id)` replaces the existing row with that id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCustomerRequest {
    pub id: Option<CustomerId>,
    pub name: String,
    pub address: Address,
}

impl SaveCustomerRequest {
    pub fn insert(name: impl Into<String>, address: Address) -> Self {
        Self {
            id: None,
            name: name.into(),
            address,
        }
    }

    pub fn replace(id: CustomerId, name: impl Into<String>, address: Address) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            address,
        }
    }
}
