//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::{CustomerId, PostalCode};
use domain_customer::{Address, CustomerInput};

use crate::fixtures::AddressFixtures;

/// Builder for constructing test addresses
pub struct TestAddressBuilder {
    address: Address,
}

impl Default for TestAddressBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAddressBuilder {
    /// Creates a new builder based on the Praça da Sé fixture
    pub fn new() -> Self {
        Self {
            address: AddressFixtures::se(),
        }
    }

    /// Sets the postal code
    pub fn with_postal_code(mut self, postal_code: impl Into<PostalCode>) -> Self {
        self.address.postal_code = postal_code.into();
        self
    }

    /// Sets the street
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.address.street = street.into();
        self
    }

    /// Sets the city and state
    pub fn with_city(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.address.city = city.into();
        self.address.state = state.into();
        self
    }

    /// Builds the address
    pub fn build(self) -> Address {
        self.address
    }
}

/// Builder for constructing customer payloads
pub struct TestCustomerInputBuilder {
    id: Option<CustomerId>,
    name: String,
    postal_code: PostalCode,
}

impl Default for TestCustomerInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCustomerInputBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: None,
            name: "Ana".to_string(),
            postal_code: AddressFixtures::se().postal_code,
        }
    }

    /// Sets the id carried in the payload
    pub fn with_id(mut self, id: impl Into<CustomerId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the postal code
    pub fn with_postal_code(mut self, postal_code: impl Into<PostalCode>) -> Self {
        self.postal_code = postal_code.into();
        self
    }

    /// Builds the payload
    pub fn build(self) -> CustomerInput {
        let mut input = CustomerInput::new(self.name, self.postal_code);
        input.id = self.id;
        input
    }

    /// Builds the JSON body a client would send
    pub fn build_json(self) -> serde_json::Value {
        serde_json::to_value(self.build()).unwrap_or_default()
    }
}
