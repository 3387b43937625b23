//! Customer DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{CustomerId, PostalCode};
use domain_customer::{Address, AddressInput, Customer, CustomerInput};

use crate::error::ApiError;

/// Body of `POST /customers` and `PUT /customers/{id}`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerRequest {
    /// Ignored on create; overridden by the path id on update
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(required(message = "address is required"))]
    pub address: Option<AddressPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressPayload {
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl CustomerRequest {
    /// Validates the request and converts it to the domain input
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` for a blank name or a missing address or
    /// postal code
    pub fn into_input(self) -> Result<CustomerInput, ApiError> {
        self.validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("name must not be blank".to_string()));
        }

        let postal_code = self
            .address
            .and_then(|a| a.postal_code)
            .filter(|code| !code.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("address.postal_code is required".to_string()))?;

        Ok(CustomerInput {
            id: self.id.map(CustomerId::new),
            name: self.name,
            address: AddressInput {
                postal_code: PostalCode::new(postal_code),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub postal_code: String,
    pub street: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub ibge_code: Option<String>,
    pub area_code: Option<String>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            postal_code: address.postal_code.to_string(),
            street: address.street,
            complement: address.complement,
            neighborhood: address.neighborhood,
            city: address.city,
            state: address.state,
            ibge_code: address.ibge_code,
            area_code: address.area_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub address: AddressResponse,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.value(),
            name: customer.name,
            address: customer.address.into(),
        }
    }
}
