//! Customer application service
//!
//! Orchestrates customer writes: the address is resolved through the
//! `AddressResolver` first, and the customer is only persisted once that
//! succeeded. Reads and deletes go straight to the customer store.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use core_kernel::CustomerId;

use crate::customer::{Customer, CustomerInput, SaveCustomerRequest};
use crate::error::CustomerError;
use crate::ports::CustomerPort;
use crate::resolver::AddressResolver;

/// Service for reading and writing customers
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerPort>,
    resolver: Arc<AddressResolver>,
}

impl CustomerService {
    /// Creates a new customer service
    pub fn new(customers: Arc<dyn CustomerPort>, resolver: Arc<AddressResolver>) -> Self {
        Self {
            customers,
            resolver,
        }
    }

    /// Lists all customers
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<Customer>, CustomerError> {
        info!("Listing customers");
        Ok(self.customers.find_all_customers().await?)
    }

    /// Gets a customer by ID, `None` if it does not exist
    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, CustomerError> {
        let customer = self.customers.find_customer_by_id(id).await?;
        if customer.is_none() {
            warn!("Customer not found");
        }
        Ok(customer)
    }

    /// Creates a customer
    ///
    /// The address is resolved from `input.address.postal_code`. Storage
    /// assigns the id; an id in the input is ignored.
    ///
    /// # Errors
    ///
    /// A `Resolution` error leaves storage without the customer.
    #[instrument(skip(self, input), fields(postal_code = %input.postal_code()))]
    pub async fn insert(&self, input: CustomerInput) -> Result<Customer, CustomerError> {
        let address = self.resolver.resolve(input.postal_code()).await?;
        let saved = self
            .customers
            .save_customer(SaveCustomerRequest::insert(input.name, address))
            .await?;
        info!(customer_id = %saved.id, "Customer created");
        Ok(saved)
    }

    /// Replaces the customer with `id`
    ///
    /// Returns `None` without touching storage if no such customer exists.
    /// The stored id is always `id`, whatever the input carries.
    ///
    /// # Errors
    ///
    /// A `Resolution` error leaves the stored customer unchanged.
    #[instrument(skip(self, input), fields(postal_code = %input.postal_code()))]
    pub async fn update(
        &self,
        id: CustomerId,
        input: CustomerInput,
    ) -> Result<Option<Customer>, CustomerError> {
        if self.customers.find_customer_by_id(id).await?.is_none() {
            warn!("Customer not found for update");
            return Ok(None);
        }

        if input.id.is_some_and(|payload_id| payload_id != id) {
            warn!(payload_id = ?input.id, "Ignoring id carried in update payload");
        }

        let address = self.resolver.resolve(input.postal_code()).await?;
        let updated = self
            .customers
            .save_customer(SaveCustomerRequest::replace(id, input.name, address))
            .await?;
        info!("Customer updated");
        Ok(Some(updated))
    }

    /// Deletes a customer, returning whether it existed
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<bool, CustomerError> {
        let deleted = self.customers.delete_customer_by_id(id).await?;
        if deleted {
            info!("Customer deleted");
        } else {
            warn!("Customer not found for deletion");
        }
        Ok(deleted)
    }
}
