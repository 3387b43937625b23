//! In-memory storage adapter
//!
//! Implements both storage ports over `tokio::sync::RwLock`-guarded maps.
//! It mirrors the PostgreSQL adapter's rules: customer ids come from a
//! sequence starting at 1, a customer may only reference a stored address,
//! and `save_address` never overwrites.
//!
//! Used by the test suites and by the API server when it runs with
//! `API_STORAGE=memory`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{
    AdapterHealth, CustomerId, DomainPort, HealthCheckResult, HealthCheckable, PortError,
    PostalCode,
};

use crate::address::Address;
use crate::customer::{Customer, SaveCustomerRequest};
use crate::ports::{AddressPort, CustomerPort};

#[derive(Debug, Clone)]
struct CustomerRow {
    name: String,
    postal_code: PostalCode,
}

/// In-memory implementation of `CustomerPort` and `AddressPort`
#[derive(Debug)]
pub struct InMemoryStore {
    customers: RwLock<BTreeMap<CustomerId, CustomerRow>>,
    addresses: RwLock<HashMap<PostalCode, Address>>,
    next_id: AtomicI64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            customers: RwLock::new(BTreeMap::new()),
            addresses: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the address table
    pub async fn with_addresses(addresses: impl IntoIterator<Item = Address>) -> Self {
        let store = Self::new();
        {
            let mut table = store.addresses.write().await;
            for address in addresses {
                table.insert(address.postal_code.clone(), address);
            }
        }
        store
    }

    /// Number of stored addresses
    pub async fn address_count(&self) -> usize {
        self.addresses.read().await.len()
    }

    /// Number of stored customers
    pub async fn customer_count(&self) -> usize {
        self.customers.read().await.len()
    }

    fn join(
        id: CustomerId,
        row: &CustomerRow,
        addresses: &HashMap<PostalCode, Address>,
    ) -> Result<Customer, PortError> {
        let address = addresses.get(&row.postal_code).cloned().ok_or_else(|| {
            PortError::internal(format!(
                "customer {} references missing address {}",
                id, row.postal_code
            ))
        })?;
        Ok(Customer {
            id,
            name: row.name.clone(),
            address,
        })
    }
}

impl DomainPort for InMemoryStore {}

#[async_trait]
impl HealthCheckable for InMemoryStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::new("in-memory-store", AdapterHealth::Healthy, 0)
    }
}

#[async_trait]
impl CustomerPort for InMemoryStore {
    async fn find_all_customers(&self) -> Result<Vec<Customer>, PortError> {
        let customers = self.customers.read().await;
        let addresses = self.addresses.read().await;
        customers
            .iter()
            .map(|(id, row)| Self::join(*id, row, &addresses))
            .collect()
    }

    async fn find_customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, PortError> {
        let customers = self.customers.read().await;
        let addresses = self.addresses.read().await;
        customers
            .get(&id)
            .map(|row| Self::join(id, row, &addresses))
            .transpose()
    }

    async fn save_customer(&self, request: SaveCustomerRequest) -> Result<Customer, PortError> {
        let mut customers = self.customers.write().await;
        let addresses = self.addresses.read().await;

        let postal_code = request.address.postal_code;
        if !addresses.contains_key(&postal_code) {
            return Err(PortError::conflict(format!(
                "address {} is not stored",
                postal_code
            )));
        }

        let id = match request.id {
            Some(id) if customers.contains_key(&id) => id,
            Some(id) => return Err(PortError::not_found("Customer", id)),
            None => CustomerId::new(self.next_id.fetch_add(1, Ordering::Relaxed)),
        };

        let row = CustomerRow {
            name: request.name,
            postal_code,
        };
        let customer = Self::join(id, &row, &addresses)?;
        customers.insert(id, row);
        debug!(customer_id = %id, "Stored customer in memory");
        Ok(customer)
    }

    async fn delete_customer_by_id(&self, id: CustomerId) -> Result<bool, PortError> {
        Ok(self.customers.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl AddressPort for InMemoryStore {
    async fn find_address_by_postal_code(
        &self,
        postal_code: &PostalCode,
    ) -> Result<Option<Address>, PortError> {
        Ok(self.addresses.read().await.get(postal_code).cloned())
    }

    async fn save_address(&self, address: Address) -> Result<Address, PortError> {
        let mut addresses = self.addresses.write().await;
        let stored = addresses
            .entry(address.postal_code.clone())
            .or_insert(address);
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn se() -> Address {
        Address::new("01001-000", "Praça da Sé", "Sé", "São Paulo", "SP")
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let store = InMemoryStore::with_addresses([se()]).await;

        let first = store.save_customer(SaveCustomerRequest::insert("Ana", se())).await.unwrap();
        let second = store.save_customer(SaveCustomerRequest::insert("Bia", se())).await.unwrap();

        assert_eq!(first.id, CustomerId::new(1));
        assert_eq!(second.id, CustomerId::new(2));
        assert_eq!(store.customer_count().await, 2);
    }

    #[tokio::test]
    async fn test_save_requires_stored_address() {
        let store = InMemoryStore::new();
        let result = store.save_customer(SaveCustomerRequest::insert("Ana", se())).await;
        assert!(matches!(result, Err(PortError::Conflict { .. })));
        assert_eq!(store.customer_count().await, 0);
    }

    #[tokio::test]
    async fn test_replace_missing_customer_is_not_found() {
        let store = InMemoryStore::with_addresses([se()]).await;
        let result = store
            .save_customer(SaveCustomerRequest::replace(CustomerId::new(9), "Ana", se()))
            .await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_save_address_never_overwrites() {
        let store = InMemoryStore::with_addresses([se()]).await;

        let mut changed = se();
        changed.street = "Outra Rua".to_string();
        let stored = store.save_address(changed).await.unwrap();

        assert_eq!(stored.street, "Praça da Sé");
        assert_eq!(store.address_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = InMemoryStore::with_addresses([se()]).await;
        let customer = store.save_customer(SaveCustomerRequest::insert("Ana", se())).await.unwrap();

        assert!(store.delete_customer_by_id(customer.id).await.unwrap());
        assert!(!store.delete_customer_by_id(customer.id).await.unwrap());
        assert!(store.find_customer_by_id(customer.id).await.unwrap().is_none());
    }
}
