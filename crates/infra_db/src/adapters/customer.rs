//! PostgreSQL Customer Adapter
//!
//! Implements the customer domain's storage ports (`CustomerPort` and
//! `AddressPort`) on top of `CustomerRepository` and `AddressRepository`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresCustomerAdapter;
//! use domain_customer::{AddressPort, CustomerPort};
//! use std::sync::Arc;
//!
//! let adapter = Arc::new(PostgresCustomerAdapter::new(pool));
//! let customers: Arc<dyn CustomerPort> = adapter.clone();
//! let addresses: Arc<dyn AddressPort> = adapter;
//! ```

use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, CustomerId, DomainPort, HealthCheckResult, HealthCheckable, PortError,
    PostalCode,
};
use domain_customer::{Address, AddressPort, Customer, CustomerPort, SaveCustomerRequest};

use crate::error::DatabaseError;
use crate::repositories::{AddressRepository, AddressRow, CustomerRepository, CustomerWithAddressRow};

const ADAPTER_ID: &str = "postgres-customer-adapter";

/// PostgreSQL-backed implementation of `CustomerPort` and `AddressPort`
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - Constraint violations -> `PortError::Conflict`
/// - Connection problems -> `PortError::Connection`
/// - Other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresCustomerAdapter {
    customers: CustomerRepository,
    addresses: AddressRepository,
    pool: PgPool,
}

impl PostgresCustomerAdapter {
    /// Creates a new adapter over the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool.clone()),
            addresses: AddressRepository::new(pool.clone()),
            pool,
        }
    }

    async fn load(&self, id: i64) -> Result<Customer, PortError> {
        self.customers
            .get_by_id(id)
            .await?
            .map(row_to_customer)
            .ok_or_else(|| PortError::not_found("Customer", id))
    }
}

impl DomainPort for PostgresCustomerAdapter {}

#[async_trait]
impl HealthCheckable for PostgresCustomerAdapter {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(_) => HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Healthy, latency_ms),
            Err(e) => HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Unhealthy, latency_ms)
                .with_message(format!("Database error: {e}")),
        }
    }
}

#[async_trait]
impl CustomerPort for PostgresCustomerAdapter {
    #[instrument(skip(self))]
    async fn find_all_customers(&self) -> Result<Vec<Customer>, PortError> {
        let rows = self.customers.list().await?;
        debug!(count = rows.len(), "Fetched customers");
        Ok(rows.into_iter().map(row_to_customer).collect())
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    async fn find_customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, PortError> {
        let row = self.customers.get_by_id(id.value()).await?;
        Ok(row.map(row_to_customer))
    }

    #[instrument(skip(self, request), fields(customer_id = ?request.id))]
    async fn save_customer(&self, request: SaveCustomerRequest) -> Result<Customer, PortError> {
        let postal_code = request.address.postal_code.as_str();

        let id = match request.id {
            None => self.customers.insert(&request.name, postal_code).await?,
            Some(id) => {
                let found = self
                    .customers
                    .update(id.value(), &request.name, postal_code)
                    .await?;
                if !found {
                    return Err(DatabaseError::not_found("Customer", id).into());
                }
                id.value()
            }
        };

        debug!(customer_id = id, "Customer row written");
        self.load(id).await
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    async fn delete_customer_by_id(&self, id: CustomerId) -> Result<bool, PortError> {
        Ok(self.customers.delete(id.value()).await?)
    }
}

#[async_trait]
impl AddressPort for PostgresCustomerAdapter {
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    async fn find_address_by_postal_code(
        &self,
        postal_code: &PostalCode,
    ) -> Result<Option<Address>, PortError> {
        let row = self.addresses.find_by_postal_code(postal_code.as_str()).await?;
        Ok(row.map(row_to_address))
    }

    #[instrument(skip(self, address), fields(postal_code = %address.postal_code))]
    async fn save_address(&self, address: Address) -> Result<Address, PortError> {
        let stored = self.addresses.insert_if_absent(&address_to_row(address)).await?;
        Ok(row_to_address(stored))
    }
}

fn row_to_customer(row: CustomerWithAddressRow) -> Customer {
    Customer {
        id: CustomerId::new(row.id),
        name: row.name,
        address: row_to_address(row.address),
    }
}

fn row_to_address(row: AddressRow) -> Address {
    Address {
        // stored codes are already canonical; re-canonicalizing is a no-op
        postal_code: PostalCode::new(row.postal_code),
        street: row.street,
        complement: row.complement,
        neighborhood: row.neighborhood,
        city: row.city,
        state: row.state,
        ibge_code: row.ibge_code,
        area_code: row.area_code,
    }
}

fn address_to_row(address: Address) -> AddressRow {
    AddressRow {
        postal_code: address.postal_code.as_str().to_string(),
        street: address.street,
        complement: address.complement,
        neighborhood: address.neighborhood,
        city: address.city,
        state: address.state,
        ibge_code: address.ibge_code,
        area_code: address.area_code,
    }
}
