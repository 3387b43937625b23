//! Port Stubs
//!
//! Controllable implementations of the customer domain ports. They let tests
//! drive the resolver into each of its branches without a network or a
//! database: known and unknown postal codes, lookup outages, slow lookups,
//! and a failing address store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, PostalCode,
};
use domain_customer::{Address, AddressLookupPort, AddressPort};

use crate::fixtures::AddressFixtures;

/// Lookup service stub with a fixed set of known addresses
///
/// Unknown postal codes answer with the `Address::unresolved()` sentinel.
/// Every call is counted, including failed ones.
#[derive(Debug, Default)]
pub struct StubAddressLookup {
    known: HashMap<PostalCode, Address>,
    calls: AtomicUsize,
    calls_by_code: Mutex<HashMap<PostalCode, usize>>,
    failing: AtomicBool,
    delay: Option<Duration>,
}

impl StubAddressLookup {
    /// Creates a stub that knows no postal codes
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stub that knows every address in `AddressFixtures::all()`
    pub fn with_fixtures() -> Self {
        AddressFixtures::all()
            .into_iter()
            .fold(Self::new(), |stub, address| stub.with_address(address))
    }

    /// Adds a known address
    pub fn with_address(mut self, address: Address) -> Self {
        self.known.insert(address.postal_code.clone(), address);
        self
    }

    /// Answers lookups of `requested` with `address`, whatever its own code
    pub fn with_answer(mut self, requested: PostalCode, address: Address) -> Self {
        self.known.insert(requested, address);
        self
    }

    /// Delays every answer, widening race windows in concurrency tests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes every subsequent call fail with `ServiceUnavailable`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Total number of lookups performed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of lookups performed for one postal code
    pub fn calls_for(&self, postal_code: &PostalCode) -> usize {
        self.calls_by_code
            .lock()
            .map(|calls| calls.get(postal_code).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Wraps the stub for use as a port
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl DomainPort for StubAddressLookup {}

#[async_trait]
impl HealthCheckable for StubAddressLookup {
    async fn health_check(&self) -> HealthCheckResult {
        let status = if self.failing.load(Ordering::SeqCst) {
            AdapterHealth::Unhealthy
        } else {
            AdapterHealth::Healthy
        };
        HealthCheckResult::new("stub-address-lookup", status, 0)
    }
}

#[async_trait]
impl AddressLookupPort for StubAddressLookup {
    async fn lookup(&self, postal_code: &PostalCode) -> Result<Address, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut by_code) = self.calls_by_code.lock() {
            *by_code.entry(postal_code.clone()).or_default() += 1;
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(PortError::unavailable("stub-address-lookup"));
        }

        Ok(self
            .known
            .get(postal_code)
            .cloned()
            .unwrap_or_else(Address::unresolved))
    }
}

/// Address store whose reads find nothing and whose writes always fail
#[derive(Debug, Default)]
pub struct FailingAddressStore;

impl DomainPort for FailingAddressStore {}

#[async_trait]
impl HealthCheckable for FailingAddressStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::new("failing-address-store", AdapterHealth::Unhealthy, 0)
            .with_message("writes always fail")
    }
}

#[async_trait]
impl AddressPort for FailingAddressStore {
    async fn find_address_by_postal_code(
        &self,
        _postal_code: &PostalCode,
    ) -> Result<Option<Address>, PortError> {
        Ok(None)
    }

    async fn save_address(&self, _address: Address) -> Result<Address, PortError> {
        Err(PortError::connection("address store is down"))
    }
}
