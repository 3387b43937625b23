//! Address resolution
//!
//! Turns a postal code into a stored `Address`: local storage first, the
//! external lookup service on a miss, and the lookup result is validated and
//! stored before it is returned.
//!
//! # Concurrency
//!
//! Cache misses are resolved under a per-postal-code lock with a second
//! storage check once the lock is held, so concurrent requests for the same
//! unseen postal code cause a single lookup and a single write in this
//! process. Across processes the storage adapters fall back to
//! insert-if-absent, so a stored address is never overwritten.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use core_kernel::PostalCode;

use crate::address::Address;
use crate::error::ResolutionError;
use crate::ports::{AddressLookupPort, AddressPort};

/// Resolves postal codes into stored addresses
pub struct AddressResolver {
    addresses: Arc<dyn AddressPort>,
    lookup: Arc<dyn AddressLookupPort>,
    in_flight: Mutex<HashMap<PostalCode, Arc<Mutex<()>>>>,
}

impl AddressResolver {
    /// Creates a resolver over an address store and a lookup service
    pub fn new(addresses: Arc<dyn AddressPort>, lookup: Arc<dyn AddressLookupPort>) -> Self {
        Self {
            addresses,
            lookup,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves a postal code to its stored address
    ///
    /// # Errors
    ///
    /// - `InvalidPostalCode` if the lookup service does not know the code or
    ///   answers for a different one; nothing is stored in that case
    /// - `LookupUnavailable` if the lookup service failed; not retried here
    /// - `Storage` if the address store failed
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    pub async fn resolve(&self, postal_code: &PostalCode) -> Result<Address, ResolutionError> {
        if let Some(address) = self.find_stored(postal_code).await? {
            debug!("Address found in local storage");
            return Ok(address);
        }

        let lock = self.key_lock(postal_code).await;
        let result = {
            let _guard = lock.lock().await;
            self.resolve_miss(postal_code).await
        };
        self.release_key_lock(postal_code, lock).await;
        result
    }

    /// Resolution path for a cache miss, run while holding the key lock
    async fn resolve_miss(&self, postal_code: &PostalCode) -> Result<Address, ResolutionError> {
        // another task may have stored it while we waited for the lock
        if let Some(address) = self.find_stored(postal_code).await? {
            debug!("Address stored by a concurrent resolution");
            return Ok(address);
        }

        info!("Address not stored locally, querying lookup service");
        let resolved = self
            .lookup
            .lookup(postal_code)
            .await
            .map_err(ResolutionError::LookupUnavailable)?;

        if resolved.is_unresolved() {
            warn!("Lookup service does not know this postal code");
            return Err(ResolutionError::InvalidPostalCode(postal_code.clone()));
        }

        // the stored address is keyed by, and attached under, the requested code
        if resolved.postal_code != *postal_code {
            warn!(returned = %resolved.postal_code, "Lookup answered for a different postal code");
            return Err(ResolutionError::InvalidPostalCode(postal_code.clone()));
        }

        let stored = self
            .addresses
            .save_address(resolved)
            .await
            .map_err(ResolutionError::Storage)?;
        info!(city = %stored.city, state = %stored.state, "Address stored");
        Ok(stored)
    }

    async fn find_stored(&self, postal_code: &PostalCode) -> Result<Option<Address>, ResolutionError> {
        self.addresses
            .find_address_by_postal_code(postal_code)
            .await
            .map_err(ResolutionError::Storage)
    }

    async fn key_lock(&self, postal_code: &PostalCode) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.entry(postal_code.clone()).or_default().clone()
    }

    async fn release_key_lock(&self, postal_code: &PostalCode, lock: Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().await;
        drop(lock);
        // only the table's own handle left: nobody is waiting on this key
        if in_flight
            .get(postal_code)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            in_flight.remove(postal_code);
        }
    }

    /// Number of postal codes currently being resolved
    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}

impl std::fmt::Debug for AddressResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressResolver").finish_non_exhaustive()
    }
}
