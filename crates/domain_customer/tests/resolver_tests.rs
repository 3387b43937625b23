//! Tests for AddressResolver: cache behaviour, sentinel handling, failure
//! propagation and single-flight resolution

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use core_kernel::PostalCode;
use domain_customer::{AddressPort, AddressResolver, InMemoryStore, ResolutionError};
use test_utils::{
    address_strategy, assert_transient, AddressFixtures, FailingAddressStore, PostalCodeFixtures,
    StubAddressLookup, TestAddressBuilder,
};

fn resolver_with(store: Arc<InMemoryStore>, lookup: Arc<StubAddressLookup>) -> AddressResolver {
    AddressResolver::new(store, lookup)
}

// ============================================================================
// Cache Behaviour
// ============================================================================

mod cache_tests {
    use super::*;

    #[tokio::test]
    async fn stored_address_resolves_without_lookup() {
        let store = Arc::new(InMemoryStore::with_addresses([AddressFixtures::se()]).await);
        let lookup = StubAddressLookup::new().into_shared();
        let resolver = resolver_with(store.clone(), lookup.clone());

        for _ in 0..5 {
            let address = resolver.resolve(&AddressFixtures::se().postal_code).await.unwrap();
            assert_eq!(address, AddressFixtures::se());
        }

        assert_eq!(lookup.calls(), 0);
        assert_eq!(store.address_count().await, 1);
    }

    #[tokio::test]
    async fn miss_looks_up_once_then_hits() {
        let store = Arc::new(InMemoryStore::new());
        let lookup = StubAddressLookup::with_fixtures().into_shared();
        let resolver = resolver_with(store.clone(), lookup.clone());
        let code = AddressFixtures::se().postal_code;

        let first = resolver.resolve(&code).await.unwrap();
        let second = resolver.resolve(&code).await.unwrap();

        assert_eq!(first, AddressFixtures::se());
        assert_eq!(second, first);
        assert_eq!(lookup.calls(), 1);
        assert_eq!(store.address_count().await, 1);
        assert_eq!(
            store.find_address_by_postal_code(&code).await.unwrap(),
            Some(AddressFixtures::se())
        );
    }

    #[tokio::test]
    async fn stored_address_wins_over_lookup_data() {
        let stored = TestAddressBuilder::new().with_street("Rua Antiga").build();
        let store = Arc::new(InMemoryStore::with_addresses([stored.clone()]).await);
        let lookup = StubAddressLookup::with_fixtures().into_shared();
        let resolver = resolver_with(store, lookup.clone());

        let address = resolver.resolve(&stored.postal_code).await.unwrap();

        assert_eq!(address.street, "Rua Antiga");
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn unpunctuated_code_shares_the_cache_entry() {
        let store = Arc::new(InMemoryStore::new());
        let lookup = StubAddressLookup::with_fixtures().into_shared();
        let resolver = resolver_with(store.clone(), lookup.clone());

        resolver.resolve(&PostalCode::new("01001-000")).await.unwrap();
        resolver.resolve(&PostalCode::new("01001000")).await.unwrap();
        resolver.resolve(&PostalCode::new(" 01001000 ")).await.unwrap();

        assert_eq!(lookup.calls(), 1);
        assert_eq!(store.address_count().await, 1);
    }
}

// ============================================================================
// Failure Handling
// ============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn unknown_code_is_rejected_and_not_stored() {
        let store = Arc::new(InMemoryStore::new());
        let lookup = StubAddressLookup::with_fixtures().into_shared();
        let resolver = resolver_with(store.clone(), lookup.clone());

        let err = resolver.resolve(&PostalCodeFixtures::unknown()).await.unwrap_err();

        assert!(matches!(err, ResolutionError::InvalidPostalCode(ref code) if *code == PostalCodeFixtures::unknown()));
        assert!(!err.is_transient());
        assert_eq!(store.address_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_code_is_looked_up_again_next_time() {
        let store = Arc::new(InMemoryStore::new());
        let lookup = StubAddressLookup::new().into_shared();
        let resolver = resolver_with(store, lookup.clone());

        assert!(resolver.resolve(&PostalCodeFixtures::malformed()).await.is_err());
        assert!(resolver.resolve(&PostalCodeFixtures::malformed()).await.is_err());

        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn lookup_outage_propagates_without_retry() {
        let store = Arc::new(InMemoryStore::new());
        let lookup = StubAddressLookup::with_fixtures().into_shared();
        lookup.set_failing(true);
        let resolver = resolver_with(store.clone(), lookup.clone());

        let err = resolver.resolve(&AddressFixtures::se().postal_code).await.unwrap_err();

        assert!(err.is_transient());
        match err {
            ResolutionError::LookupUnavailable(ref cause) => assert_transient(cause),
            other => panic!("expected LookupUnavailable, got {other:?}"),
        }
        assert_eq!(lookup.calls(), 1);
        assert_eq!(store.address_count().await, 0);
    }

    #[tokio::test]
    async fn answer_for_another_code_is_rejected_and_not_stored() {
        let requested = AddressFixtures::se().postal_code;
        let neighbour = TestAddressBuilder::new().with_postal_code("01001-001").build();
        let store = Arc::new(InMemoryStore::new());
        let lookup = StubAddressLookup::new()
            .with_answer(requested.clone(), neighbour)
            .into_shared();
        let resolver = resolver_with(store.clone(), lookup.clone());

        let err = resolver.resolve(&requested).await.unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidPostalCode(ref code) if *code == requested));
        assert_eq!(store.address_count().await, 0);

        assert!(resolver.resolve(&requested).await.is_err());
        assert_eq!(lookup.calls_for(&requested), 2);
    }

    #[tokio::test]
    async fn storage_failure_is_reported_as_storage() {
        let lookup = StubAddressLookup::with_fixtures().into_shared();
        let resolver = AddressResolver::new(Arc::new(FailingAddressStore), lookup);

        let err = resolver.resolve(&AddressFixtures::se().postal_code).await.unwrap_err();

        assert!(matches!(err, ResolutionError::Storage(_)));
    }
}

// ============================================================================
// Concurrency
// ============================================================================

mod concurrency_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_misses_share_one_lookup() {
        let store = Arc::new(InMemoryStore::new());
        let lookup = Arc::new(StubAddressLookup::with_fixtures().with_delay(Duration::from_millis(50)));
        let resolver = Arc::new(resolver_with(store.clone(), lookup.clone()));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let resolver = resolver.clone();
                tokio::spawn(async move { resolver.resolve(&AddressFixtures::se().postal_code).await })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), AddressFixtures::se());
        }

        assert_eq!(lookup.calls(), 1);
        assert_eq!(store.address_count().await, 1);
        assert_eq!(resolver.in_flight_count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn different_codes_resolve_independently() {
        let store = Arc::new(InMemoryStore::new());
        let lookup = Arc::new(StubAddressLookup::with_fixtures().with_delay(Duration::from_millis(20)));
        let resolver = Arc::new(resolver_with(store.clone(), lookup.clone()));

        let tasks: Vec<_> = AddressFixtures::all()
            .into_iter()
            .map(|address| {
                let resolver = resolver.clone();
                tokio::spawn(async move { resolver.resolve(&address.postal_code).await })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        assert_eq!(lookup.calls(), 3);
        for address in AddressFixtures::all() {
            assert_eq!(lookup.calls_for(&address.postal_code), 1);
        }
        assert_eq!(store.address_count().await, 3);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn any_known_address_is_looked_up_exactly_once(address in address_strategy(), repeats in 1usize..6) {
        let (calls, stored) = runtime().block_on(async {
            let store = Arc::new(InMemoryStore::new());
            let lookup = StubAddressLookup::new().with_address(address.clone()).into_shared();
            let resolver = resolver_with(store.clone(), lookup.clone());

            for _ in 0..repeats {
                let resolved = resolver.resolve(&address.postal_code).await.unwrap();
                assert_eq!(resolved, address);
            }
            (lookup.calls(), store.address_count().await)
        });

        prop_assert_eq!(calls, 1);
        prop_assert_eq!(stored, 1);
    }

    #[test]
    fn unknown_codes_never_reach_storage(address in address_strategy()) {
        let stored = runtime().block_on(async {
            let store = Arc::new(InMemoryStore::new());
            let resolver = resolver_with(store.clone(), StubAddressLookup::new().into_shared());
            let result = resolver.resolve(&address.postal_code).await;
            assert!(matches!(result, Err(ResolutionError::InvalidPostalCode(_))));
            store.address_count().await
        });

        prop_assert_eq!(stored, 0);
    }
}
