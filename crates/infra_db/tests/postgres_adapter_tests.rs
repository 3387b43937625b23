//! Integration tests for the PostgreSQL customer adapter
//!
//! These tests start a PostgreSQL container and need Docker:
//! `cargo test -p infra_db -- --ignored`

use std::sync::Arc;

use core_kernel::{CustomerId, HealthCheckable, PortError};
use domain_customer::{AddressPort, AddressResolver, CustomerPort, CustomerService, SaveCustomerRequest};
use infra_db::PostgresCustomerAdapter;
use test_utils::{create_isolated_test_database, AddressFixtures, CustomerFixtures, StubAddressLookup};

#[tokio::test]
#[ignore = "requires docker"]
async fn save_address_never_overwrites() {
    let db = create_isolated_test_database().await.expect("database");
    let adapter = PostgresCustomerAdapter::new(db.pool().clone());

    let original = adapter.save_address(AddressFixtures::se()).await.expect("insert");
    let mut changed = AddressFixtures::se();
    changed.street = "Rua Trocada".to_string();
    let stored = adapter.save_address(changed).await.expect("insert again");

    assert_eq!(stored, original);
    assert_eq!(stored.street, "Praça da Sé");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn customer_lifecycle_round_trips_through_postgres() {
    let db = create_isolated_test_database().await.expect("database");
    let adapter = PostgresCustomerAdapter::new(db.pool().clone());
    adapter.save_address(AddressFixtures::se()).await.expect("address");
    adapter.save_address(AddressFixtures::paulista()).await.expect("address");

    let ana = adapter
        .save_customer(SaveCustomerRequest::insert("Ana", AddressFixtures::se()))
        .await
        .expect("insert");
    assert_eq!(ana.id, CustomerId::new(1));
    assert_eq!(ana.address, AddressFixtures::se());

    let moved = adapter
        .save_customer(SaveCustomerRequest::replace(ana.id, "Ana Maria", AddressFixtures::paulista()))
        .await
        .expect("update");
    assert_eq!(moved.id, ana.id);
    assert_eq!(moved.name, "Ana Maria");
    assert_eq!(moved.address, AddressFixtures::paulista());

    let all = adapter.find_all_customers().await.expect("list");
    assert_eq!(all, vec![moved.clone()]);

    assert!(adapter.delete_customer_by_id(ana.id).await.expect("delete"));
    assert!(!adapter.delete_customer_by_id(ana.id).await.expect("delete again"));
    assert!(adapter.find_customer_by_id(ana.id).await.expect("get").is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn customer_with_unstored_address_is_a_conflict() {
    let db = create_isolated_test_database().await.expect("database");
    let adapter = PostgresCustomerAdapter::new(db.pool().clone());

    let err = adapter
        .save_customer(SaveCustomerRequest::insert("Ana", AddressFixtures::copacabana()))
        .await
        .expect_err("foreign key");

    assert!(matches!(err, PortError::Conflict { .. }));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn replacing_missing_customer_is_not_found() {
    let db = create_isolated_test_database().await.expect("database");
    let adapter = PostgresCustomerAdapter::new(db.pool().clone());
    adapter.save_address(AddressFixtures::se()).await.expect("address");

    let err = adapter
        .save_customer(SaveCustomerRequest::replace(CustomerId::new(42), "Ana", AddressFixtures::se()))
        .await
        .expect_err("missing");

    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn service_resolves_once_per_postal_code() {
    let db = create_isolated_test_database().await.expect("database");
    let adapter = Arc::new(PostgresCustomerAdapter::new(db.pool().clone()));
    let lookup = StubAddressLookup::with_fixtures().into_shared();
    let resolver = Arc::new(AddressResolver::new(adapter.clone(), lookup.clone()));
    let service = CustomerService::new(adapter.clone(), resolver);

    let ana = service.insert(CustomerFixtures::ana()).await.expect("ana");
    let bia = service
        .insert(domain_customer::CustomerInput::new("Bia", "01001000"))
        .await
        .expect("bia");

    assert_eq!(ana.address, bia.address);
    assert_eq!(lookup.calls(), 1);
    assert_eq!(adapter.health_check().await.status, core_kernel::AdapterHealth::Healthy);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn ids_restart_after_clearing_data() {
    let db = create_isolated_test_database().await.expect("database");
    let adapter = PostgresCustomerAdapter::new(db.pool().clone());
    adapter.save_address(AddressFixtures::se()).await.expect("address");
    adapter
        .save_customer(SaveCustomerRequest::insert("Ana", AddressFixtures::se()))
        .await
        .expect("insert");

    db.clear_data().await.expect("truncate");

    assert!(adapter.find_all_customers().await.expect("list").is_empty());
    assert!(adapter
        .find_address_by_postal_code(&AddressFixtures::se().postal_code)
        .await
        .expect("address")
        .is_none());
    adapter.save_address(AddressFixtures::se()).await.expect("address");
    let first = adapter
        .save_customer(SaveCustomerRequest::insert("Bia", AddressFixtures::se()))
        .await
        .expect("insert");
    assert_eq!(first.id, CustomerId::new(1));
}
