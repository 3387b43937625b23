//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for addresses and customers.
//! These fixtures are designed to be consistent and predictable for unit tests.

use core_kernel::PostalCode;
use domain_customer::{Address, CustomerInput};

/// Fixture for address test data
pub struct AddressFixtures;

impl AddressFixtures {
    /// Praça da Sé, São Paulo (01001-000)
    pub fn se() -> Address {
        Address {
            postal_code: PostalCode::new("01001-000"),
            street: "Praça da Sé".to_string(),
            complement: Some("lado ímpar".to_string()),
            neighborhood: "Sé".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            ibge_code: Some("3550308".to_string()),
            area_code: Some("11".to_string()),
        }
    }

    /// Avenida Paulista, São Paulo (01310-100)
    pub fn paulista() -> Address {
        Address {
            postal_code: PostalCode::new("01310-100"),
            street: "Avenida Paulista".to_string(),
            complement: Some("de 612 a 1510 - lado par".to_string()),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            ibge_code: Some("3550308".to_string()),
            area_code: Some("11".to_string()),
        }
    }

    /// Avenida Atlântica, Rio de Janeiro (22021-001)
    pub fn copacabana() -> Address {
        Address {
            postal_code: PostalCode::new("22021-001"),
            street: "Avenida Atlântica".to_string(),
            complement: None,
            neighborhood: "Copacabana".to_string(),
            city: "Rio de Janeiro".to_string(),
            state: "RJ".to_string(),
            ibge_code: Some("3304557".to_string()),
            area_code: Some("21".to_string()),
        }
    }

    /// Every known address
    pub fn all() -> Vec<Address> {
        vec![Self::se(), Self::paulista(), Self::copacabana()]
    }
}

/// Fixture for postal code test data
pub struct PostalCodeFixtures;

impl PostalCodeFixtures {
    /// A well-formed code no lookup service knows
    pub fn unknown() -> PostalCode {
        PostalCode::new("99999-999")
    }

    /// A code that is not a CEP at all
    pub fn malformed() -> PostalCode {
        PostalCode::new("12")
    }
}

/// Fixture for customer input test data
pub struct CustomerFixtures;

impl CustomerFixtures {
    /// Ana, living at Praça da Sé
    pub fn ana() -> CustomerInput {
        CustomerInput::new("Ana", "01001-000")
    }

    /// Bruno, living on Avenida Paulista
    pub fn bruno() -> CustomerInput {
        CustomerInput::new("Bruno", "01310-100")
    }

    /// Carla, with a postal code no lookup knows
    pub fn carla_unknown_address() -> CustomerInput {
        CustomerInput::new("Carla", PostalCodeFixtures::unknown())
    }
}
