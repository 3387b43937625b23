//! Address types

use serde::{Deserialize, Serialize};

use core_kernel::PostalCode;

/// A postal address, keyed by its postal code
///
/// Addresses are created from lookup results and shared by every customer
/// that references the same postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub postal_code: PostalCode,
    pub street: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    /// Municipality code assigned by IBGE
    pub ibge_code: Option<String>,
    /// Telephone area code (DDD)
    pub area_code: Option<String>,
}

impl Address {
    /// Creates a new address
    pub fn new(
        postal_code: impl Into<PostalCode>,
        street: impl Into<String>,
        neighborhood: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            postal_code: postal_code.into(),
            street: street.into(),
            complement: None,
            neighborhood: neighborhood.into(),
            city: city.into(),
            state: state.into(),
            ibge_code: None,
            area_code: None,
        }
    }

    /// The value a lookup returns for a postal code it does not know
    pub fn unresolved() -> Self {
        Self::new(PostalCode::empty(), "", "", "", "")
    }

    /// Returns true if this is the "not found" sentinel
    pub fn is_unresolved(&self) -> bool {
        self.postal_code.is_empty()
    }

    /// Formats address for display
    pub fn format(&self) -> String {
        let mut first_line = self.street.clone();
        if let Some(complement) = self.complement.as_deref().filter(|c| !c.is_empty()) {
            first_line.push_str(", ");
            first_line.push_str(complement);
        }
        let mut lines = vec![first_line];
        if !self.neighborhood.is_empty() {
            lines.push(self.neighborhood.clone());
        }
        lines.push(format!("{} - {}", self.city, self.state));
        lines.push(self.postal_code.to_string());
        lines.join("\n")
    }
}
