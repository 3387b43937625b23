//! Address repository implementation
//!
//! Addresses are keyed by postal code and never updated once written:
//! inserts use `ON CONFLICT DO NOTHING` so concurrent writers of the same
//! postal code all end up reading the first row.

use sqlx::PgPool;
use tracing::debug;

use crate::error::DatabaseError;

/// A row of the `addresses` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AddressRow {
    pub postal_code: String,
    pub street: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub ibge_code: Option<String>,
    pub area_code: Option<String>,
}

/// Repository for the `addresses` table
#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

impl AddressRepository {
    /// Creates a new AddressRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves an address by postal code
    pub async fn find_by_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<Option<AddressRow>, DatabaseError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r#"
            SELECT postal_code, street, complement, neighborhood, city, state,
                   ibge_code, area_code
            FROM addresses
            WHERE postal_code = $1
            "#,
        )
        .bind(postal_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts the address unless its postal code is already stored
    ///
    /// # Returns
    ///
    /// The row stored under the postal code afterwards, which is the
    /// pre-existing one if there was a conflict
    pub async fn insert_if_absent(&self, address: &AddressRow) -> Result<AddressRow, DatabaseError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO addresses (
                postal_code, street, complement, neighborhood, city, state,
                ibge_code, area_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (postal_code) DO NOTHING
            "#,
        )
        .bind(&address.postal_code)
        .bind(&address.street)
        .bind(&address.complement)
        .bind(&address.neighborhood)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.ibge_code)
        .bind(&address.area_code)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            debug!(postal_code = %address.postal_code, "Address already stored, keeping existing row");
        }

        self.find_by_postal_code(&address.postal_code)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Address", &address.postal_code))
    }
}
