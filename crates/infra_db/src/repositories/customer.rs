//! Customer repository implementation
//!
//! Customers reference their address by postal code; every read joins the
//! `addresses` table so callers always get the full address back.

use sqlx::PgPool;

use crate::error::DatabaseError;
use crate::repositories::address::AddressRow;

/// A customer joined with its address
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CustomerWithAddressRow {
    pub id: i64,
    pub name: String,
    #[sqlx(flatten)]
    pub address: AddressRow,
}

const SELECT_CUSTOMER: &str = r#"
    SELECT c.id, c.name,
           a.postal_code, a.street, a.complement, a.neighborhood, a.city, a.state,
           a.ibge_code, a.area_code
    FROM customers c
    JOIN addresses a ON a.postal_code = c.address_postal_code
"#;

/// Repository for the `customers` table
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists every customer, ordered by id
    pub async fn list(&self) -> Result<Vec<CustomerWithAddressRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, CustomerWithAddressRow>(&format!(
            "{SELECT_CUSTOMER} ORDER BY c.id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Retrieves a customer by id
    pub async fn get_by_id(&self, id: i64) -> Result<Option<CustomerWithAddressRow>, DatabaseError> {
        let row = sqlx::query_as::<_, CustomerWithAddressRow>(&format!(
            "{SELECT_CUSTOMER} WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts a customer and returns the assigned id
    ///
    /// # Errors
    ///
    /// `DatabaseError::ForeignKeyViolation` if the postal code is not stored
    pub async fn insert(&self, name: &str, postal_code: &str) -> Result<i64, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO customers (name, address_postal_code)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(postal_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Replaces the name and address of an existing customer
    ///
    /// # Returns
    ///
    /// Whether a row with `id` existed
    pub async fn update(&self, id: i64, name: &str, postal_code: &str) -> Result<bool, DatabaseError> {
        let affected = sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, address_postal_code = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(postal_code)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    /// Deletes a customer, returning whether it existed
    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let affected = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}
