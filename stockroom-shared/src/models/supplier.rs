/// Supplier model and database operations
///
/// The supplier directory is a flat CRUD surface with a name search.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE suppliers (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     contact VARCHAR(255),
///     email VARCHAR(255),
///     phone VARCHAR(50)
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Supplier model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    /// Unique supplier ID
    pub id: i64,

    /// Company name
    pub name: String,

    /// Contact person
    pub contact: Option<String>,

    /// Contact email
    pub email: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,
}

/// Client-supplied supplier fields, used for both create and full update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInput {
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Supplier {
    /// Creates a new supplier
    pub async fn create(pool: &PgPool, data: SupplierInput) -> Result<Self, sqlx::Error> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, contact, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, contact, email, phone
            "#,
        )
        .bind(data.name)
        .bind(data.contact)
        .bind(data.email)
        .bind(data.phone)
        .fetch_one(pool)
        .await?;

        Ok(supplier)
    }

    /// Finds a supplier by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, contact, email, phone FROM suppliers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(supplier)
    }

    /// Lists all suppliers
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, contact, email, phone FROM suppliers ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        Ok(suppliers)
    }

    /// Replaces the fields of an existing supplier
    ///
    /// # Returns
    ///
    /// The updated supplier if found, `None` if the supplier doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: SupplierInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = $2, contact = $3, email = $4, phone = $5
            WHERE id = $1
            RETURNING id, name, contact, email, phone
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.contact)
        .bind(data.email)
        .bind(data.phone)
        .fetch_optional(pool)
        .await?;

        Ok(supplier)
    }

    /// Deletes a supplier
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a supplier with the given ID exists
    pub async fn exists_by_id(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM suppliers WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Searches suppliers by name, case-insensitive substring match
    pub async fn find_by_name_contains(pool: &PgPool, name: &str) -> Result<Vec<Self>, sqlx::Error> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, contact, email, phone FROM suppliers \
             WHERE name ILIKE '%' || $1 || '%' ORDER BY id",
        )
        .bind(name)
        .fetch_all(pool)
        .await?;

        Ok(suppliers)
    }

    /// Counts total number of suppliers
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM suppliers")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_input_allows_sparse_bodies() {
        let input: SupplierInput = serde_json::from_str(r#"{"name": "TechCorp"}"#).unwrap();
        assert_eq!(input.name, "TechCorp");
        assert!(input.contact.is_none());
        assert!(input.phone.is_none());
    }
}
