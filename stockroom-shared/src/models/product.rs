/// Product model and database operations
///
/// Products form the inventory catalogue. A product is "low-stock" iff
/// `stock <= low_stock_threshold`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     category VARCHAR(255),
///     stock INTEGER NOT NULL DEFAULT 0,
///     price NUMERIC(12, 2) NOT NULL DEFAULT 0,
///     low_stock_threshold INTEGER NOT NULL DEFAULT 10,
///     user_id BIGINT REFERENCES users(id) ON DELETE SET NULL
/// );
/// ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID
    pub id: i64,

    /// Product name
    pub name: String,

    /// Category label (free-form)
    pub category: Option<String>,

    /// Units currently in stock
    pub stock: i32,

    /// Unit price
    pub price: Decimal,

    /// Stock level at or below which the product counts as low-stock
    pub low_stock_threshold: i32,

    /// ID of the user who created the product (null if that user was deleted)
    pub user_id: Option<i64>,
}

/// Client-supplied product fields, used for both create and full update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
}

fn default_low_stock_threshold() -> i32 {
    10
}

const PRODUCT_COLUMNS: &str = "id, name, category, stock, price, low_stock_threshold, user_id";

impl Product {
    /// Creates a new product owned by the given user
    pub async fn create(
        pool: &PgPool,
        data: ProductInput,
        user_id: i64,
    ) -> Result<Self, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, category, stock, price, low_stock_threshold, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.category)
        .bind(data.stock)
        .bind(data.price)
        .bind(data.low_stock_threshold)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(product)
    }

    /// Finds a product by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Lists all products
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Replaces the client-editable fields of an existing product
    ///
    /// The creator reference is never changed through this path.
    ///
    /// # Returns
    ///
    /// The updated product if found, `None` if the product doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: ProductInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products \
             SET name = $2, category = $3, stock = $4, price = $5, low_stock_threshold = $6 \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.category)
        .bind(data.stock)
        .bind(data.price)
        .bind(data.low_stock_threshold)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Deletes a product
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a product with the given ID exists
    pub async fn exists_by_id(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Lists products in a category (exact match)
    pub async fn find_by_category(pool: &PgPool, category: &str) -> Result<Vec<Self>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY id"
        ))
        .bind(category)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Searches products by name, case-insensitive substring match
    pub async fn find_by_name_contains(pool: &PgPool, name: &str) -> Result<Vec<Self>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name ILIKE '%' || $1 || '%' ORDER BY id"
        ))
        .bind(name)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Lists products at or below their low-stock threshold
    pub async fn find_low_stock(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE stock <= low_stock_threshold ORDER BY id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Counts products at or below their low-stock threshold
    pub async fn count_low_stock(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE stock <= low_stock_threshold")
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Counts total number of products
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_input_defaults() {
        let input: ProductInput = serde_json::from_str(r#"{"name": "Laptop"}"#).unwrap();
        assert_eq!(input.stock, 0);
        assert_eq!(input.low_stock_threshold, 10);
        assert!(input.category.is_none());
    }

    #[test]
    fn test_product_wire_names_are_camel_case() {
        let input: ProductInput = serde_json::from_str(
            r#"{"name": "Chair", "category": "Furniture", "stock": 5,
                "price": 199.99, "lowStockThreshold": 10}"#,
        )
        .unwrap();
        assert_eq!(input.low_stock_threshold, 10);
        assert_eq!(input.stock, 5);
    }
}
