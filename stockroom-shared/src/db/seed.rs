/// Demo data seeding
///
/// Runs at startup after migrations. Each table is seeded only when it is
/// empty, so restarting against an existing database never duplicates or
/// resets anything the operator has changed since.

use crate::error::{ServiceError, ServiceResult};
use crate::models::product::{Product, ProductInput};
use crate::models::supplier::{Supplier, SupplierInput};
use crate::models::user::{CreateUser, Role, User};
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Seeds the demo accounts, catalogue, and supplier directory
pub async fn seed_database(pool: &PgPool) -> ServiceResult<()> {
    seed_users(pool).await?;
    seed_products(pool).await?;
    seed_suppliers(pool).await?;

    Ok(())
}

async fn seed_users(pool: &PgPool) -> ServiceResult<()> {
    if User::count(pool).await? > 0 {
        return Ok(());
    }

    let accounts = [
        ("admin", "admin@example.com", Role::Admin),
        ("manager1", "manager@example.com", Role::Manager),
        ("staff1", "staff@example.com", Role::Staff),
    ];

    for (username, email, role) in accounts {
        User::create(
            pool,
            CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password: "password123".to_string(),
                role,
            },
        )
        .await?;
    }

    tracing::info!("Seeded {} demo users", accounts.len());

    Ok(())
}

async fn seed_products(pool: &PgPool) -> ServiceResult<()> {
    if Product::count(pool).await? > 0 {
        return Ok(());
    }

    // The demo catalogue belongs to the admin account created above.
    let admin = User::find_by_username(pool, "admin")
        .await?
        .ok_or_else(|| ServiceError::NotFound("Seed user 'admin' not found".to_string()))?;

    let products = [
        ("Laptop", "Electronics", 25, Decimal::new(99_999, 2), 10),
        ("Office Chair", "Furniture", 5, Decimal::new(19_999, 2), 10),
        ("Notebook", "Stationery", 150, Decimal::new(299, 2), 50),
    ];

    for (name, category, stock, price, low_stock_threshold) in products {
        Product::create(
            pool,
            ProductInput {
                name: name.to_string(),
                category: Some(category.to_string()),
                stock,
                price,
                low_stock_threshold,
            },
            admin.id,
        )
        .await?;
    }

    tracing::info!("Seeded {} demo products", products.len());

    Ok(())
}

async fn seed_suppliers(pool: &PgPool) -> ServiceResult<()> {
    if Supplier::count(pool).await? > 0 {
        return Ok(());
    }

    let suppliers = [
        ("TechCorp", "John Doe", "contact@techcorp.com", "123-456-7890"),
        (
            "OfficeSupply Co",
            "Jane Smith",
            "info@officesupply.com",
            "987-654-3210",
        ),
    ];

    for (name, contact, email, phone) in suppliers {
        Supplier::create(
            pool,
            SupplierInput {
                name: name.to_string(),
                contact: Some(contact.to_string()),
                email: Some(email.to_string()),
                phone: Some(phone.to_string()),
            },
        )
        .await?;
    }

    tracing::info!("Seeded {} demo suppliers", suppliers.len());

    Ok(())
}
