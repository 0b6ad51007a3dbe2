/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login, registration, and current-user endpoints
/// - `users`: User administration endpoints
/// - `products`: Inventory catalogue endpoints
/// - `suppliers`: Supplier directory endpoints
/// - `tasks`: Task lifecycle and per-user view endpoints
/// - `dashboard`: Aggregate count endpoint

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod products;
pub mod suppliers;
pub mod tasks;
pub mod users;

use serde::Deserialize;

/// The `?username=` query parameter carrying the acting user
#[derive(Debug, Deserialize)]
pub struct ActorQuery {
    pub username: String,
}

/// The `?name=` query parameter for the search endpoints
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}
