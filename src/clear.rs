//! Clear binary for resetting the carwash database.
//!
//! Usage: cargo run --bin clear
//!
//! Deletes all entries from all database tables.

mod availability;
mod db;

use anyhow::Result;
use dotenvy::EnvLoader;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let dotenv = EnvLoader::new()
        .load()
        .unwrap_or_default();

    // Get database URL
    let database_url = dotenv.get("DATABASE_URL")
        .cloned()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:carwash.db?mode=rwc".to_string());

    println!("Connecting to database: {}", database_url);

    // Initialize database connection
    let pool = db::init_db(&database_url).await?;

    // Clear all tables, children before parents
    println!("Clearing bookings table...");
    sqlx::query("DELETE FROM bookings")
        .execute(&pool)
        .await?;

    println!("Clearing user_vehicles table...");
    sqlx::query("DELETE FROM user_vehicles")
        .execute(&pool)
        .await?;

    println!("Clearing services table...");
    sqlx::query("DELETE FROM services")
        .execute(&pool)
        .await?;

    println!("Clearing carwashes table...");
    sqlx::query("DELETE FROM carwashes")
        .execute(&pool)
        .await?;

    println!("Clearing users table...");
    sqlx::query("DELETE FROM users")
        .execute(&pool)
        .await?;

    println!("All tables cleared successfully!");

    Ok(())
}
