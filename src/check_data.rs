//! Prints a sample of every table for manual inspection.
//!
//! Usage: cargo run --bin check-data

mod availability;
mod db;

use anyhow::Result;
use dotenvy::EnvLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = EnvLoader::new()
        .load()
        .unwrap_or_default();

    let database_url = dotenv.get("DATABASE_URL")
        .cloned()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:carwash.db?mode=rwc".to_string());

    let pool = db::init_db(&database_url).await?;

    println!("=== EXISTING CUSTOMER USERS ===");
    let customers: Vec<db::DbUser> =
        sqlx::query_as("SELECT * FROM users WHERE role = 'customer' LIMIT 5")
            .fetch_all(&pool)
            .await?;
    for user in &customers {
        println!("ID: {}, Name: {}, Email: {}", user.id, user.full_name, user.email);
    }

    println!();
    println!("=== EXISTING CARWASH OWNERS ===");
    let owners: Vec<db::DbUser> =
        sqlx::query_as("SELECT * FROM users WHERE role = 'carwash' LIMIT 5")
            .fetch_all(&pool)
            .await?;
    for user in &owners {
        println!("ID: {}, Name: {}, Email: {}", user.id, user.full_name, user.email);
    }

    println!();
    println!("=== EXISTING CARWASHES ===");
    let carwashes: Vec<db::DbCarwash> = sqlx::query_as("SELECT * FROM carwashes LIMIT 5")
        .fetch_all(&pool)
        .await?;
    for carwash in &carwashes {
        println!(
            "ID: {}, Name: {}, City: {}, Status: {}, is_active: {}, Listed: {}",
            carwash.id,
            carwash.name,
            carwash.city.as_deref().unwrap_or("-"),
            carwash.status.as_deref().unwrap_or("NULL"),
            carwash.is_active.map(|v| v.to_string()).unwrap_or_else(|| "NULL".to_string()),
            if carwash.is_visible() { "yes" } else { "no" }
        );
    }

    println!();
    println!("=== EXISTING SERVICES ===");
    let services: Vec<db::DbService> = sqlx::query_as("SELECT * FROM services LIMIT 5")
        .fetch_all(&pool)
        .await?;
    for service in &services {
        println!(
            "ID: {}, Name: {}, Price: {:.2}, Duration: {} min",
            service.id, service.name, service.price, service.duration
        );
    }

    println!();
    println!("=== EXISTING VEHICLES ===");
    let vehicles: Vec<(i64, i64, String, String, String)> =
        sqlx::query_as("SELECT id, user_id, brand, model, license_plate FROM user_vehicles LIMIT 5")
            .fetch_all(&pool)
            .await?;
    for (id, user_id, brand, model, plate) in &vehicles {
        println!("ID: {}, User: {}, Vehicle: {} {} ({})", id, user_id, brand, model, plate);
    }

    println!();
    println!("=== EXISTING BOOKINGS ===");
    let bookings: Vec<(i64, i64, i64, String, String, String)> = sqlx::query_as(
        "SELECT id, user_id, carwash_id, status, booking_date, booking_time FROM bookings LIMIT 5",
    )
    .fetch_all(&pool)
    .await?;
    for (id, user_id, carwash_id, status, date, time) in &bookings {
        println!(
            "ID: {}, User: {}, Carwash: {}, Status: {}, Time: {} {}",
            id, user_id, carwash_id, status, date, time
        );
    }

    Ok(())
}
