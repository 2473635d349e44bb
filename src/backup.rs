//! Backup binary for copying the carwash database to a backup file.
//!
//! Usage: cargo run --bin backup
//!        cargo run --bin backup -- --target my_backup.db
//!        cargo run --bin backup -- --db sqlite:other.db --target backup.db
//!
//! Creates a backup of all database entries to a new file.

mod availability;
mod db;

use anyhow::Result;
use chrono::Datelike;
use clap::Parser;
use dotenvy::EnvLoader;

#[derive(Parser, Debug)]
#[command(name = "backup")]
#[command(about = "Backup the carwash database to a new file")]
struct Args {
    /// Source database URL (overrides DATABASE_URL from .env)
    #[arg(long)]
    db: Option<String>,

    /// Target backup file path (default: backup_{year}_{month}_{day}.db)
    #[arg(long)]
    target: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load .env file
    let dotenv = EnvLoader::new()
        .load()
        .unwrap_or_default();

    // Get source database URL
    let source_url = args.db
        .or_else(|| dotenv.get("DATABASE_URL").cloned())
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:carwash.db?mode=rwc".to_string());

    // Generate target filename
    let now = chrono::Utc::now();
    let default_target = format!("backup_{}_{:02}_{:02}.db", now.year(), now.month(), now.day());
    let target_file = args.target.unwrap_or(default_target);
    let target_url = format!("sqlite:{}?mode=rwc", target_file);

    println!("Source database: {}", source_url);
    println!("Target backup: {}", target_file);

    // Connect to source database
    println!("Connecting to source database...");
    let source_pool = db::init_db(&source_url).await?;

    // Create and connect to target database (init_db creates tables)
    println!("Creating target database...");
    let target_pool = db::init_db(&target_url).await?;

    // Copy users
    println!("Copying users...");
    let users: Vec<(i64, String, String, String, Option<String>)> =
        sqlx::query_as("SELECT id, full_name, email, role, created_at FROM users")
            .fetch_all(&source_pool)
            .await?;

    for user in &users {
        sqlx::query("INSERT INTO users (id, full_name, email, role, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(user.0)
            .bind(&user.1)
            .bind(&user.2)
            .bind(&user.3)
            .bind(&user.4)
            .execute(&target_pool)
            .await?;
    }
    println!("  Copied {} users", users.len());

    // Copy carwashes
    println!("Copying carwashes...");
    let carwashes: Vec<(i64, i64, String, Option<String>, Option<String>, Option<String>, Option<String>, Option<i64>, f64, Option<String>, Option<String>)> =
        sqlx::query_as(
            "SELECT id, user_id, name, address, city, phone, status, is_active, average_rating, created_at, updated_at FROM carwashes"
        )
        .fetch_all(&source_pool)
        .await?;

    for carwash in &carwashes {
        sqlx::query(
            "INSERT INTO carwashes (id, user_id, name, address, city, phone, status, is_active, average_rating, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(carwash.0)
        .bind(carwash.1)
        .bind(&carwash.2)
        .bind(&carwash.3)
        .bind(&carwash.4)
        .bind(&carwash.5)
        .bind(&carwash.6)
        .bind(carwash.7)
        .bind(carwash.8)
        .bind(&carwash.9)
        .bind(&carwash.10)
        .execute(&target_pool)
        .await?;
    }
    println!("  Copied {} carwashes", carwashes.len());

    // Copy services
    println!("Copying services...");
    let services: Vec<(i64, i64, String, f64, i64)> =
        sqlx::query_as("SELECT id, carwash_id, name, price, duration FROM services")
            .fetch_all(&source_pool)
            .await?;

    for service in &services {
        sqlx::query("INSERT INTO services (id, carwash_id, name, price, duration) VALUES (?, ?, ?, ?, ?)")
            .bind(service.0)
            .bind(service.1)
            .bind(&service.2)
            .bind(service.3)
            .bind(service.4)
            .execute(&target_pool)
            .await?;
    }
    println!("  Copied {} services", services.len());

    // Copy bookings
    println!("Copying bookings...");
    let bookings: Vec<(i64, i64, i64, Option<i64>, String, String, String, f64, Option<String>, Option<String>, Option<String>)> =
        sqlx::query_as(
            "SELECT id, user_id, carwash_id, service_id, booking_date, booking_time, status, total_price, vehicle_plate, created_at, completed_at FROM bookings"
        )
        .fetch_all(&source_pool)
        .await?;

    for booking in &bookings {
        sqlx::query(
            "INSERT INTO bookings (id, user_id, carwash_id, service_id, booking_date, booking_time, status, total_price, vehicle_plate, created_at, completed_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(booking.0)
        .bind(booking.1)
        .bind(booking.2)
        .bind(booking.3)
        .bind(&booking.4)
        .bind(&booking.5)
        .bind(&booking.6)
        .bind(booking.7)
        .bind(&booking.8)
        .bind(&booking.9)
        .bind(&booking.10)
        .execute(&target_pool)
        .await?;
    }
    println!("  Copied {} bookings", bookings.len());

    // Copy vehicles
    println!("Copying vehicles...");
    let vehicles: Vec<(i64, i64, String, String, String, Option<i64>)> =
        sqlx::query_as("SELECT id, user_id, brand, model, license_plate, year FROM user_vehicles")
            .fetch_all(&source_pool)
            .await?;

    for vehicle in &vehicles {
        sqlx::query("INSERT INTO user_vehicles (id, user_id, brand, model, license_plate, year) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(vehicle.0)
            .bind(vehicle.1)
            .bind(&vehicle.2)
            .bind(&vehicle.3)
            .bind(&vehicle.4)
            .bind(vehicle.5)
            .execute(&target_pool)
            .await?;
    }
    println!("  Copied {} vehicles", vehicles.len());

    println!("\nBackup completed successfully!");
    println!("Backup saved to: {}", target_file);

    Ok(())
}
