//! Seed binary for populating the carwash database with sample data.
//!
//! Usage: cargo run --bin seed
//!
//! Reads from seed.toml in the project root and inserts users, carwashes,
//! services, vehicles and bookings into the database. Carwash rows keep
//! whatever status token the seed file gives them, including the legacy
//! variants, so the listing and the diagnostics see realistic data.

mod availability;
mod db;

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Deserialize)]
struct SeedData {
    #[serde(default)]
    users: Vec<SeedUser>,
    #[serde(default)]
    carwashes: Vec<SeedCarwash>,
    #[serde(default)]
    services: Vec<SeedService>,
    #[serde(default)]
    vehicles: Vec<SeedVehicle>,
    #[serde(default)]
    bookings: Vec<SeedBooking>,
}

#[derive(Debug, Deserialize)]
struct SeedUser {
    full_name: String,
    email: String,
    #[serde(default = "default_role")]
    role: String,
}

fn default_role() -> String {
    "customer".to_string()
}

#[derive(Debug, Deserialize)]
struct SeedCarwash {
    name: String,
    owner_email: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    is_active: Option<i64>,
    #[serde(default)]
    average_rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SeedService {
    carwash: String,
    name: String,
    price: f64,
    #[serde(default = "default_duration")]
    duration: i64,
}

fn default_duration() -> i64 {
    30
}

#[derive(Debug, Deserialize)]
struct SeedVehicle {
    owner_email: String,
    brand: String,
    model: String,
    license_plate: String,
    #[serde(default)]
    year: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SeedBooking {
    customer_email: String,
    carwash: String,
    #[serde(default)]
    service: Option<String>,
    booking_date: String,
    booking_time: String,
    #[serde(default = "default_booking_status")]
    status: String,
    #[serde(default)]
    total_price: Option<f64>,
    #[serde(default)]
    vehicle_plate: Option<String>,
}

fn default_booking_status() -> String {
    "pending".to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("🌱 Seeding database...");

    // Load environment
    let _ = dotenvy::EnvLoader::new().load();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:carwash.db?mode=rwc".to_string());
    let pool = db::init_db(&database_url).await?;
    println!("📦 Connected to database: {}", database_url);

    // Read seed file
    let seed_content = fs::read_to_string("seed.toml")?;
    let seed_data: SeedData = toml::from_str(&seed_content)?;

    // Later sections reference earlier ones by email or name
    let mut user_ids: HashMap<String, i64> = HashMap::new();
    let mut carwash_ids: HashMap<String, i64> = HashMap::new();

    println!("📋 Found {} users to seed", seed_data.users.len());
    for user in &seed_data.users {
        match db::insert_user(&pool, &user.full_name, &user.email, &user.role).await {
            Ok(id) => {
                user_ids.insert(user.email.clone(), id);
                println!("  ✓ Created user: {} (id: {})", user.full_name, id);
            }
            Err(e) => println!("  ✗ Failed to create user {}: {}", user.email, e),
        }
    }

    println!("📋 Found {} carwashes to seed", seed_data.carwashes.len());
    for carwash in &seed_data.carwashes {
        let Some(&owner_id) = user_ids.get(&carwash.owner_email) else {
            println!(
                "  ✗ Skipping carwash {}: unknown owner {}",
                carwash.name, carwash.owner_email
            );
            continue;
        };

        let new_carwash = db::NewCarwash {
            user_id: owner_id,
            name: carwash.name.clone(),
            address: carwash.address.clone(),
            city: carwash.city.clone(),
            phone: carwash.phone.clone(),
            status: carwash.status.clone(),
            is_active: carwash.is_active,
            average_rating: carwash.average_rating.unwrap_or(0.0),
        };

        match db::insert_carwash(&pool, &new_carwash).await {
            Ok(id) => {
                carwash_ids.insert(carwash.name.clone(), id);
                println!("  ✓ Created carwash: {} (id: {})", carwash.name, id);
            }
            Err(e) => println!("  ✗ Failed to create carwash {}: {}", carwash.name, e),
        }
    }

    println!("📋 Found {} services to seed", seed_data.services.len());
    let mut service_ids: HashMap<(i64, String), i64> = HashMap::new();
    for service in &seed_data.services {
        let Some(&carwash_id) = carwash_ids.get(&service.carwash) else {
            println!(
                "  ✗ Skipping service {}: unknown carwash {}",
                service.name, service.carwash
            );
            continue;
        };

        match db::insert_service(&pool, carwash_id, &service.name, service.price, service.duration).await {
            Ok(id) => {
                service_ids.insert((carwash_id, service.name.clone()), id);
                println!("  ✓ Created service: {} ({})", service.name, service.carwash);
            }
            Err(e) => println!("  ✗ Failed to create service {}: {}", service.name, e),
        }
    }

    println!("📋 Found {} vehicles to seed", seed_data.vehicles.len());
    for vehicle in &seed_data.vehicles {
        let Some(&owner_id) = user_ids.get(&vehicle.owner_email) else {
            println!(
                "  ✗ Skipping vehicle {}: unknown owner {}",
                vehicle.license_plate, vehicle.owner_email
            );
            continue;
        };

        match db::insert_vehicle(
            &pool,
            owner_id,
            &vehicle.brand,
            &vehicle.model,
            &vehicle.license_plate,
            vehicle.year,
        )
        .await
        {
            Ok(_) => println!(
                "  ✓ Created vehicle: {} {} ({})",
                vehicle.brand, vehicle.model, vehicle.license_plate
            ),
            Err(e) => println!("  ✗ Failed to create vehicle {}: {}", vehicle.license_plate, e),
        }
    }

    println!("📋 Found {} bookings to seed", seed_data.bookings.len());
    for booking in &seed_data.bookings {
        let Some(&user_id) = user_ids.get(&booking.customer_email) else {
            println!(
                "  ✗ Skipping booking: unknown customer {}",
                booking.customer_email
            );
            continue;
        };
        let Some(&carwash_id) = carwash_ids.get(&booking.carwash) else {
            println!("  ✗ Skipping booking: unknown carwash {}", booking.carwash);
            continue;
        };
        let service_id = booking
            .service
            .as_ref()
            .and_then(|name| service_ids.get(&(carwash_id, name.clone())).copied());

        let new_booking = db::NewBooking {
            user_id,
            carwash_id,
            service_id,
            booking_date: booking.booking_date.clone(),
            booking_time: booking.booking_time.clone(),
            status: booking.status.clone(),
            total_price: booking.total_price.unwrap_or(0.0),
            vehicle_plate: booking.vehicle_plate.clone(),
        };

        match db::insert_booking(&pool, &new_booking).await {
            Ok(id) => println!(
                "  ✓ Created booking: {} @ {} {} (id: {})",
                booking.carwash, booking.booking_date, booking.booking_time, id
            ),
            Err(e) => println!("  ✗ Failed to create booking at {}: {}", booking.carwash, e),
        }
    }

    println!("✅ Seeding complete!");

    Ok(())
}
