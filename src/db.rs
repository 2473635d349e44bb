use anyhow::Result;
use sqlx::{FromRow, sqlite::SqlitePool};

use crate::availability;

pub type DbPool = SqlitePool;

pub async fn init_db(database_url: &str) -> Result<DbPool> {
    let pool = SqlitePool::connect(database_url).await?;
    create_tables(&pool).await?;
    Ok(pool)
}

async fn create_tables(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            role TEXT NOT NULL DEFAULT 'customer',
            created_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS carwashes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            address TEXT,
            city TEXT,
            phone TEXT,
            -- free text, historically inconsistent ('Açık', 'open', '1', NULL...)
            status TEXT,
            is_active INTEGER,
            average_rating REAL NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            carwash_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            price REAL NOT NULL,
            duration INTEGER NOT NULL DEFAULT 30,
            FOREIGN KEY (carwash_id) REFERENCES carwashes(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            carwash_id INTEGER NOT NULL,
            service_id INTEGER,
            booking_date TEXT NOT NULL,
            booking_time TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            total_price REAL NOT NULL DEFAULT 0,
            vehicle_plate TEXT,
            created_at TEXT,
            completed_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id),
            FOREIGN KEY (carwash_id) REFERENCES carwashes(id),
            FOREIGN KEY (service_id) REFERENCES services(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_vehicles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            brand TEXT NOT NULL,
            model TEXT NOT NULL,
            license_plate TEXT NOT NULL,
            year INTEGER,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[derive(Debug, Clone, FromRow)]
pub struct DbCarwash {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub is_active: Option<i64>,
    pub average_rating: f64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl DbCarwash {
    pub fn status_kind(&self) -> availability::StatusKind {
        availability::classify_status(self.status.as_deref())
    }

    /// Applies the customer visibility rule to this row.
    pub fn is_visible(&self) -> bool {
        availability::is_carwash_visible(self.status.as_deref(), self.is_active)
    }
}

#[derive(Debug, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub created_at: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct DbService {
    pub id: i64,
    pub carwash_id: i64,
    pub name: String,
    pub price: f64,
    pub duration: i64,
}

// Booking row joined with its service name for display.
#[derive(Debug, FromRow)]
pub struct BookingSummary {
    pub id: i64,
    pub booking_date: String,
    pub booking_time: String,
    pub status: String,
    pub total_price: f64,
    pub vehicle_plate: Option<String>,
    pub service_name: Option<String>,
}

// Get a carwash by ID
pub async fn get_carwash(pool: &DbPool, carwash_id: i64) -> Result<Option<DbCarwash>> {
    let carwash = sqlx::query_as("SELECT * FROM carwashes WHERE id = ?")
        .bind(carwash_id)
        .fetch_optional(pool)
        .await?;
    Ok(carwash)
}

// Get the first carwash row (lowest id), used by diagnostics when no id is given
pub async fn first_carwash(pool: &DbPool) -> Result<Option<DbCarwash>> {
    let carwash = sqlx::query_as("SELECT * FROM carwashes ORDER BY id LIMIT 1")
        .fetch_optional(pool)
        .await?;
    Ok(carwash)
}

// Get all carwashes, sorted by name
pub async fn get_all_carwashes(pool: &DbPool) -> Result<Vec<DbCarwash>> {
    let carwashes = sqlx::query_as("SELECT * FROM carwashes ORDER BY name COLLATE NOCASE")
        .fetch_all(pool)
        .await?;
    Ok(carwashes)
}

// Get total count of carwashes for pagination
pub async fn get_carwash_count(pool: &DbPool) -> Result<i64> {
    let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM carwashes")
        .fetch_one(pool)
        .await?;
    Ok(result.0)
}

// Get paginated carwashes, sorted by the given column
pub async fn get_carwashes_paginated(
    pool: &DbPool,
    sort: &str,
    offset: i64,
    limit: i64,
) -> Result<Vec<DbCarwash>> {
    let order_by = match sort {
        "city" => "city COLLATE NOCASE, name COLLATE NOCASE",
        _ => "name COLLATE NOCASE",
    };

    let query = format!("SELECT * FROM carwashes ORDER BY {} LIMIT ? OFFSET ?", order_by);
    let carwashes = sqlx::query_as(&query)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(carwashes)
}

/// Carwashes the customer listing shows, sorted by name.
///
/// The visibility rule is applied per-row in Rust rather than translated
/// to SQL: SQLite's LOWER() only folds ASCII, so upper-case Turkish
/// tokens would slip through a SQL predicate that the evaluator catches.
pub async fn visible_carwashes(pool: &DbPool) -> Result<Vec<DbCarwash>> {
    let carwashes = get_all_carwashes(pool).await?;
    Ok(carwashes.into_iter().filter(DbCarwash::is_visible).collect())
}

// Set a carwash's status and activity flag; updated_at is bumped on every write
pub async fn set_carwash_status(
    pool: &DbPool,
    carwash_id: i64,
    status: Option<&str>,
    is_active: i64,
) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query("UPDATE carwashes SET status = ?, is_active = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(is_active)
        .bind(now)
        .bind(carwash_id)
        .execute(pool)
        .await?;
    Ok(())
}

// Get all services offered by a carwash
pub async fn services_for_carwash(pool: &DbPool, carwash_id: i64) -> Result<Vec<DbService>> {
    let services = sqlx::query_as("SELECT * FROM services WHERE carwash_id = ? ORDER BY name COLLATE NOCASE")
        .bind(carwash_id)
        .fetch_all(pool)
        .await?;
    Ok(services)
}

// Get the most recent bookings for a carwash, newest first
pub async fn recent_bookings_for_carwash(
    pool: &DbPool,
    carwash_id: i64,
    limit: i64,
) -> Result<Vec<BookingSummary>> {
    let bookings = sqlx::query_as(
        r#"
        SELECT b.id, b.booking_date, b.booking_time, b.status, b.total_price,
               b.vehicle_plate, s.name AS service_name
        FROM bookings b
        LEFT JOIN services s ON b.service_id = s.id
        WHERE b.carwash_id = ?
        ORDER BY b.booking_date DESC, b.booking_time DESC
        LIMIT ?
        "#,
    )
    .bind(carwash_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(bookings)
}

// Insert a user and return its id
pub async fn insert_user(pool: &DbPool, full_name: &str, email: &str, role: &str) -> Result<i64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query("INSERT INTO users (full_name, email, role, created_at) VALUES (?, ?, ?, ?)")
        .bind(full_name)
        .bind(email)
        .bind(role)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub struct NewCarwash {
    pub user_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub is_active: Option<i64>,
    pub average_rating: f64,
}

// Insert a carwash and return its id
pub async fn insert_carwash(pool: &DbPool, carwash: &NewCarwash) -> Result<i64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        INSERT INTO carwashes (user_id, name, address, city, phone, status, is_active, average_rating, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(carwash.user_id)
    .bind(&carwash.name)
    .bind(&carwash.address)
    .bind(&carwash.city)
    .bind(&carwash.phone)
    .bind(&carwash.status)
    .bind(carwash.is_active)
    .bind(carwash.average_rating)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

// Insert a service and return its id
pub async fn insert_service(
    pool: &DbPool,
    carwash_id: i64,
    name: &str,
    price: f64,
    duration: i64,
) -> Result<i64> {
    let result = sqlx::query("INSERT INTO services (carwash_id, name, price, duration) VALUES (?, ?, ?, ?)")
        .bind(carwash_id)
        .bind(name)
        .bind(price)
        .bind(duration)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

// Insert a vehicle and return its id
pub async fn insert_vehicle(
    pool: &DbPool,
    user_id: i64,
    brand: &str,
    model: &str,
    license_plate: &str,
    year: Option<i64>,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO user_vehicles (user_id, brand, model, license_plate, year) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(brand)
    .bind(model)
    .bind(license_plate)
    .bind(year)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub struct NewBooking {
    pub user_id: i64,
    pub carwash_id: i64,
    pub service_id: Option<i64>,
    pub booking_date: String,
    pub booking_time: String,
    pub status: String,
    pub total_price: f64,
    pub vehicle_plate: Option<String>,
}

// Insert a booking and return its id
pub async fn insert_booking(pool: &DbPool, booking: &NewBooking) -> Result<i64> {
    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        INSERT INTO bookings (user_id, carwash_id, service_id, booking_date, booking_time, status, total_price, vehicle_plate, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(booking.user_id)
    .bind(booking.carwash_id)
    .bind(booking.service_id)
    .bind(&booking.booking_date)
    .bind(&booking.booking_time)
    .bind(&booking.status)
    .bind(booking.total_price)
    .bind(&booking.vehicle_plate)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> DbPool {
        // An in-memory database needs a single connection; each pooled
        // connection would otherwise get its own empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_tables(&pool).await.unwrap();
        pool
    }

    async fn insert_test_carwash(
        pool: &DbPool,
        name: &str,
        status: Option<&str>,
        is_active: Option<i64>,
    ) -> i64 {
        let owner = insert_user(pool, name, &format!("{}@example.com", name), "carwash")
            .await
            .unwrap();
        insert_carwash(
            pool,
            &NewCarwash {
                user_id: owner,
                name: name.to_string(),
                address: None,
                city: Some("İstanbul".to_string()),
                phone: None,
                status: status.map(str::to_string),
                is_active,
                average_rating: 0.0,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_visible_carwashes_filters_legacy_tokens() {
        let pool = test_pool().await;

        // The legacy status zoo, with the expected classification.
        let rows: [(&str, Option<&str>, Option<i64>, bool); 9] = [
            ("canonical-open", Some("Açık"), Some(1), true),
            ("open-inactive-flag", Some("Açık"), Some(0), true),
            ("caps-open", Some("AÇIK"), Some(0), true),
            ("english-open", Some("active"), Some(0), true),
            ("numeric-open", Some("1"), None, true),
            ("canonical-closed", Some("Kapalı"), Some(1), false),
            ("no-status-active", None, Some(1), true),
            ("no-status-inactive", None, Some(0), false),
            ("pending-active", Some("pending"), Some(1), true),
        ];

        for (name, status, is_active, _) in &rows {
            insert_test_carwash(&pool, name, *status, *is_active).await;
        }

        let visible = visible_carwashes(&pool).await.unwrap();
        let visible_names: Vec<&str> = visible.iter().map(|cw| cw.name.as_str()).collect();

        for (name, _, _, expected) in &rows {
            assert_eq!(
                visible_names.contains(name),
                *expected,
                "carwash '{}' visibility mismatch",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_set_carwash_status_bumps_updated_at() {
        let pool = test_pool().await;
        let id = insert_test_carwash(&pool, "toggle-target", Some("Açık"), Some(1)).await;

        let before = get_carwash(&pool, id).await.unwrap().unwrap();

        set_carwash_status(&pool, id, Some("Kapalı"), 0).await.unwrap();

        let after = get_carwash(&pool, id).await.unwrap().unwrap();
        assert_eq!(after.status.as_deref(), Some("Kapalı"));
        assert_eq!(after.is_active, Some(0));
        assert!(after.updated_at.is_some());
        assert!(after.updated_at >= before.updated_at);
        assert!(!after.is_visible());
    }

    #[tokio::test]
    async fn test_restore_nullable_status() {
        let pool = test_pool().await;
        let id = insert_test_carwash(&pool, "null-restore", Some("Açık"), Some(1)).await;

        // Diagnostics restore whatever was there before, including NULL.
        set_carwash_status(&pool, id, None, 1).await.unwrap();

        let row = get_carwash(&pool, id).await.unwrap().unwrap();
        assert_eq!(row.status, None);
        assert_eq!(row.is_active, Some(1));
        assert!(row.is_visible());
    }

    #[tokio::test]
    async fn test_recent_bookings_join_service_name() {
        let pool = test_pool().await;
        let carwash_id = insert_test_carwash(&pool, "bookings-test", Some("Açık"), Some(1)).await;
        let customer = insert_user(&pool, "Test Customer", "customer@example.com", "customer")
            .await
            .unwrap();
        let service_id = insert_service(&pool, carwash_id, "İç Dış Yıkama", 250.0, 45)
            .await
            .unwrap();

        insert_booking(
            &pool,
            &NewBooking {
                user_id: customer,
                carwash_id,
                service_id: Some(service_id),
                booking_date: "2026-02-10".to_string(),
                booking_time: "14:00".to_string(),
                status: "pending".to_string(),
                total_price: 250.0,
                vehicle_plate: Some("34 ABC 123".to_string()),
            },
        )
        .await
        .unwrap();
        insert_booking(
            &pool,
            &NewBooking {
                user_id: customer,
                carwash_id,
                service_id: None,
                booking_date: "2026-02-12".to_string(),
                booking_time: "09:30".to_string(),
                status: "pending".to_string(),
                total_price: 100.0,
                vehicle_plate: None,
            },
        )
        .await
        .unwrap();

        let bookings = recent_bookings_for_carwash(&pool, carwash_id, 10).await.unwrap();
        assert_eq!(bookings.len(), 2);
        // Newest first; the walk-in booking has no service attached.
        assert_eq!(bookings[0].booking_date, "2026-02-12");
        assert_eq!(bookings[0].service_name, None);
        assert_eq!(bookings[1].service_name.as_deref(), Some("İç Dış Yıkama"));
    }
}
