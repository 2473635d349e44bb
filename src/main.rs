mod availability;
mod carwashes;
mod config;
mod db;

use axum::{Router, routing::get};
use std::fs;
use anyhow::Result;
use axum::routing::get_service;
use tower_http::services::ServeDir;
use dotenvy::EnvLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let _env = EnvLoader::new().load()?;

    let timezone = std::env::var("TIMEZONE").unwrap_or_else(|_| "Europe/Istanbul".to_string());
    config::init_timezone(&timezone);

    // Initialize database
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:carwash.db?mode=rwc".to_string());
    let pool = db::init_db(&database_url).await?;
    println!("Database initialized at: {}", database_url);

    fs::create_dir_all("static")?;
    let static_dir = ServeDir::new("static");

    // build our application with a single route
    let app = Router::new()
        .route("/", get(carwashes::homepage))
        .nest("/carwashes", carwashes::router())
        .with_state(pool)
        .nest_service("/static", get_service(static_dir));

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    axum::serve(listener, app).await?;

    Ok(())
}
