//! Normalizes legacy carwash status tokens to their canonical values.
//!
//! Usage: cargo run --bin normalize-status             (dry run)
//!        cargo run --bin normalize-status -- --apply
//!
//! Open-like tokens ('open', 'active', 'acik', '1'...) become 'Açık' with
//! is_active=1, closed-like tokens become 'Kapalı' with is_active=0. Rows
//! with an unrecognized status are reported and left untouched.

mod availability;
mod db;

use anyhow::Result;
use clap::Parser;
use dotenvy::EnvLoader;

use crate::availability::{STATUS_CLOSED, STATUS_OPEN, StatusKind};

#[derive(Parser, Debug)]
#[command(name = "normalize-status")]
#[command(about = "Rewrite legacy carwash status tokens to canonical values")]
struct Args {
    /// Write the changes instead of only reporting them
    #[arg(long)]
    apply: bool,

    /// Database URL (overrides DATABASE_URL from .env)
    #[arg(long)]
    db: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let dotenv = EnvLoader::new()
        .load()
        .unwrap_or_default();

    let database_url = args.db
        .or_else(|| dotenv.get("DATABASE_URL").cloned())
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:carwash.db?mode=rwc".to_string());

    println!("Connecting to database: {}", database_url);
    let pool = db::init_db(&database_url).await?;

    let carwashes = db::get_all_carwashes(&pool).await?;
    println!("Checking {} carwash rows...", carwashes.len());

    let mut normalized = 0;
    let mut unknown = 0;

    for carwash in &carwashes {
        let (status, is_active) = match carwash.status_kind() {
            StatusKind::Open => (STATUS_OPEN, 1),
            StatusKind::Closed => (STATUS_CLOSED, 0),
            StatusKind::Unknown => {
                unknown += 1;
                println!(
                    "  ? id={} '{}' status={} is_active={} left untouched",
                    carwash.id,
                    carwash.name,
                    carwash.status.as_deref().unwrap_or("NULL"),
                    carwash.is_active.map(|v| v.to_string()).unwrap_or_else(|| "NULL".to_string())
                );
                continue;
            }
        };

        // Already canonical rows are skipped
        if carwash.status.as_deref() == Some(status) && carwash.is_active == Some(is_active) {
            continue;
        }

        normalized += 1;
        println!(
            "  → id={} '{}' status={} is_active={} => '{}'/{}",
            carwash.id,
            carwash.name,
            carwash.status.as_deref().unwrap_or("NULL"),
            carwash.is_active.map(|v| v.to_string()).unwrap_or_else(|| "NULL".to_string()),
            status,
            is_active
        );

        if args.apply {
            db::set_carwash_status(&pool, carwash.id, Some(status), is_active).await?;
        }
    }

    println!();
    println!("Rows needing normalization: {}", normalized);
    println!("Rows with unrecognized status: {}", unknown);

    if args.apply {
        println!("Changes written.");
    } else {
        println!("Dry run: no rows written. Re-run with --apply to write.");
    }

    Ok(())
}
