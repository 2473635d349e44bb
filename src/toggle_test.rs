//! Automated status toggle diagnostic for a carwash row.
//!
//! Usage: cargo run --bin toggle-test
//!        cargo run --bin toggle-test -- --id 12
//!
//! Toggles a carwash between 'Açık' and 'Kapalı' (with is_active 1/0),
//! checks the customer listing after every step, restores the original
//! state, logs each step with a timestamp and prints a pass/fail summary.
//! Exits non-zero when any check fails.

mod availability;
mod config;
mod db;

use anyhow::{Result, bail};
use clap::Parser;
use dotenvy::EnvLoader;

use crate::availability::{STATUS_CLOSED, STATUS_OPEN};
use crate::db::DbPool;

#[derive(Parser, Debug)]
#[command(name = "toggle-test")]
#[command(about = "Toggle a carwash open/closed and verify customer visibility")]
struct Args {
    /// Carwash id to exercise (default: the first row)
    #[arg(long)]
    id: Option<i64>,

    /// Number of open/close cycles to run
    #[arg(long, default_value_t = 2)]
    cycles: u32,
}

fn logline(msg: &str) {
    println!("[{}] {}", config::log_timestamp(), msg);
}

struct StepResult {
    cycle: u32,
    phase: &'static str,
    db_ok: bool,
    visible: bool,
}

impl StepResult {
    // An open step must leave the carwash listed, a closed step must not.
    fn passed(&self) -> bool {
        match self.phase {
            "open" => self.db_ok && self.visible,
            _ => self.db_ok && !self.visible,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let dotenv = EnvLoader::new()
        .load()
        .unwrap_or_default();

    let timezone = dotenv.get("TIMEZONE")
        .cloned()
        .or_else(|| std::env::var("TIMEZONE").ok())
        .unwrap_or_else(|| "Europe/Istanbul".to_string());
    config::init_timezone(&timezone);

    let database_url = dotenv.get("DATABASE_URL")
        .cloned()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:carwash.db?mode=rwc".to_string());

    let pool = db::init_db(&database_url).await?;

    // Pick the row to exercise
    let carwash = match args.id {
        Some(id) => {
            let Some(carwash) = db::get_carwash(&pool, id).await? else {
                logline(&format!("Carwash with id={} not found. Exiting.", id));
                std::process::exit(1);
            };
            carwash
        }
        None => {
            let Some(carwash) = db::first_carwash(&pool).await? else {
                logline("No carwash rows found in DB. Exiting.");
                std::process::exit(1);
            };
            carwash
        }
    };

    let orig_status = carwash.status.clone();
    let orig_active = carwash.is_active.unwrap_or(1);

    logline(&format!(
        "Selected carwash ID={} name='{}' orig_status='{}' is_active={}",
        carwash.id,
        carwash.name,
        orig_status.as_deref().unwrap_or(""),
        orig_active
    ));

    let mut results = Vec::new();

    for cycle in 1..=args.cycles {
        logline(&format!("=== Cycle {} : SET OPEN ('{}') ===", cycle, STATUS_OPEN));
        results.push(run_step(&pool, carwash.id, cycle, "open").await?);

        logline(&format!("--- SET CLOSED ('{}') ---", STATUS_CLOSED));
        results.push(run_step(&pool, carwash.id, cycle, "closed").await?);
    }

    // Restore original state
    logline(&format!(
        "Restoring original status='{}' is_active={}",
        orig_status.as_deref().unwrap_or(""),
        orig_active
    ));
    match db::set_carwash_status(&pool, carwash.id, orig_status.as_deref(), orig_active).await {
        Ok(()) => logline("Restore committed."),
        Err(e) => logline(&format!("Restore failed: {}", e)),
    }

    // Summary
    logline("=== SUMMARY ===");
    let mut pass = 0;
    let mut fail = 0;
    for result in &results {
        if result.passed() {
            pass += 1;
        } else {
            fail += 1;
        }
        logline(&format!(
            "cycle={} phase={} db_ok={} visible={} => {}",
            result.cycle,
            result.phase,
            result.db_ok,
            result.visible,
            if result.passed() { "PASS" } else { "FAIL" }
        ));
    }
    logline(&format!("Toggles tested: {}", results.len()));
    logline(&format!("Pass: {}  Fail: {}", pass, fail));

    if fail > 0 {
        logline("Some checks failed. Inspect the log and the database.");
        std::process::exit(2);
    }

    logline("All checks passed.");
    Ok(())
}

// Update the row inside a transaction, then verify the stored values and
// the customer listing.
async fn run_step(pool: &DbPool, carwash_id: i64, cycle: u32, phase: &'static str) -> Result<StepResult> {
    let (status, is_active) = match phase {
        "open" => (STATUS_OPEN, 1),
        _ => (STATUS_CLOSED, 0),
    };

    let now = chrono::Utc::now().to_rfc3339();
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE carwashes SET status = ?, is_active = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(is_active)
        .bind(&now)
        .bind(carwash_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    logline(&format!("DB update to '{}' committed.", status));

    // Verify DB value
    let Some(after) = db::get_carwash(pool, carwash_id).await? else {
        bail!("carwash row {} disappeared mid-test", carwash_id);
    };
    let db_ok = after.status.as_deref() == Some(status) && after.is_active == Some(is_active);
    logline(&format!(
        "DB verification after {}: status='{}' is_active={} => {}",
        phase.to_uppercase(),
        after.status.as_deref().unwrap_or(""),
        after.is_active.unwrap_or(0),
        if db_ok { "OK" } else { "MISMATCH" }
    ));

    // Check visibility through the same query the customer listing uses
    let visible = db::visible_carwashes(pool)
        .await?
        .iter()
        .any(|cw| cw.id == carwash_id);
    logline(&format!(
        "Customer listing visibility after {}: visible={}",
        phase.to_uppercase(),
        visible
    ));

    Ok(StepResult { cycle, phase, db_ok, visible })
}
