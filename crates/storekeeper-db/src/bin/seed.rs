//! # Seed Data Generator
//!
//! Bootstraps a fresh database with a first administrator and store so the
//! back-office has something to log into.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p storekeeper-db --bin seed
//!
//! # Specify database path and admin password
//! cargo run -p storekeeper-db --bin seed -- --db ./data/storekeeper.db --password s3cret
//! ```
//!
//! ## Seeded Rows
//! - `Administrator` role carrying every permission
//! - `admin` user account (password from `--password`, default `admin`)
//! - `Main Store` with a placeholder address, managed by the admin account

use std::env;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storekeeper_core::{password, NewAddress, NewStore, NewUser, Permission};
use storekeeper_db::{Database, DbConfig};

const DEFAULT_DB_PATH: &str = "./storekeeper_dev.db";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from(DEFAULT_DB_PATH);
    let mut admin_password = String::from(DEFAULT_ADMIN_PASSWORD);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--password" | "-p" => {
                if i + 1 < args.len() {
                    admin_password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Storekeeper Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file path (default: {})", DEFAULT_DB_PATH);
                println!("  -p, --password <PASS>   Admin account password (default: {})", DEFAULT_ADMIN_PASSWORD);
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, "Seeding database");

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    // Refuse to double-seed: a populated users table means this database
    // is already in use
    if !db.users().list_all().await?.is_empty() {
        warn!("Database already has user accounts, skipping seed");
        warn!("Delete the database file to regenerate");
        return Ok(());
    }

    // Administrator role with the full permission set
    let mut admin_role = db.roles().create("Administrator").await?;
    admin_role.permissions = Permission::ALL.into_iter().collect();
    db.roles().update(&admin_role).await?;
    info!(
        role = %admin_role.name,
        permissions = admin_role.permissions.len(),
        "Created administrator role"
    );

    // Admin account
    let admin = db
        .users()
        .create(&NewUser {
            credentials: "admin".to_string(),
            email: "admin@storekeeper.local".to_string(),
            password_hash: password::hash(&admin_password)?,
        })
        .await?;
    info!(credentials = %admin.credentials, "Created admin account");

    // First store, managed by the admin account
    let (store, address) = db
        .stores()
        .create_with_address(
            &NewStore {
                id: "Main Store".to_string(),
                password_hash: password::hash(&admin_password)?,
                manager_id: Some(admin.id),
            },
            &NewAddress {
                zip_code: 69_003,
                city: "Lyon".to_string(),
                street_name_and_number: "17 rue Garibaldi".to_string(),
            },
        )
        .await?;
    info!(store = %store.id, address_id = address.id, "Created first store");

    info!("Seed complete");

    Ok(())
}
