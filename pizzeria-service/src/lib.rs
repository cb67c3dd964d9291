use std::env;

use diesel::{
    connection::SimpleConnection,
    result::{ConnectionError, ConnectionResult},
    Connection, SqliteConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use dotenvy::dotenv;
use tracing::info;

pub mod error;
pub mod models;
pub mod schema;
pub mod seed;
pub mod serializer;
pub mod service;

pub use error::{Entity, Error, Result, ValidationError};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub const DEFAULT_DATABASE_URL: &str = "pizzeria.db";

pub type MigrationError = Box<dyn std::error::Error + Send + Sync>;

/// Reads `DATABASE_URL` from the environment (or `.env`), falling back to
/// [`DEFAULT_DATABASE_URL`].
pub fn database_url() -> String {
    dotenv().ok();

    env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Opens a SQLite connection with foreign key enforcement turned on.
pub fn establish_connection(database_url: &str) -> ConnectionResult<SqliteConnection> {
    let mut conn = SqliteConnection::establish(database_url)?;
    conn.batch_execute("PRAGMA foreign_keys = ON;")
        .map_err(ConnectionError::CouldntSetupConfiguration)?;
    Ok(conn)
}

/// Applies pending migrations and returns how many were applied.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<usize, MigrationError> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?.len();
    info!(count = applied, "applied pending migrations");
    Ok(applied)
}
