//! Database initialization and table definitions
//!
//! This module handles the setup of the embedded redb database. Every row is
//! stored as a JSON string; secondary lookups go through small index tables
//! that map a key onto the row id.

use redb::{Database, TableDefinition};
use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::service::ProfileService;

/// Main table for public profile rows
///
/// Key: row id (UUID)
/// Value: JSON-serialized `PublicProfile`
pub const TABLE_PUBLIC_PROFILES: TableDefinition<&str, &str> =
    TableDefinition::new("public_profiles_v1");

/// Index from owning user to public profile row id
///
/// Key: user id
/// Value: row id in `TABLE_PUBLIC_PROFILES`
///
/// At most one entry per user; get-or-create checks this table inside the
/// same write transaction that inserts the row.
pub const TABLE_PUBLIC_BY_USER: TableDefinition<&str, &str> =
    TableDefinition::new("public_by_user_v1");

/// Index from share token to public profile row id
///
/// Key: share token (e.g. "f3Kq9...")
/// Value: row id in `TABLE_PUBLIC_PROFILES`
pub const TABLE_PUBLIC_BY_TOKEN: TableDefinition<&str, &str> =
    TableDefinition::new("public_by_token_v1");

/// Editable profile snapshots
///
/// Key: user id
/// Value: JSON-serialized `Profile`
pub const TABLE_PROFILES: TableDefinition<&str, &str> = TableDefinition::new("profiles_v1");

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Public-profile operations over the shared database
    pub service: ProfileService,

    /// Keys used to verify bearer tokens on authenticated routes
    pub keys: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(db: Database, keys: JwtKeys) -> Self {
        Self {
            service: ProfileService::new(Arc::new(db)),
            keys: Arc::new(keys),
        }
    }
}

/// Initializes the embedded database and creates required tables
///
/// # Example
///
/// ```no_run
/// # use profile_share::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_PUBLIC_PROFILES)?;
        write_txn.open_table(TABLE_PUBLIC_BY_USER)?;
        write_txn.open_table(TABLE_PUBLIC_BY_TOKEN)?;
        write_txn.open_table(TABLE_PROFILES)?;
    }
    write_txn.commit()?;

    Ok(db)
}
