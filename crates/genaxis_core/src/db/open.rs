//! Connection setup for the genaxis store.
//!
//! Every connection handed out here has foreign keys enforced (edit rows
//! cascade with their gene) and the schema at [`latest_version`].
//!
//! [`latest_version`]: super::migrations::latest_version

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating when missing) the database at `path` and migrates it.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let target = path.display().to_string();
    prepare(&target, Connection::open(path))
}

/// Opens a private in-memory database; used by tests and dry runs.
pub fn open_db_in_memory() -> DbResult<Connection> {
    prepare(":memory:", Connection::open_in_memory())
}

fn prepare(target: &str, opened: rusqlite::Result<Connection>) -> DbResult<Connection> {
    let started = Instant::now();
    let result = opened.map_err(Into::into).and_then(|mut conn| {
        configure(&mut conn)?;
        Ok(conn)
    });

    let elapsed_ms = started.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok target={target} duration_ms={elapsed_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error target={target} duration_ms={elapsed_ms} error={err}"
        ),
    }
    result
}

fn configure(conn: &mut Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
