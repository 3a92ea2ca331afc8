//! Ordered schema steps for the genaxis store.
//!
//! `PRAGMA user_version` records the last applied step. Each step runs in its
//! own transaction together with the version bump, so an interrupted upgrade
//! resumes from the last completed step.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// `(version, sql)`; versions start at 1 and increase by one.
const SCHEMA_STEPS: &[(u32, &str)] = &[
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_crispr_edits.sql")),
];

/// Newest schema version this build understands.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database was written by a newer build.
/// - Any SQLite failure of a pending step; earlier steps stay applied.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending = SCHEMA_STEPS.iter().filter(|(version, _)| *version > found);
    for (version, sql) in pending {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        debug!("event=db_migrate_step module=db status=ok version={version}");
    }

    if found < latest {
        info!("event=db_migrate module=db status=ok from_version={found} to_version={latest}");
    }
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_contiguous_from_one() {
        for (index, (version, _)) in SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(*version as usize, index + 1);
        }
    }

    #[test]
    fn partially_migrated_database_is_completed() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA_STEPS[0].1).unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();

        apply_migrations(&mut conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), latest_version());
        let edits: i64 = conn
            .query_row("SELECT COUNT(*) FROM crispr_edits;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(edits, 0);
    }
}
