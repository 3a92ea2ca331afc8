use genaxis_core::db::migrations::latest_version;
use genaxis_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn fresh_store_has_every_record_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), latest_version());
    assert_eq!(
        user_tables(&conn),
        vec!["crispr_edits", "genes", "species"]
    );
}

#[test]
fn deleting_species_cascades_through_genes_and_edits() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO species (id, name) VALUES ('s1', 'worm');
         INSERT INTO genes (id, species_id, name) VALUES ('g1', 's1', 'unc-54');
         INSERT INTO crispr_edits (id, gene_id, target_sequence, replacement_sequence)
             VALUES ('e1', 'g1', 'AGT', 'C');
         DELETE FROM species WHERE id = 's1';",
    )
    .unwrap();

    let remaining: i64 = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM genes) + (SELECT COUNT(*) FROM crispr_edits);",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn reopening_a_file_keeps_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("genaxis.sqlite3");

    open_db(&path)
        .unwrap()
        .execute("INSERT INTO species (id, name) VALUES ('s1', 'yeast');", [])
        .unwrap();

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());
    let name: String = conn
        .query_row("SELECT name FROM species WHERE id = 's1';", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "yeast");
}

#[test]
fn store_written_by_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 999)
        .unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(
        matches!(
            err,
            DbError::UnsupportedSchemaVersion { db_version: 999, latest_supported }
                if latest_supported == latest_version()
        ),
        "unexpected error: {err}"
    );
}

fn user_version(conn: &Connection) -> u32 {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap()
}

fn user_tables(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name;",
        )
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}
