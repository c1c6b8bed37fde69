//! `SQLite` layout for logbook buckets.
//!
//! Buckets are rows in `buckets`, each carrying its own sequence counter.
//! Key/value pairs live in `pairs`, keyed by `(bucket, key)`. Keys are BLOBs,
//! which `SQLite` orders with `memcmp`, so a scan by key is byte-lexicographic.

use rusqlite::Connection;

use crate::error::Result;

/// SQL statement to create the buckets table.
pub const CREATE_BUCKETS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS buckets (
    name TEXT PRIMARY KEY,
    sequence INTEGER NOT NULL DEFAULT 0
)
";

/// SQL statement to create the key/value table.
pub const CREATE_PAIRS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS pairs (
    bucket TEXT NOT NULL REFERENCES buckets(name),
    key BLOB NOT NULL,
    value BLOB NOT NULL,
    PRIMARY KEY (bucket, key)
) WITHOUT ROWID
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_BUCKETS_TABLE, CREATE_PAIRS_TABLE];

pub(crate) const INSERT_BUCKET: &str =
    "INSERT OR IGNORE INTO buckets (name, sequence) VALUES (?1, 0)";

pub(crate) const BUCKET_EXISTS: &str = "SELECT 1 FROM buckets WHERE name = ?1";

pub(crate) const ADVANCE_SEQUENCE: &str =
    "UPDATE buckets SET sequence = sequence + 1 WHERE name = ?1";

pub(crate) const SELECT_SEQUENCE: &str = "SELECT sequence FROM buckets WHERE name = ?1";

pub(crate) const UPSERT_PAIR: &str = r"
INSERT INTO pairs (bucket, key, value) VALUES (?1, ?2, ?3)
ON CONFLICT (bucket, key) DO UPDATE SET value = excluded.value
";

pub(crate) const SELECT_VALUE: &str = "SELECT value FROM pairs WHERE bucket = ?1 AND key = ?2";

pub(crate) const SELECT_PAIRS: &str =
    "SELECT key, value FROM pairs WHERE bucket = ?1 ORDER BY key ASC";

/// Create the tables if needed and make sure `bucket` exists.
///
/// Runs in one transaction. Returns `true` if the bucket was created.
///
/// # Errors
///
/// Returns an error if any statement fails; nothing is committed in that case.
pub fn initialize(conn: &mut Connection, bucket: &str) -> Result<bool> {
    let tx = conn.transaction()?;
    for statement in SCHEMA_STATEMENTS {
        tx.execute(statement, [])?;
    }
    let created = tx.execute(INSERT_BUCKET, [bucket])? > 0;
    tx.commit()?;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_initialize_creates_tables() {
        let mut conn = create_test_db();
        initialize(&mut conn, "users").unwrap();

        assert!(table_exists(&conn, "buckets"));
        assert!(table_exists(&conn, "pairs"));
    }

    #[test]
    fn test_initialize_creates_bucket_once() {
        let mut conn = create_test_db();

        assert!(initialize(&mut conn, "users").unwrap());
        assert!(!initialize(&mut conn, "users").unwrap());

        let sequence: i64 = conn
            .query_row(SELECT_SEQUENCE, ["users"], |row| row.get(0))
            .unwrap();
        assert_eq!(sequence, 0);
    }

    #[test]
    fn test_buckets_are_independent() {
        let mut conn = create_test_db();
        initialize(&mut conn, "users").unwrap();
        initialize(&mut conn, "contacts").unwrap();

        conn.execute(ADVANCE_SEQUENCE, ["users"]).unwrap();

        let users: i64 = conn
            .query_row(SELECT_SEQUENCE, ["users"], |row| row.get(0))
            .unwrap();
        let contacts: i64 = conn
            .query_row(SELECT_SEQUENCE, ["contacts"], |row| row.get(0))
            .unwrap();
        assert_eq!(users, 1);
        assert_eq!(contacts, 0);
    }

    #[test]
    fn test_pairs_order_by_key_bytes() {
        let mut conn = create_test_db();
        initialize(&mut conn, "users").unwrap();

        let keys: [&[u8]; 5] = [b"b", b"a", b"ab", b"\xff", b"A"];
        for key in keys {
            conn.execute(
                UPSERT_PAIR,
                rusqlite::params!["users", key, b"v".as_slice()],
            )
            .unwrap();
        }

        let keys: Vec<Vec<u8>> = conn
            .prepare(SELECT_PAIRS)
            .unwrap()
            .query_map(["users"], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(
            keys,
            vec![
                b"A".to_vec(),
                b"a".to_vec(),
                b"ab".to_vec(),
                b"b".to_vec(),
                b"\xff".to_vec()
            ]
        );
    }
}
