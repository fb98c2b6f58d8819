//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for future migrations.
//!
//! Timestamp defaults use the same millisecond RFC 3339 shape as
//! [`encode_dt`](crate::encode::encode_dt), so rows written by external
//! ingestion without explicit stamps still sort and decode.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS category (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

-- tone/sentiment are filled lazily on read; everything else is ingested.
CREATE TABLE IF NOT EXISTS review (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    text        TEXT,
    stars       INTEGER NOT NULL,
    review_id   TEXT NOT NULL,
    tone        TEXT,
    sentiment   TEXT,
    category_id INTEGER NOT NULL REFERENCES category(id),
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- Append-only. No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS access_log (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS review_category_idx ON review(category_id);
CREATE INDEX IF NOT EXISTS review_created_idx  ON review(created_at);

PRAGMA user_version = 1;
";
