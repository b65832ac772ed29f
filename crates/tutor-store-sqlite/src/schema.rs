//! SQL schema for the directory's SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Name uniqueness (ignoring case) is checked by the store on insert, not by
-- a constraint.
CREATE TABLE IF NOT EXISTS subjects (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    name_key    TEXT NOT NULL,   -- case-folded name
    description TEXT
);

CREATE TABLE IF NOT EXISTS advertisements (
    id               INTEGER PRIMARY KEY,
    title            TEXT NOT NULL,
    title_key        TEXT NOT NULL,   -- case-folded title
    description      TEXT NOT NULL,
    price            REAL,
    education_format TEXT,
    contact_info     TEXT NOT NULL,
    subject_id       INTEGER NOT NULL REFERENCES subjects(id),
    created_at       TEXT NOT NULL,   -- RFC 3339 UTC, microsecond precision
    updated_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS subjects_name_key_idx      ON subjects(name_key);
CREATE INDEX IF NOT EXISTS advertisements_subject_idx ON advertisements(subject_id);
CREATE INDEX IF NOT EXISTS advertisements_created_idx ON advertisements(created_at);

PRAGMA user_version = 1;
";
