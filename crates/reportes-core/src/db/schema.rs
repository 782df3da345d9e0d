//! Canonical SQLite schema for the ticket store.
//!
//! - `tickets` holds one row per maintenance report; `id` is AUTOINCREMENT
//!   so deleted ids are never handed out again
//! - `comments` is an append-only log per ticket, removed only by cascade
//! - `store_meta` records the schema version and creation time

/// Migration v1: core tables plus store metadata.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS tickets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    floor INTEGER NOT NULL,
    office TEXT NOT NULL,
    reporter TEXT NOT NULL,
    reason TEXT NOT NULL,
    status TEXT NOT NULL,
    date TEXT NOT NULL DEFAULT (strftime('%d/%m/%y', 'now', 'localtime')),
    resolved_by TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticket_id INTEGER NOT NULL REFERENCES tickets(id) ON DELETE CASCADE,
    body TEXT NOT NULL CHECK (length(trim(body)) > 0),
    author TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    created_at_us INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO store_meta (id, schema_version, created_at_us)
VALUES (1, 1, CAST((julianday('now') - 2440587.5) * 86400000000 AS INTEGER));
";

/// Migration v2: read-path indexes for the list filters and comment lookups.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_tickets_status
    ON tickets(status, id DESC);

CREATE INDEX IF NOT EXISTS idx_tickets_floor
    ON tickets(floor, id DESC);

CREATE INDEX IF NOT EXISTS idx_comments_ticket
    ON comments(ticket_id, id DESC);
";

/// Indexes every migrated store must carry.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_tickets_status",
    "idx_tickets_floor",
    "idx_comments_ticket",
];

/// Schema of the office directory database.
pub const OFFICES_SQL: &str = r"
CREATE TABLE IF NOT EXISTS offices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    floor INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_offices_floor
    ON offices(floor, name);
";
