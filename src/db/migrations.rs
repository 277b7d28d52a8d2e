/// SQL migration for initial database schema
///
/// Design principles:
/// - One row per QSO, optional fields as nullable columns
/// - Datetimes stored as RFC 3339 UTC text so they sort lexically
/// - Record ids are UUIDs assigned by the application, not the database
pub const MIGRATION_001: &str = r#"
-- =============================================================================
-- Logbooks - named collections of QSOs
-- =============================================================================
CREATE TABLE IF NOT EXISTS logbooks (
    id              TEXT PRIMARY KEY,       -- UUID
    name            TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

-- =============================================================================
-- QSO Log
-- =============================================================================
CREATE TABLE IF NOT EXISTS qsos (
    id              TEXT PRIMARY KEY,       -- UUID
    logbook_id      TEXT,                   -- NULL = not filed in a logbook

    -- REQUIRED
    datetime        TEXT NOT NULL,          -- RFC 3339, UTC
    callsign        TEXT NOT NULL,          -- stored verbatim

    -- OPTIONAL
    name            TEXT,
    notes           TEXT,
    qth             TEXT,                   -- Maidenhead grid
    rst_sent        TEXT,
    rst_rcvd        TEXT,
    freq            REAL,                   -- MHz
    mode            TEXT,
    tx_pwr          REAL,                   -- Watts

    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_qsos_logbook_datetime ON qsos(logbook_id, datetime);
CREATE INDEX IF NOT EXISTS idx_qsos_callsign ON qsos(callsign COLLATE NOCASE);

-- =============================================================================
-- Settings - key/value application settings
-- =============================================================================
CREATE TABLE IF NOT EXISTS settings (
    key             TEXT PRIMARY KEY,
    value           TEXT NOT NULL,
    updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
