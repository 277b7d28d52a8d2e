//! Command Handlers
//!
//! One function per `qsobook` subcommand, grouped by domain. Handlers take the
//! shared `AppState` and return serializable results; `main` prints them as JSON.
//!
//! ## Module Organization
//! - `state` - Application state (store + resolved config)
//! - `adif` - ADIF file import/export
//! - `csv` - CSV import and mapping suggestions
//! - `grid` - Maidenhead locator conversions
//! - `logbook` - Logbook management
//! - `settings` - Persisted settings and database statistics

mod state;
pub mod adif;
pub mod csv;
pub mod grid;
pub mod logbook;
pub mod settings;

pub use state::AppState;
