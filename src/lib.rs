// QSOBook Library
// Amateur-radio contact logbook: ADIF and CSV import, ADIF export, duplicate
// detection and Maidenhead locators. Re-exported for use in main.rs.

pub mod adif;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod grid;
pub mod import;
pub mod qso;
pub mod time_utils;

pub use error::{LogbookError, Result};
pub use qso::{Logbook, QsoData, QsoRecord};
