// Runtime configuration
//
// Layers, lowest to highest precedence: defaults, environment, settings
// stored in the database, command-line flags. Flags are applied by the caller.

use std::path::PathBuf;

use serde::Serialize;

use crate::db::SqliteStore;
use crate::error::Result;
use crate::time_utils::DateOrder;

pub const ENV_DB: &str = "QSOBOOK_DB";
pub const ENV_STATION_CALLSIGN: &str = "QSOBOOK_STATION_CALLSIGN";
pub const ENV_DATE_ORDER: &str = "QSOBOOK_DATE_ORDER";

/// Settings table keys
pub const SETTING_STATION_CALLSIGN: &str = "station_callsign";
pub const SETTING_DATE_ORDER: &str = "date_order";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub db_path: PathBuf,
    /// Written to the ADIF export header when set
    pub station_callsign: Option<String>,
    /// How ambiguous `NN/NN/YYYY` CSV dates are read
    pub date_order: DateOrder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("qsobook.db"),
            station_callsign: None,
            date_order: DateOrder::default(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Overlay values found through `lookup`. Empty values are ignored and an
    /// unknown date order keeps the current one.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(path) = get(ENV_DB) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(call) = get(ENV_STATION_CALLSIGN) {
            self.station_callsign = Some(call);
        }
        if let Some(order) = get(ENV_DATE_ORDER) {
            self.set_date_order(ENV_DATE_ORDER, &order);
        }
    }

    /// Overlay settings persisted in the database
    pub async fn apply_settings(&mut self, store: &SqliteStore) -> Result<()> {
        if let Some(call) = store.get_setting(SETTING_STATION_CALLSIGN).await? {
            if !call.trim().is_empty() {
                self.station_callsign = Some(call.trim().to_string());
            }
        }
        if let Some(order) = store.get_setting(SETTING_DATE_ORDER).await? {
            self.set_date_order(SETTING_DATE_ORDER, &order);
        }
        Ok(())
    }

    fn set_date_order(&mut self, source: &str, value: &str) {
        match value.parse::<DateOrder>() {
            Ok(order) => self.date_order = order,
            Err(e) => log::warn!("Ignoring {}: {}", source, e),
        }
    }
}
