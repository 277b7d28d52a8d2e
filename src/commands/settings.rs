//! Settings and utility commands
//!
//! This module handles:
//! - get_setting / set_setting: Key-value settings storage
//! - get_db_stats: Database statistics

use super::state::AppState;
use crate::config::SETTING_DATE_ORDER;
use crate::db::DbStats;
use crate::error::Result;
use crate::time_utils::DateOrder;

// ============================================================================
// Settings Commands
// ============================================================================

pub async fn get_setting(state: &AppState, key: &str) -> Result<Option<String>> {
    state.store.get_setting(key).await
}

/// Store a setting. Known keys are checked before they are saved.
pub async fn set_setting(state: &AppState, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    let value = if key == SETTING_DATE_ORDER {
        value.parse::<DateOrder>()?.to_string()
    } else {
        value.to_string()
    };
    state.store.set_setting(key, &value).await
}

// ============================================================================
// Database Commands
// ============================================================================

pub async fn get_db_stats(state: &AppState) -> Result<DbStats> {
    state.store.stats().await
}
