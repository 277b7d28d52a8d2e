//! Logbook management commands

use super::state::AppState;
use crate::error::{LogbookError, Result};
use crate::qso::Logbook;

pub async fn create_logbook(state: &AppState, name: &str) -> Result<Logbook> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LogbookError::InvalidArgument("logbook name is required".to_string()));
    }
    state.store.create_logbook(name).await
}

pub async fn list_logbooks(state: &AppState) -> Result<Vec<Logbook>> {
    state.store.list_logbooks().await
}
