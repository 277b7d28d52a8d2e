// Persistence
//
// The import pipelines only see the `QsoStore` trait. `SqliteStore` is the
// real backend, `MemoryStore` backs dry runs and tests.

pub mod init;
pub mod memory;
pub mod migrations;
pub mod qso;
pub mod settings;

pub use init::{DbStats, SqliteStore};
pub use memory::MemoryStore;

use crate::error::Result;
use crate::qso::{QsoData, QsoRecord};

/// Record persistence used by the importers
#[allow(async_fn_in_trait)]
pub trait QsoStore {
    /// Store one QSO and return it with its assigned id
    async fn create_record(&self, data: &QsoData, logbook_id: Option<&str>) -> Result<QsoRecord>;

    /// Records in `logbook_id`, or every record when `None`, oldest first
    async fn list_records(&self, logbook_id: Option<&str>) -> Result<Vec<QsoRecord>>;
}
