// Key-value settings storage

use super::SqliteStore;
use crate::error::Result;

impl SqliteStore {
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        log::info!("Setting {} = {}", key, value);

        sqlx::query(
            r#"INSERT INTO settings (key, value, updated_at)
               VALUES (?, ?, datetime('now'))
               ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = datetime('now')"#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settings_upsert() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert_eq!(store.get_setting("station_callsign").await.unwrap(), None);

        store.set_setting("station_callsign", "TA1AB").await.unwrap();
        store.set_setting("station_callsign", "TA2XYZ").await.unwrap();

        assert_eq!(
            store.get_setting("station_callsign").await.unwrap().as_deref(),
            Some("TA2XYZ")
        );
    }
}
