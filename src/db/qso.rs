// QSO and logbook database operations

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{QsoStore, SqliteStore};
use crate::error::{LogbookError, Result};
use crate::qso::{Logbook, QsoData, QsoRecord};

fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn row_to_record(row: &SqliteRow) -> Result<QsoRecord> {
    let raw_datetime: String = row.try_get("datetime")?;
    let datetime = DateTime::parse_from_rfc3339(&raw_datetime)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| LogbookError::InvalidDateTime(raw_datetime.clone()))?;

    Ok(QsoRecord {
        id: row.try_get("id")?,
        logbook_id: row.try_get("logbook_id")?,
        data: QsoData {
            datetime,
            callsign: row.try_get("callsign")?,
            name: row.try_get("name")?,
            notes: row.try_get("notes")?,
            qth: row.try_get("qth")?,
            rst_sent: row.try_get("rst_sent")?,
            rst_received: row.try_get("rst_rcvd")?,
            freq: row.try_get("freq")?,
            mode: row.try_get("mode")?,
            tx_power: row.try_get("tx_pwr")?,
        },
    })
}

fn row_to_logbook(row: &SqliteRow) -> Result<Logbook> {
    Ok(Logbook {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
    })
}

impl QsoStore for SqliteStore {
    async fn create_record(&self, data: &QsoData, logbook_id: Option<&str>) -> Result<QsoRecord> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"INSERT INTO qsos (
                id, logbook_id, datetime, callsign, name, notes, qth,
                rst_sent, rst_rcvd, freq, mode, tx_pwr, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(logbook_id)
        .bind(data.datetime.to_rfc3339_opts(SecondsFormat::Secs, true))
        .bind(&data.callsign)
        .bind(&data.name)
        .bind(&data.notes)
        .bind(&data.qth)
        .bind(&data.rst_sent)
        .bind(&data.rst_received)
        .bind(data.freq)
        .bind(&data.mode)
        .bind(data.tx_power)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(QsoRecord {
            id,
            logbook_id: logbook_id.map(str::to_string),
            data: data.clone(),
        })
    }

    async fn list_records(&self, logbook_id: Option<&str>) -> Result<Vec<QsoRecord>> {
        let rows = match logbook_id {
            Some(logbook_id) => {
                sqlx::query("SELECT * FROM qsos WHERE logbook_id = ? ORDER BY datetime, created_at")
                    .bind(logbook_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT * FROM qsos ORDER BY datetime, created_at")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(row_to_record).collect()
    }
}

impl SqliteStore {
    pub async fn create_logbook(&self, name: &str) -> Result<Logbook> {
        let logbook = Logbook {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: now_timestamp(),
        };

        sqlx::query("INSERT INTO logbooks (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&logbook.id)
            .bind(&logbook.name)
            .bind(&logbook.created_at)
            .execute(&self.pool)
            .await?;

        log::info!("Created logbook '{}' ({})", logbook.name, logbook.id);
        Ok(logbook)
    }

    pub async fn list_logbooks(&self) -> Result<Vec<Logbook>> {
        let rows = sqlx::query("SELECT * FROM logbooks ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_logbook).collect()
    }

    pub async fn get_logbook(&self, id: &str) -> Result<Logbook> {
        let row = sqlx::query("SELECT * FROM logbooks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| LogbookError::NotFound(format!("logbook {}", id)))?;
        row_to_logbook(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> QsoData {
        let mut qso = QsoData::new("TA1AB", Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap());
        qso.freq = Some(14.074);
        qso.mode = Some("FT8".to_string());
        qso.rst_received = Some("-12".to_string());
        qso
    }

    #[tokio::test]
    async fn test_create_and_list_records() {
        let store = SqliteStore::in_memory().await.unwrap();
        let created = store.create_record(&sample(), None).await.unwrap();
        assert!(!created.id.is_empty());

        let records = store.list_records(None).await.unwrap();
        assert_eq!(records, vec![created]);
    }

    #[tokio::test]
    async fn test_list_records_by_logbook() {
        let store = SqliteStore::in_memory().await.unwrap();
        let logbook = store.create_logbook("Field Day").await.unwrap();

        store.create_record(&sample(), Some(&logbook.id)).await.unwrap();
        store.create_record(&sample(), None).await.unwrap();

        assert_eq!(store.list_records(Some(&logbook.id)).await.unwrap().len(), 1);
        assert_eq!(store.list_records(None).await.unwrap().len(), 2);
        assert_eq!(store.stats().await.unwrap().qso_count, 2);
    }

    #[tokio::test]
    async fn test_logbooks() {
        let store = SqliteStore::in_memory().await.unwrap();
        let home = store.create_logbook("Home").await.unwrap();
        store.create_logbook("Contest").await.unwrap();

        let names: Vec<String> = store
            .list_logbooks()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Contest".to_string(), "Home".to_string()]);

        assert_eq!(store.get_logbook(&home.id).await.unwrap(), home);
        assert!(matches!(
            store.get_logbook("nope").await,
            Err(LogbookError::NotFound(_))
        ));
    }
}
