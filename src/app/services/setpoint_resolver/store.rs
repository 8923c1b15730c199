//! Read-only access to one site's tuning-parameter database
//!
//! The database has a `Tag` table (`TagID`, `TagName`) and a `DataItem`
//! table (`TagID`, `DataItemName`, `Value`). Only the four setpoint items
//! are ever read.

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row, TypeInfo, ValueRef};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app::models::SetpointValue;
use crate::error::{Error, Result};

/// Setpoint rows for one tag, item name descending
const SETPOINT_QUERY: &str = r#"
    SELECT d.DataItemName, d.Value
    FROM Tag t
    JOIN DataItem d ON d.TagID = t.TagID
    WHERE t.TagName = ?
      AND d.DataItemName IN ('LL', 'PL', 'PH', 'HH')
    ORDER BY 1 DESC
"#;

/// A setpoint row as stored, before the item name is interpreted
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSetpoint {
    pub item_name: String,
    pub value: Option<SetpointValue>,
}

/// An open connection to one site's database
#[derive(Debug)]
pub struct SiteStore {
    site_id: String,
    path: PathBuf,
    conn: SqliteConnection,
}

impl SiteStore {
    /// Open the database read-only; a missing file is an error
    pub async fn open(site_id: &str, path: &Path) -> Result<Self> {
        let conn = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .connect()
            .await
            .map_err(|source| Error::StoreUnavailable {
                site_id: site_id.to_string(),
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Opened tuning database for {}: {}", site_id, path.display());

        Ok(Self {
            site_id: site_id.to_string(),
            path: path.to_path_buf(),
            conn,
        })
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch the setpoint rows recorded for `tag_name`
    pub async fn fetch_setpoints(&mut self, tag_name: &str) -> Result<Vec<StoredSetpoint>> {
        let query_error = |source| Error::StoreQuery {
            site_id: self.site_id.clone(),
            tag_name: tag_name.to_string(),
            source,
        };

        let rows = sqlx::query(SETPOINT_QUERY)
            .bind(tag_name)
            .fetch_all(&mut self.conn)
            .await
            .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                Ok(StoredSetpoint {
                    item_name: row.try_get(0)?,
                    value: stored_value(row, 1)?,
                })
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            .map_err(query_error)
    }

    /// Close the connection, logging rather than failing
    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            warn!(
                "Failed to close tuning database for {} ({}): {}",
                self.site_id,
                self.path.display(),
                e
            );
        } else {
            debug!("Closed tuning database for {}", self.site_id);
        }
    }
}

/// Decode a value column by the storage class of the stored value
///
/// NULL is absent. Blobs are read as UTF-8 text, lossily.
pub fn stored_value(row: &SqliteRow, index: usize) -> sqlx::Result<Option<SetpointValue>> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(None);
    }

    let storage_class = raw.type_info().name().to_string();
    let value = match storage_class.as_str() {
        "INTEGER" => SetpointValue::Integer(row.try_get(index)?),
        "REAL" => SetpointValue::Real(row.try_get(index)?),
        "TEXT" => SetpointValue::Text(row.try_get(index)?),
        _ => {
            let bytes: Vec<u8> = row.try_get_unchecked(index)?;
            SetpointValue::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
    };
    Ok(Some(value))
}
