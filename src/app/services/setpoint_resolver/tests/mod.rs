//! Shared fixtures for setpoint resolution tests
//!
//! Tuning databases are real SQLite files created in a temp directory.

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::path::Path;


/// Create a tuning database with the `Tag`/`DataItem` schema
///
/// `items` are `(tag_name, item_name, value_sql)`; the value is inlined as an
/// SQL literal so tests control the storage class (`2.0`, `5`, `'high'`, `NULL`).
pub async fn create_tuning_db(path: &Path, items: &[(&str, &str, &str)]) {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();

    sqlx::query("CREATE TABLE Tag (TagID INTEGER PRIMARY KEY, TagName TEXT NOT NULL)")
        .execute(&mut conn)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE DataItem (DataItemID INTEGER PRIMARY KEY, TagID INTEGER NOT NULL, \
         DataItemName TEXT NOT NULL, Value)",
    )
    .execute(&mut conn)
    .await
    .unwrap();

    for (tag_name, item_name, value_sql) in items {
        let tag_id: Option<i64> = sqlx::query_scalar("SELECT TagID FROM Tag WHERE TagName = ?")
            .bind(tag_name)
            .fetch_optional(&mut conn)
            .await
            .unwrap();
        let tag_id = match tag_id {
            Some(id) => id,
            None => sqlx::query("INSERT INTO Tag (TagName) VALUES (?)")
                .bind(tag_name)
                .execute(&mut conn)
                .await
                .unwrap()
                .last_insert_rowid(),
        };

        sqlx::query(&format!(
            "INSERT INTO DataItem (TagID, DataItemName, Value) VALUES (?, ?, {})",
            value_sql
        ))
        .bind(tag_id)
        .bind(item_name)
        .execute(&mut conn)
        .await
        .unwrap();
    }

    conn.close().await.unwrap();
}
