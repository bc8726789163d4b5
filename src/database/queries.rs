//! # Database Queries Module
//!
//! This module centralizes all SQL run against a log collection table.
//! Each function takes the connection it should run on, so callers decide
//! whether that is a scoped pool checkout, a transaction, or a test connection.
//!
//! ## Query Categories
//!
//! - **Log Entry Queries**: Insert, filtered select and filtered delete
//! - **General Queries**: Counts and whole-collection cleanup
//!
//! The collection name is interpolated as a quoted identifier and must have
//! passed [`super::is_valid_collection_name`]; everything else is bound.

use crate::models::LogEntry;
use crate::query::Predicate;
use crate::query::sql::push_predicate;
use sqlx::sqlite::{SqliteConnection, SqliteQueryResult, SqliteRow};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row, Sqlite};

const LOG_ENTRY_COLUMNS: &str =
    r#""message", "logLevel", "originService", "labels", "created", "modified", "args""#;

///////////////////////////////////////////////////////////////////////////////
//****                        Log Entry Queries                          ****//
///////////////////////////////////////////////////////////////////////////////

/// Insert one log entry as a new row
pub async fn insert_log_entry(
    conn: &mut SqliteConnection,
    collection: &str,
    entry: &LogEntry,
) -> Result<SqliteQueryResult, sqlx::Error> {
    sqlx::query(&format!(
        "INSERT INTO \"{}\" ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
        collection, LOG_ENTRY_COLUMNS
    ))
    .bind(&entry.message)
    .bind(&entry.level)
    .bind(&entry.origin_service)
    .bind(Json(&entry.labels))
    .bind(entry.created)
    .bind(entry.modified)
    .bind(Json(&entry.args))
    .execute(conn)
    .await
}

/// Fetch entries matching `predicate`, at most `limit` rows when given
pub async fn fetch_log_entries(
    conn: &mut SqliteConnection,
    collection: &str,
    predicate: &Predicate,
    limit: Option<i64>,
) -> Result<Vec<LogEntry>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {} FROM \"{}\" WHERE ",
        LOG_ENTRY_COLUMNS, collection
    ));
    push_predicate(&mut builder, predicate);
    if let Some(limit) = limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }

    let rows = builder.build().fetch_all(conn).await?;
    rows.iter().map(row_to_log_entry).collect()
}

/// Delete entries matching `predicate`, returning how many were removed
pub async fn delete_log_entries(
    conn: &mut SqliteConnection,
    collection: &str,
    predicate: &Predicate,
) -> Result<u64, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Sqlite>::new(format!("DELETE FROM \"{}\" WHERE ", collection));
    push_predicate(&mut builder, predicate);

    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}

/// Decode one selected row back into a log entry
fn row_to_log_entry(row: &SqliteRow) -> Result<LogEntry, sqlx::Error> {
    let labels: Json<Vec<String>> = row.try_get("labels")?;
    let args: Json<Vec<serde_json::Value>> = row.try_get("args")?;

    Ok(LogEntry {
        level: row.try_get("logLevel")?,
        args: args.0,
        origin_service: row.try_get("originService")?,
        message: row.try_get("message")?,
        labels: labels.0,
        created: row.try_get("created")?,
        modified: row.try_get("modified")?,
    })
}

///////////////////////////////////////////////////////////////////////////////
//****                         General Queries                           ****//
///////////////////////////////////////////////////////////////////////////////

/// Get count of all entries in the collection
pub async fn count_log_entries(
    conn: &mut SqliteConnection,
    collection: &str,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT COUNT(*) as count FROM \"{}\"", collection))
        .fetch_one(conn)
        .await?;
    row.try_get("count")
}

/// Delete every entry in the collection
pub async fn delete_all_log_entries(
    conn: &mut SqliteConnection,
    collection: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(&format!("DELETE FROM \"{}\"", collection))
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
