use chrono::{Local, NaiveDate};
use extrato_core::{Bank, Money, TransactionRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;

use crate::StorageError;

pub type DbPool = Pool<Sqlite>;

pub async fn create_db(path: &Path) -> Result<DbPool, StorageError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ledger_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner TEXT NOT NULL,
            bank TEXT NOT NULL,
            date TEXT NOT NULL,
            entry_type TEXT NOT NULL,
            description TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            category TEXT NOT NULL DEFAULT 'Outros',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_ledger_entries_owner ON ledger_entries (owner)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Appends records for `owner` in one transaction. A record without a
/// posting date is stored with today's local date. The whole batch is
/// rejected if any amount does not fit an `i64` of cents.
pub async fn append_records(
    pool: &DbPool,
    owner: &str,
    records: &[TransactionRecord],
) -> Result<usize, StorageError> {
    let today = Local::now().date_naive();
    let mut tx = pool.begin().await?;

    for record in records {
        let cents = record.amount.to_cents().ok_or_else(|| {
            StorageError::InvalidRow(format!(
                "amount {} of '{}' is out of range",
                record.amount, record.description
            ))
        })?;
        sqlx::query(
            "INSERT INTO ledger_entries (owner, bank, date, entry_type, description, amount_cents, category) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(owner)
        .bind(record.bank.short_code())
        .bind(stored_date(record, today).to_string())
        .bind(&record.entry_type)
        .bind(&record.description)
        .bind(cents)
        .bind(&record.category)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(owner, count = records.len(), "appended ledger records");
    Ok(records.len())
}

/// All records stored for `owner`, oldest insert first.
pub async fn load_history(pool: &DbPool, owner: &str) -> Result<Vec<TransactionRecord>, StorageError> {
    let rows = sqlx::query_as::<_, (String, String, String, String, i64, String)>(
        "SELECT bank, date, entry_type, description, amount_cents, category FROM ledger_entries WHERE owner = ? ORDER BY id"
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| {
            let bank: Bank = r
                .0
                .parse()
                .map_err(|e: extrato_core::UnknownBank| StorageError::InvalidRow(e.to_string()))?;
            Ok(TransactionRecord {
                bank,
                date: NaiveDate::parse_from_str(&r.1, "%Y-%m-%d").ok(),
                entry_type: r.2,
                description: r.3,
                amount: Money::from_cents(r.4),
                category: r.5,
            })
        })
        .collect()
}

fn stored_date(record: &TransactionRecord, today: NaiveDate) -> NaiveDate {
    record.date.unwrap_or(today)
}
