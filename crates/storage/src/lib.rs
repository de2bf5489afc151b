pub mod db;
pub mod rules_file;

use thiserror::Error;

pub use db::{append_records, create_db, load_history, DbPool};
pub use rules_file::{load_overrides, save_overrides};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}
