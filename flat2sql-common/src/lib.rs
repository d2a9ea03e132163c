pub mod config;
pub use config::Config;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Flat2SqlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: expected {expected} fields, found {found}")]
    Format {
        row: u64,
        expected: usize,
        found: usize,
    },
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Flat2SqlError>;
