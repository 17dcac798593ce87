//! Error types for Spendcast

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Not enough usable rows to build features, train, or forecast
    #[error("{0}")]
    InsufficientData(String),

    /// Rejected request: unknown model family, bad amount, missing field
    #[error("{0}")]
    InvalidInput(String),

    /// The regressor failed while fitting or predicting
    #[error("{0}")]
    Fitting(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Auth(String),
}

impl Error {
    /// Whether the message is meant to be shown to the user as-is
    ///
    /// These are the expected failure paths (not enough data, bad input, a
    /// fit that did not converge). Front ends display the message and carry on.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::InsufficientData(_)
                | Error::InvalidInput(_)
                | Error::Fitting(_)
                | Error::NotFound(_)
                | Error::Auth(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
