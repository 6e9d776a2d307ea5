use std::fmt;
use thiserror::Error;

/// The key a failed account lookup was made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKey {
    Id(i32),
    Number(i64),
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKey::Id(id) => write!(f, "account {} not found", id),
            AccountKey::Number(number) => write!(f, "account with number [{}] not found", number),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to connect to database: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("{0}")]
    NotFound(AccountKey),
    #[error("Updating accounts is not supported")]
    UpdateUnsupported,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// True when the database rejected a write on a unique or primary key.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StoreError::Database(sqlx::Error::Database(err)) => err.is_unique_violation(),
            _ => false,
        }
    }
}
