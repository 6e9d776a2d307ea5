use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Account {
    /// Assigned by the store on insert; ignored by `create_account`.
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Alternate lookup key. Not unique.
    pub number: i64,
    /// Opaque credential hash, stored and returned verbatim.
    #[serde(skip_serializing)]
    pub encrypted_password: String,
    pub balance: Amount,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Builds a fully formed account ready for `create_account`.
    ///
    /// `created_at` is stamped here rather than by the database; `id` stays 0
    /// until the store assigns one.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        number: i64,
        encrypted_password: impl Into<String>,
        balance: Amount,
    ) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            number,
            encrypted_password: encrypted_password.into(),
            balance,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Self {
        Amount(value)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(value)
    }
}
