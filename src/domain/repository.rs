use crate::domain::error::StoreError;
use crate::domain::models::Account;
use async_trait::async_trait;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations over [`Account`].
///
/// Lookups that match nothing fail with [`StoreError::NotFound`]; deletes of
/// missing rows succeed silently.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create_account(&self, account: &Account) -> StoreResult<()>;
    async fn delete_account(&self, id: i32) -> StoreResult<()>;
    /// Always fails with [`StoreError::UpdateUnsupported`] and never mutates.
    async fn update_account(&self, account: &Account) -> StoreResult<()>;
    async fn get_accounts(&self) -> StoreResult<Vec<Account>>;
    async fn get_account_by_id(&self, id: i32) -> StoreResult<Account>;
    /// Returns the lowest-id account when several share `number`.
    async fn get_account_by_number(&self, number: i64) -> StoreResult<Account>;
}
