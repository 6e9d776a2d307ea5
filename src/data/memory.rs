use crate::domain::error::{AccountKey, StoreError};
use crate::domain::models::Account;
use crate::domain::repository::{AccountRepository, StoreResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Default)]
struct Accounts {
    last_id: i32,
    rows: BTreeMap<i32, Account>,
}

/// Process-local stand-in for the Postgres repository.
///
/// Ids are assigned sequentially starting at 1, mirroring a SERIAL column, and
/// are never reused after a delete.
#[derive(Clone)]
pub struct InMemoryAccountRepository {
    storage: Arc<RwLock<Accounts>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Accounts::default())),
        }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    #[instrument(skip_all, fields(number = account.number))]
    async fn create_account(&self, account: &Account) -> StoreResult<()> {
        trace!("Acquiring write lock for account storage");
        let mut storage = self.storage.write().await;
        storage.last_id += 1;
        let id = storage.last_id;
        storage.rows.insert(
            id,
            Account {
                id,
                ..account.clone()
            },
        );
        debug!(account_id = id, "Account saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, id: i32) -> StoreResult<()> {
        let mut storage = self.storage.write().await;
        let removed = storage.rows.remove(&id).is_some();
        debug!(removed, "Delete applied to memory storage");
        Ok(())
    }

    async fn update_account(&self, _account: &Account) -> StoreResult<()> {
        Err(StoreError::UpdateUnsupported)
    }

    #[instrument(skip(self))]
    async fn get_accounts(&self) -> StoreResult<Vec<Account>> {
        let storage = self.storage.read().await;
        Ok(storage.rows.values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn get_account_by_id(&self, id: i32) -> StoreResult<Account> {
        let storage = self.storage.read().await;
        storage
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(AccountKey::Id(id)))
    }

    #[instrument(skip(self))]
    async fn get_account_by_number(&self, number: i64) -> StoreResult<Account> {
        let storage = self.storage.read().await;
        trace!("Scanning memory storage by account number");
        storage
            .rows
            .values()
            .find(|a| a.number == number)
            .cloned()
            .ok_or(StoreError::NotFound(AccountKey::Number(number)))
    }
}
