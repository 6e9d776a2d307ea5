use crate::data::bootstrap::{self, SeedPolicy, SeedReport};
use crate::domain::error::{AccountKey, StoreError};
use crate::domain::models::{Account, Amount};
use crate::domain::repository::{AccountRepository, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{instrument, trace};

/// Account repository over a shared Postgres pool.
///
/// Holds no state besides the pool handle; every call is a single statement
/// under autocommit.
#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates and seeds the demo tables on this repository's pool.
    pub async fn init(&self, policy: SeedPolicy) -> Result<SeedReport, StoreError> {
        bootstrap::init(&self.pool, policy).await
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i32,
    first_name: String,
    last_name: String,
    number: i64,
    encrypted_password: String,
    balance: i64,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            number: row.number,
            encrypted_password: row.encrypted_password,
            balance: Amount::new(row.balance),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[instrument(skip_all, fields(number = account.number))]
    async fn create_account(&self, account: &Account) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO account (first_name, last_name, number, encrypted_password, balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(&account.encrypted_password)
        .bind(account.balance.inner())
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;

        trace!("Account inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        trace!(rows_affected = result.rows_affected(), "Delete executed");
        Ok(())
    }

    async fn update_account(&self, _account: &Account) -> StoreResult<()> {
        Err(StoreError::UpdateUnsupported)
    }

    #[instrument(skip(self))]
    async fn get_accounts(&self) -> StoreResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, first_name, last_name, number, encrypted_password, balance, created_at
            FROM account
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        trace!(count = rows.len(), "Accounts fetched");
        Ok(rows.into_iter().map(Account::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_account_by_id(&self, id: i32) -> StoreResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, first_name, last_name, number, encrypted_password, balance, created_at
            FROM account
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::from)
            .ok_or(StoreError::NotFound(AccountKey::Id(id)))
    }

    #[instrument(skip(self))]
    async fn get_account_by_number(&self, number: i64) -> StoreResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, first_name, last_name, number, encrypted_password, balance, created_at
            FROM account
            WHERE number = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::from)
            .ok_or(StoreError::NotFound(AccountKey::Number(number)))
    }
}
