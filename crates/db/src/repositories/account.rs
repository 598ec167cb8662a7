//! Chart of accounts repository with a read-through cache.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use keel_core::accounts::Account;
use keel_core::posting::{AccountStore, StoreError};
use keel_shared::types::{AccountId, CompanyId, Currency};

use crate::entities::accounts;

use super::{corrupt, store_err};

fn to_domain(model: accounts::Model) -> Result<Account, StoreError> {
    let currency = Currency::from_str(&model.currency)
        .map_err(|_| corrupt("currency", &model.currency))?;
    Ok(Account {
        id: AccountId::from_uuid(model.id),
        company_id: CompanyId::from_uuid(model.company_id),
        code: model.code,
        name: model.name,
        account_type: model.account_type.into(),
        currency,
        is_active: model.is_active,
        allow_direct_posting: model.allow_direct_posting,
    })
}

/// Direct (uncached) chart-of-accounts reads.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(
        &self,
        company_id: CompanyId,
        ids: &[AccountId],
    ) -> Result<HashMap<AccountId, Account>, StoreError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        let models = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id.into_inner()))
            .filter(accounts::Column::Id.is_in(uuids))
            .all(&self.db)
            .await
            .map_err(store_err)?;

        let mut out = HashMap::with_capacity(models.len());
        for model in models {
            let account = to_domain(model)?;
            out.insert(account.id, account);
        }
        Ok(out)
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_accounts(
        &self,
        company_id: CompanyId,
        ids: &[AccountId],
    ) -> Result<HashMap<AccountId, Account>, StoreError> {
        self.load(company_id, ids).await
    }
}

/// Read-through cache over [`AccountRepository`].
///
/// Account records change rarely but are read on every posting. The TTL
/// bounds how stale an is_active or allow_direct_posting flag can be.
pub struct CachedAccountStore {
    inner: AccountRepository,
    cache: Cache<(Uuid, Uuid), Account>,
}

impl CachedAccountStore {
    /// Creates a cache with the given time-to-live in seconds.
    #[must_use]
    pub fn new(inner: AccountRepository, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(50_000)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl AccountStore for CachedAccountStore {
    async fn find_accounts(
        &self,
        company_id: CompanyId,
        ids: &[AccountId],
    ) -> Result<HashMap<AccountId, Account>, StoreError> {
        let mut out = HashMap::with_capacity(ids.len());
        let mut missing = Vec::new();
        for id in ids {
            match self.cache.get(&(company_id.into_inner(), id.into_inner())) {
                Some(account) => {
                    out.insert(*id, account);
                }
                None => missing.push(*id),
            }
        }

        if !missing.is_empty() {
            let fetched = self.inner.load(company_id, &missing).await?;
            for (id, account) in fetched {
                self.cache
                    .insert((company_id.into_inner(), id.into_inner()), account.clone());
                out.insert(id, account);
            }
        }
        Ok(out)
    }
}
