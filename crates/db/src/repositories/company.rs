//! Company settings repository.

use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use keel_core::posting::{CompanyStore, StoreError};
use keel_shared::types::{CompanyId, Currency};

use crate::entities::companies;

use super::{corrupt, store_err};

/// Company configuration reads.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn base_currency(
        &self,
        company_id: CompanyId,
    ) -> Result<Option<Currency>, StoreError> {
        let model = companies::Entity::find_by_id(company_id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;

        match model {
            Some(company) => {
                let currency = Currency::from_str(&company.base_currency)
                    .map_err(|_| corrupt("base_currency", &company.base_currency))?;
                Ok(Some(currency))
            }
            None => Ok(None),
        }
    }
}
