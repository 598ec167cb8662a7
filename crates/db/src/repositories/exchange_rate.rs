//! Exchange rate repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use keel_core::posting::{RateProvider, StoreError};
use keel_shared::types::{CompanyId, Currency};

use crate::entities::exchange_rates;

use super::store_err;

/// Exchange rate reads.
///
/// The effective rate for a date is the most recent rate on or before
/// that date.
#[derive(Debug, Clone)]
pub struct ExchangeRateRepository {
    db: DatabaseConnection,
}

impl ExchangeRateRepository {
    /// Creates a new exchange rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RateProvider for ExchangeRateRepository {
    async fn find_rate(
        &self,
        company_id: CompanyId,
        from: Currency,
        to: Currency,
        date: NaiveDate,
    ) -> Result<Option<Decimal>, StoreError> {
        let model = exchange_rates::Entity::find()
            .filter(exchange_rates::Column::CompanyId.eq(company_id.into_inner()))
            .filter(exchange_rates::Column::FromCurrency.eq(from.code()))
            .filter(exchange_rates::Column::ToCurrency.eq(to.code()))
            .filter(exchange_rates::Column::EffectiveDate.lte(date))
            .order_by_desc(exchange_rates::Column::EffectiveDate)
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(|m| m.rate))
    }
}
