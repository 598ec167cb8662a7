//! Accounting period repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use keel_core::fiscal::AccountingPeriod;
use keel_core::posting::{PeriodStore, StoreError};
use keel_shared::types::{CompanyId, PeriodId};

use crate::entities::fiscal_periods;

use super::store_err;

pub(crate) fn to_domain(model: fiscal_periods::Model) -> AccountingPeriod {
    AccountingPeriod {
        id: PeriodId::from_uuid(model.id),
        company_id: CompanyId::from_uuid(model.company_id),
        name: model.name,
        start_date: model.start_date,
        end_date: model.end_date,
        status: model.status.into(),
    }
}

/// Accounting period reads.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PeriodStore for PeriodRepository {
    async fn find_period_for_date(
        &self,
        company_id: CompanyId,
        date: NaiveDate,
    ) -> Result<Option<AccountingPeriod>, StoreError> {
        let model = fiscal_periods::Entity::find()
            .filter(fiscal_periods::Column::CompanyId.eq(company_id.into_inner()))
            .filter(fiscal_periods::Column::StartDate.lte(date))
            .filter(fiscal_periods::Column::EndDate.gte(date))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(to_domain))
    }

    async fn find_period(
        &self,
        company_id: CompanyId,
        period_id: PeriodId,
    ) -> Result<Option<AccountingPeriod>, StoreError> {
        let model = fiscal_periods::Entity::find_by_id(period_id.into_inner())
            .filter(fiscal_periods::Column::CompanyId.eq(company_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(to_domain))
    }
}
