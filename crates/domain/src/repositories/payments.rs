use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::value_objects::stats::{SalesSummary, TariffPopularity};

/// Read-side of the payment ledger. Rows are inserted only by the
/// checkout commit (`CheckoutRepository`), never updated or deleted.
#[automock]
#[async_trait]
pub trait PaymentRepository {
    /// Revenue and sale count since the given instant; all time when absent.
    async fn sales_since(&self, since: Option<DateTime<Utc>>) -> Result<SalesSummary>;

    async fn most_popular_tariff(&self) -> Result<Option<TariffPopularity>>;
}
