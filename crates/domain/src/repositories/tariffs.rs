use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::entities::tariffs::{InsertTariffEntity, TariffEntity};

#[automock]
#[async_trait]
pub trait TariffRepository {
    async fn create(&self, tariff: InsertTariffEntity) -> Result<i32>;

    async fn list(&self) -> Result<Vec<TariffEntity>>;

    async fn find(&self, tariff_id: i32) -> Result<Option<TariffEntity>>;

    /// Returns false when no such tariff existed.
    async fn delete(&self, tariff_id: i32) -> Result<bool>;
}
