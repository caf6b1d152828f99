use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use domain::{
    entities::tariffs::{InsertTariffEntity, TariffEntity},
    repositories::tariffs::TariffRepository,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("tariff not found")]
    TariffNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Admin management of the tariff catalog. Tariffs are snapshotted into
/// payments at sale time, so deleting one never rewrites history.
pub struct CatalogUseCase<T>
where
    T: TariffRepository + Send + Sync + 'static,
{
    tariff_repo: Arc<T>,
}

impl<T> CatalogUseCase<T>
where
    T: TariffRepository + Send + Sync + 'static,
{
    pub fn new(tariff_repo: Arc<T>) -> Self {
        Self { tariff_repo }
    }

    pub async fn create_tariff(
        &self,
        name: &str,
        price_minor: i32,
        duration_days: i32,
    ) -> CatalogResult<i32> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation(
                "tariff name must not be empty".to_string(),
            ));
        }
        if price_minor <= 0 {
            return Err(CatalogError::Validation(
                "price must be a positive number".to_string(),
            ));
        }
        if duration_days <= 0 {
            return Err(CatalogError::Validation(
                "duration must be a positive number of days".to_string(),
            ));
        }

        let tariff_id = self
            .tariff_repo
            .create(InsertTariffEntity {
                name: name.to_string(),
                price_minor,
                duration_days,
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, "catalog: failed to create tariff");
                CatalogError::Internal(err)
            })?;

        info!(tariff_id, price_minor, duration_days, "catalog: tariff created");
        Ok(tariff_id)
    }

    pub async fn list_tariffs(&self) -> CatalogResult<Vec<TariffEntity>> {
        let tariffs = self.tariff_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "catalog: failed to list tariffs");
            CatalogError::Internal(err)
        })?;

        Ok(tariffs)
    }

    pub async fn delete_tariff(&self, tariff_id: i32) -> CatalogResult<()> {
        let deleted = self.tariff_repo.delete(tariff_id).await.map_err(|err| {
            error!(tariff_id, db_error = ?err, "catalog: failed to delete tariff");
            CatalogError::Internal(err)
        })?;

        if !deleted {
            return Err(CatalogError::TariffNotFound);
        }

        info!(tariff_id, "catalog: tariff deleted");
        Ok(())
    }
}
