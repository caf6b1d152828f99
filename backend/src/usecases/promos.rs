use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use domain::{
    entities::promo_codes::{InsertPromoCodeEntity, PromoCodeEntity},
    repositories::promo_codes::PromoCodeRepository,
};

#[derive(Debug, Error)]
pub enum PromoAdminError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("promo code already exists")]
    DuplicateCode,
    #[error("promo code not found")]
    PromoNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type PromoAdminResult<T> = std::result::Result<T, PromoAdminError>;

pub struct PromoAdminUseCase<P>
where
    P: PromoCodeRepository + Send + Sync + 'static,
{
    promo_repo: Arc<P>,
}

impl<P> PromoAdminUseCase<P>
where
    P: PromoCodeRepository + Send + Sync + 'static,
{
    pub fn new(promo_repo: Arc<P>) -> Self {
        Self { promo_repo }
    }

    pub async fn create_promo_code(
        &self,
        code: &str,
        discount_percent: i32,
        max_uses: i32,
    ) -> PromoAdminResult<i32> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(PromoAdminError::Validation(
                "promo code must not be empty".to_string(),
            ));
        }
        if code.contains(':') {
            return Err(PromoAdminError::Validation(
                "promo code must not contain ':'".to_string(),
            ));
        }
        if !(1..=100).contains(&discount_percent) {
            return Err(PromoAdminError::Validation(
                "discount must be between 1 and 100 percent".to_string(),
            ));
        }
        if max_uses <= 0 {
            return Err(PromoAdminError::Validation(
                "max uses must be a positive number".to_string(),
            ));
        }

        let existing = self.promo_repo.find_by_code(&code).await.map_err(|err| {
            error!(db_error = ?err, "promos: failed to check for an existing code");
            PromoAdminError::Internal(err)
        })?;
        if existing.is_some() {
            return Err(PromoAdminError::DuplicateCode);
        }

        let promo_id = self
            .promo_repo
            .create(InsertPromoCodeEntity {
                code: code.clone(),
                discount_percent,
                max_uses,
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, "promos: failed to create promo code");
                PromoAdminError::Internal(err)
            })?;

        info!(promo_id, code = %code, discount_percent, max_uses, "promos: promo code created");
        Ok(promo_id)
    }

    pub async fn list_promo_codes(&self) -> PromoAdminResult<Vec<PromoCodeEntity>> {
        let promos = self.promo_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "promos: failed to list promo codes");
            PromoAdminError::Internal(err)
        })?;

        Ok(promos)
    }

    /// Returns the new active state.
    pub async fn toggle_promo_code(&self, promo_id: i32) -> PromoAdminResult<bool> {
        let new_state = self
            .promo_repo
            .toggle_active(promo_id)
            .await
            .map_err(|err| {
                error!(promo_id, db_error = ?err, "promos: failed to toggle promo code");
                PromoAdminError::Internal(err)
            })?
            .ok_or(PromoAdminError::PromoNotFound)?;

        info!(promo_id, is_active = new_state, "promos: promo code toggled");
        Ok(new_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::repositories::promo_codes::MockPromoCodeRepository;

    fn existing_promo() -> PromoCodeEntity {
        PromoCodeEntity {
            id: 7,
            code: "SALE10".to_string(),
            discount_percent: 10,
            max_uses: 5,
            uses_count: 0,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_normalizes_the_code_to_uppercase() {
        let mut promo_repo = MockPromoCodeRepository::new();
        promo_repo.expect_find_by_code().returning(|_| Ok(None));
        promo_repo
            .expect_create()
            .withf(|promo| promo.code == "SALE2025")
            .returning(|_| Ok(1));

        let usecase = PromoAdminUseCase::new(Arc::new(promo_repo));
        usecase.create_promo_code("sale2025", 15, 100).await.unwrap();
    }

    #[tokio::test]
    async fn create_rejects_out_of_range_discounts() {
        let usecase = PromoAdminUseCase::new(Arc::new(MockPromoCodeRepository::new()));

        for discount in [0, 101, -5] {
            let result = usecase.create_promo_code("SALE", discount, 10).await;
            assert!(matches!(result, Err(PromoAdminError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_codes() {
        let mut promo_repo = MockPromoCodeRepository::new();
        promo_repo
            .expect_find_by_code()
            .returning(|_| Ok(Some(existing_promo())));

        let usecase = PromoAdminUseCase::new(Arc::new(promo_repo));
        let result = usecase.create_promo_code("SALE10", 10, 5).await;
        assert!(matches!(result, Err(PromoAdminError::DuplicateCode)));
    }

    #[tokio::test]
    async fn toggle_surfaces_missing_codes() {
        let mut promo_repo = MockPromoCodeRepository::new();
        promo_repo.expect_toggle_active().returning(|_| Ok(None));

        let usecase = PromoAdminUseCase::new(Arc::new(promo_repo));
        let result = usecase.toggle_promo_code(99).await;
        assert!(matches!(result, Err(PromoAdminError::PromoNotFound)));
    }
}
