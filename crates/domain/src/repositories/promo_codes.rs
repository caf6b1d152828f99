use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::entities::promo_codes::{InsertPromoCodeEntity, PromoCodeEntity};

/// Lookup is case-insensitive: codes are normalized to uppercase at
/// every read and write site. Lookups only preview a discount;
/// redemption itself is a conditional increment inside the checkout
/// commit (`CheckoutRepository`), never a read-then-write.
#[automock]
#[async_trait]
pub trait PromoCodeRepository {
    async fn create(&self, promo: InsertPromoCodeEntity) -> Result<i32>;

    async fn find_by_code(&self, code: &str) -> Result<Option<PromoCodeEntity>>;

    async fn list(&self) -> Result<Vec<PromoCodeEntity>>;

    /// Flips the active flag; returns the new state, or `None` for an
    /// unknown id.
    async fn toggle_active(&self, promo_id: i32) -> Result<Option<bool>>;
}
