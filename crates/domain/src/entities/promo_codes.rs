use chrono::{DateTime, Utc};

/// Discount code. `uses_count` only ever increments and never exceeds
/// `max_uses`; codes are deactivated, never deleted.
#[derive(Debug, Clone)]
pub struct PromoCodeEntity {
    pub id: i32,
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: i32,
    pub uses_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PromoCodeEntity {
    pub fn is_redeemable(&self) -> bool {
        self.is_active && self.uses_count < self.max_uses
    }
}

#[derive(Debug, Clone)]
pub struct InsertPromoCodeEntity {
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: i32,
}
