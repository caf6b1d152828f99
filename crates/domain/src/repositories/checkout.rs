use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

/// A decoded confirmation ready to be committed: the purchase reference
/// fields plus the provider transaction id.
#[derive(Debug, Clone)]
pub struct ConfirmedCheckout {
    pub user_id: i64,
    pub tariff_id: i32,
    pub amount_minor: i32,
    pub duration_days: i32,
    pub promo_code: Option<String>,
    pub provider_payment_id: String,
}

#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    Applied {
        new_end: DateTime<Utc>,
        promo_redeemed: bool,
    },
    /// The provider payment id was already recorded; nothing changed.
    Duplicate {
        current_end: Option<DateTime<Utc>>,
    },
}

/// The idempotent commit behind a payment confirmation. Duplicate
/// detection, promo redemption, the payment insert and the subscription
/// extension all happen in one storage transaction, so no partial state
/// (a payment without an extension, or the reverse) can ever be
/// observed.
#[automock]
#[async_trait]
pub trait CheckoutRepository {
    async fn apply_confirmed(&self, checkout: ConfirmedCheckout) -> Result<CheckoutOutcome>;
}
