use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AppliedPromo {
    pub code: String,
    pub discount_percent: i32,
}

/// Priced purchase offer handed back to the messaging layer. `reference`
/// is the encoded token the payment provider echoes on confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseQuote {
    pub tariff_id: i32,
    pub tariff_name: String,
    pub duration_days: i32,
    pub base_price_minor: i32,
    pub final_price_minor: i32,
    pub promo: Option<AppliedPromo>,
    pub reference: String,
}
