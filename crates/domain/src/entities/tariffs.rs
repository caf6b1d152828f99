use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct TariffEntity {
    pub id: i32,
    pub name: String,
    pub price_minor: i32,
    pub duration_days: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct InsertTariffEntity {
    pub name: String,
    pub price_minor: i32,
    pub duration_days: i32,
}
