use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SalesSummary {
    pub revenue_minor: i64,
    pub sales: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TariffPopularity {
    pub tariff_name: String,
    pub sales: i64,
}
