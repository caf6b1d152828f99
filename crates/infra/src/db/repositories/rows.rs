use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::postgres::schema::{payments, promo_codes, tariffs, users};
use domain::entities::{
    promo_codes::PromoCodeEntity, tariffs::TariffEntity, users::UserEntity,
};

/// Raw rows used for Diesel queries; the domain entities stay free of
/// storage derives.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
pub struct UserRow {
    pub id: i64,
    pub username: Option<String>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserEntity {
    fn from(value: UserRow) -> Self {
        Self {
            id: value.id,
            username: value.username,
            subscription_end: value.subscription_end,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = tariffs)]
pub struct TariffRow {
    pub id: i32,
    pub name: String,
    pub price_minor: i32,
    pub duration_days: i32,
    pub created_at: DateTime<Utc>,
}

impl From<TariffRow> for TariffEntity {
    fn from(value: TariffRow) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price_minor: value.price_minor,
            duration_days: value.duration_days,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = promo_codes)]
pub struct PromoCodeRow {
    pub id: i32,
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: i32,
    pub uses_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PromoCodeRow> for PromoCodeEntity {
    fn from(value: PromoCodeRow) -> Self {
        Self {
            id: value.id,
            code: value.code,
            discount_percent: value.discount_percent,
            max_uses: value.max_uses,
            uses_count: value.uses_count,
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tariffs)]
pub struct NewTariffRow {
    pub name: String,
    pub price_minor: i32,
    pub duration_days: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = promo_codes)]
pub struct NewPromoCodeRow {
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow {
    pub user_id: i64,
    pub tariff_name: String,
    pub amount_minor: i32,
    pub duration_days: i32,
    pub provider_payment_id: String,
}
