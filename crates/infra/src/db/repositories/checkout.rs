use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*, update};
use std::sync::Arc;

use crate::db::{
    postgres::{
        postgres_connection::PgPool,
        schema::{payments, promo_codes, tariffs, users},
    },
    repositories::rows::NewPaymentRow,
};
use domain::{
    repositories::checkout::{CheckoutOutcome, CheckoutRepository, ConfirmedCheckout},
    value_objects::memberships::extended_end,
};

/// Name recorded on a payment whose tariff was deleted between invoice
/// and confirmation.
const UNKNOWN_TARIFF_NAME: &str = "Unknown tariff";

pub struct CheckoutPostgres {
    db_pool: Arc<PgPool>,
}

impl CheckoutPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CheckoutRepository for CheckoutPostgres {
    async fn apply_confirmed(&self, checkout: ConfirmedCheckout) -> Result<CheckoutOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // One transaction for the whole commit: duplicate detection,
        // promo redemption, payment insert and extension either all
        // land or none do. The unique index on provider_payment_id
        // backstops two confirmations racing past the duplicate check.
        let outcome = conn.transaction::<CheckoutOutcome, anyhow::Error, _>(|conn| {
            let already_recorded = payments::table
                .filter(payments::provider_payment_id.eq(&checkout.provider_payment_id))
                .select(payments::id)
                .first::<i32>(conn)
                .optional()?
                .is_some();

            if already_recorded {
                let current_end = users::table
                    .find(checkout.user_id)
                    .select(users::subscription_end)
                    .first::<Option<DateTime<Utc>>>(conn)
                    .optional()?
                    .flatten();

                return Ok(CheckoutOutcome::Duplicate { current_end });
            }

            // The agreed price stands even when the code ran out between
            // preview and confirmation; the counter only moves while
            // capacity remains.
            let promo_redeemed = match checkout.promo_code.as_deref() {
                Some(code) => {
                    let affected = update(
                        promo_codes::table
                            .filter(promo_codes::code.eq(code.to_uppercase()))
                            .filter(promo_codes::is_active.eq(true))
                            .filter(promo_codes::uses_count.lt(promo_codes::max_uses)),
                    )
                    .set(promo_codes::uses_count.eq(promo_codes::uses_count + 1))
                    .execute(conn)?;

                    affected == 1
                }
                None => false,
            };

            let tariff_name = tariffs::table
                .find(checkout.tariff_id)
                .select(tariffs::name)
                .first::<String>(conn)
                .optional()?
                .unwrap_or_else(|| UNKNOWN_TARIFF_NAME.to_string());

            insert_into(users::table)
                .values(users::id.eq(checkout.user_id))
                .on_conflict(users::id)
                .do_nothing()
                .execute(conn)?;

            insert_into(payments::table)
                .values(NewPaymentRow {
                    user_id: checkout.user_id,
                    tariff_name,
                    amount_minor: checkout.amount_minor,
                    duration_days: checkout.duration_days,
                    provider_payment_id: checkout.provider_payment_id.clone(),
                })
                .execute(conn)?;

            let current_end = users::table
                .find(checkout.user_id)
                .select(users::subscription_end)
                .for_update()
                .first::<Option<DateTime<Utc>>>(conn)?;

            let new_end = extended_end(
                Utc::now(),
                current_end,
                i64::from(checkout.duration_days),
            );

            update(users::table.find(checkout.user_id))
                .set(users::subscription_end.eq(Some(new_end)))
                .execute(conn)?;

            Ok(CheckoutOutcome::Applied {
                new_end,
                promo_redeemed,
            })
        })?;

        Ok(outcome)
    }
}
