use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*, update};
use std::sync::Arc;

use crate::db::{
    postgres::{postgres_connection::PgPool, schema::promo_codes},
    repositories::rows::{NewPromoCodeRow, PromoCodeRow},
};
use domain::{
    entities::promo_codes::{InsertPromoCodeEntity, PromoCodeEntity},
    repositories::promo_codes::PromoCodeRepository,
};

pub struct PromoCodePostgres {
    db_pool: Arc<PgPool>,
}

impl PromoCodePostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PromoCodeRepository for PromoCodePostgres {
    async fn create(&self, promo: InsertPromoCodeEntity) -> Result<i32> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let promo_id = insert_into(promo_codes::table)
            .values(NewPromoCodeRow {
                code: promo.code.to_uppercase(),
                discount_percent: promo.discount_percent,
                max_uses: promo.max_uses,
            })
            .returning(promo_codes::id)
            .get_result::<i32>(&mut conn)?;

        Ok(promo_id)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<PromoCodeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = promo_codes::table
            .filter(promo_codes::code.eq(code.to_uppercase()))
            .select(PromoCodeRow::as_select())
            .first::<PromoCodeRow>(&mut conn)
            .optional()?;

        Ok(row.map(PromoCodeEntity::from))
    }

    async fn list(&self) -> Result<Vec<PromoCodeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = promo_codes::table
            .order(promo_codes::id.asc())
            .select(PromoCodeRow::as_select())
            .load::<PromoCodeRow>(&mut conn)?;

        Ok(rows.into_iter().map(PromoCodeEntity::from).collect())
    }

    async fn toggle_active(&self, promo_id: i32) -> Result<Option<bool>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let new_state = update(promo_codes::table.find(promo_id))
            .set(promo_codes::is_active.eq(diesel::dsl::not(promo_codes::is_active)))
            .returning(promo_codes::is_active)
            .get_result::<bool>(&mut conn)
            .optional()?;

        Ok(new_state)
    }
}
