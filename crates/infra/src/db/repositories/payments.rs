use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::postgres::{postgres_connection::PgPool, schema::payments};
use domain::{
    repositories::payments::PaymentRepository,
    value_objects::stats::{SalesSummary, TariffPopularity},
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPool>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn sales_since(&self, since: Option<DateTime<Utc>>) -> Result<SalesSummary> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let (revenue, sales) = match since {
            Some(since) => payments::table
                .filter(payments::paid_at.ge(since))
                .select((sum(payments::amount_minor), count_star()))
                .first::<(Option<i64>, i64)>(&mut conn)?,
            None => payments::table
                .select((sum(payments::amount_minor), count_star()))
                .first::<(Option<i64>, i64)>(&mut conn)?,
        };

        Ok(SalesSummary {
            revenue_minor: revenue.unwrap_or(0),
            sales,
        })
    }

    async fn most_popular_tariff(&self) -> Result<Option<TariffPopularity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let top = payments::table
            .group_by(payments::tariff_name)
            .select((payments::tariff_name, count_star()))
            .order(count_star().desc())
            .first::<(String, i64)>(&mut conn)
            .optional()?;

        Ok(top.map(|(tariff_name, sales)| TariffPopularity { tariff_name, sales }))
    }
}
