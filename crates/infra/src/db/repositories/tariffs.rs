use anyhow::Result;
use async_trait::async_trait;
use diesel::{delete, insert_into, prelude::*};
use std::sync::Arc;

use crate::db::{
    postgres::{postgres_connection::PgPool, schema::tariffs},
    repositories::rows::{NewTariffRow, TariffRow},
};
use domain::{
    entities::tariffs::{InsertTariffEntity, TariffEntity},
    repositories::tariffs::TariffRepository,
};

pub struct TariffPostgres {
    db_pool: Arc<PgPool>,
}

impl TariffPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TariffRepository for TariffPostgres {
    async fn create(&self, tariff: InsertTariffEntity) -> Result<i32> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let tariff_id = insert_into(tariffs::table)
            .values(NewTariffRow {
                name: tariff.name,
                price_minor: tariff.price_minor,
                duration_days: tariff.duration_days,
            })
            .returning(tariffs::id)
            .get_result::<i32>(&mut conn)?;

        Ok(tariff_id)
    }

    async fn list(&self) -> Result<Vec<TariffEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = tariffs::table
            .order(tariffs::id.asc())
            .select(TariffRow::as_select())
            .load::<TariffRow>(&mut conn)?;

        Ok(rows.into_iter().map(TariffEntity::from).collect())
    }

    async fn find(&self, tariff_id: i32) -> Result<Option<TariffEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = tariffs::table
            .find(tariff_id)
            .select(TariffRow::as_select())
            .first::<TariffRow>(&mut conn)
            .optional()?;

        Ok(row.map(TariffEntity::from))
    }

    async fn delete(&self, tariff_id: i32) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(tariffs::table.find(tariff_id)).execute(&mut conn)?;

        Ok(affected > 0)
    }
}
