use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*};
use std::sync::Arc;

use crate::db::postgres::{postgres_connection::PgPool, schema::settings};
use domain::{
    repositories::settings::SettingRepository, value_objects::settings::SettingKey,
};

pub struct SettingPostgres {
    db_pool: Arc<PgPool>,
}

impl SettingPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SettingRepository for SettingPostgres {
    async fn get(&self, key: SettingKey) -> Result<Option<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let value = settings::table
            .find(key.as_str())
            .select(settings::value)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(value)
    }

    async fn set(&self, key: SettingKey, value: &str) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        insert_into(settings::table)
            .values((
                settings::key.eq(key.as_str()),
                settings::value.eq(value),
                settings::updated_at.eq(now),
            ))
            .on_conflict(settings::key)
            .do_update()
            .set((settings::value.eq(value), settings::updated_at.eq(now)))
            .execute(&mut conn)?;

        Ok(())
    }
}
