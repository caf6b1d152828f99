use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*, update};
use std::sync::Arc;

use crate::db::{
    postgres::{postgres_connection::PgPool, schema::users},
    repositories::rows::UserRow,
};
use domain::{
    entities::users::UserEntity, repositories::users::UserRepository,
    value_objects::memberships::extended_end,
};

pub struct UserPostgres {
    db_pool: Arc<PgPool>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn ensure_user(&self, user_id: i64, username: Option<String>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(users::table)
            .values((users::id.eq(user_id), users::username.eq(username)))
            .on_conflict(users::id)
            .do_nothing()
            .execute(&mut conn)?;

        Ok(())
    }

    async fn find(&self, user_id: i64) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = users::table
            .find(user_id)
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .optional()?;

        Ok(row.map(UserEntity::from))
    }

    async fn extend_subscription(
        &self,
        user_id: i64,
        days: i64,
    ) -> Result<Option<DateTime<Utc>>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Single read-modify-write; the row lock serializes concurrent
        // writers for the same user so no extension can be lost.
        let new_end = conn.transaction::<Option<DateTime<Utc>>, anyhow::Error, _>(|conn| {
            let current = users::table
                .find(user_id)
                .select(users::subscription_end)
                .for_update()
                .first::<Option<DateTime<Utc>>>(conn)
                .optional()?;

            let Some(current_end) = current else {
                return Ok(None);
            };

            let new_end = extended_end(Utc::now(), current_end, days);

            update(users::table.find(user_id))
                .set(users::subscription_end.eq(Some(new_end)))
                .execute(conn)?;

            Ok(Some(new_end))
        })?;

        Ok(new_end)
    }

    async fn revoke_subscription(&self, user_id: i64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table.find(user_id))
            .set(users::subscription_end.eq(None::<DateTime<Utc>>))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = users::table
            .filter(users::subscription_end.is_not_null())
            .filter(users::subscription_end.lt(now))
            .select(UserRow::as_select())
            .load::<UserRow>(&mut conn)?;

        Ok(rows.into_iter().map(UserEntity::from).collect())
    }

    async fn list_expiring_between(
        &self,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Half-open (after, until] so every end date lands in exactly
        // one reminder bucket.
        let rows = users::table
            .filter(users::subscription_end.gt(after))
            .filter(users::subscription_end.le(until))
            .select(UserRow::as_select())
            .load::<UserRow>(&mut conn)?;

        Ok(rows.into_iter().map(UserEntity::from).collect())
    }

    async fn list_user_ids(&self) -> Result<Vec<i64>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = users::table.select(users::id).load::<i64>(&mut conn)?;

        Ok(ids)
    }

    async fn count_users(&self) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = users::table.count().get_result::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn count_active(&self, now: DateTime<Utc>) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let active = users::table
            .filter(users::subscription_end.gt(now))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(active)
    }
}
