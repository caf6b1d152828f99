use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::value_objects::settings::SettingKey;

#[automock]
#[async_trait]
pub trait SettingRepository {
    async fn get(&self, key: SettingKey) -> Result<Option<String>>;

    async fn set(&self, key: SettingKey, value: &str) -> Result<()>;
}
