use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use domain::{
    repositories::settings::SettingRepository, value_objects::settings::SettingKey,
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown setting key: {0}")]
    UnknownKey(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

pub struct SettingsUseCase<S>
where
    S: SettingRepository + Send + Sync + 'static,
{
    setting_repo: Arc<S>,
}

impl<S> SettingsUseCase<S>
where
    S: SettingRepository + Send + Sync + 'static,
{
    pub fn new(setting_repo: Arc<S>) -> Self {
        Self { setting_repo }
    }

    pub async fn get(&self, key: &str) -> SettingsResult<Option<String>> {
        let key = SettingKey::from_str(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;

        let value = self.setting_repo.get(key).await.map_err(|err| {
            error!(key = %key, db_error = ?err, "settings: failed to load setting");
            SettingsError::Internal(err)
        })?;

        Ok(value)
    }

    pub async fn set(&self, key: &str, value: &str) -> SettingsResult<()> {
        let key = SettingKey::from_str(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;

        // The channel id is read by the revoke sweep and the invite
        // minting path; reject values they could not use.
        if key == SettingKey::ChannelId && value.trim().parse::<i64>().is_err() {
            return Err(SettingsError::Validation(
                "channel id must be a numeric chat id".to_string(),
            ));
        }

        self.setting_repo.set(key, value).await.map_err(|err| {
            error!(key = %key, db_error = ?err, "settings: failed to store setting");
            SettingsError::Internal(err)
        })?;

        info!(key = %key, "settings: setting updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::repositories::settings::MockSettingRepository;

    #[tokio::test]
    async fn set_rejects_a_non_numeric_channel_id() {
        let usecase = SettingsUseCase::new(Arc::new(MockSettingRepository::new()));

        let result = usecase.set("channel_id", "not-a-chat").await;
        assert!(matches!(result, Err(SettingsError::Validation(_))));
    }

    #[tokio::test]
    async fn set_accepts_a_negative_channel_id() {
        let mut setting_repo = MockSettingRepository::new();
        setting_repo
            .expect_set()
            .withf(|key, value| *key == SettingKey::ChannelId && value == "-1001234")
            .returning(|_, _| Ok(()));

        let usecase = SettingsUseCase::new(Arc::new(setting_repo));
        usecase.set("channel_id", "-1001234").await.unwrap();
    }

    #[tokio::test]
    async fn unknown_keys_are_rejected() {
        let usecase = SettingsUseCase::new(Arc::new(MockSettingRepository::new()));

        let result = usecase.get("favourite_color").await;
        assert!(matches!(result, Err(SettingsError::UnknownKey(_))));
    }
}
