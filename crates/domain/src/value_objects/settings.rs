use std::fmt::Display;

/// Keys of the runtime-editable key-value settings surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    ChannelId,
    WelcomePhotoId,
    AboutText,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::ChannelId => "channel_id",
            SettingKey::WelcomePhotoId => "welcome_photo_id",
            SettingKey::AboutText => "about_text",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "channel_id" => Some(SettingKey::ChannelId),
            "welcome_photo_id" => Some(SettingKey::WelcomePhotoId),
            "about_text" => Some(SettingKey::AboutText),
            _ => None,
        }
    }
}

impl Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
