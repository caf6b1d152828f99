use chrono::{DateTime, Utc};

/// A chat user known to the bot. Access is represented solely by
/// `subscription_end`: absent or in the past means no active access.
#[derive(Debug, Clone)]
pub struct UserEntity {
    pub id: i64,
    pub username: Option<String>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserEntity {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.subscription_end.is_some_and(|end| end > now)
    }
}
