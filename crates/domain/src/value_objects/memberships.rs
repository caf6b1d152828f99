use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Read model for a user's access window. ACTIVE vs EXPIRED is derived
/// by comparing `subscription_end` to the current time; there is no
/// stored status field.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipProfile {
    pub user_id: i64,
    pub username: Option<String>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub active: bool,
}

/// The extension rule shared by the payment path and the admin path:
/// extensions add to remaining time, but a lapsed subscription counts
/// from now, never retroactively from the lapsed end date.
pub fn extended_end(
    now: DateTime<Utc>,
    current_end: Option<DateTime<Utc>>,
    days: i64,
) -> DateTime<Utc> {
    let base = current_end.filter(|end| *end > now).unwrap_or(now);
    base + Duration::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extends_from_now_when_no_subscription() {
        let now = Utc::now();
        assert_eq!(extended_end(now, None, 30), now + Duration::days(30));
    }

    #[test]
    fn extends_from_now_when_lapsed() {
        let now = Utc::now();
        let lapsed = Some(now - Duration::days(10));
        assert_eq!(extended_end(now, lapsed, 7), now + Duration::days(7));
    }

    #[test]
    fn accumulates_remaining_time_when_active() {
        let now = Utc::now();
        let end = now + Duration::days(5);
        assert_eq!(
            extended_end(now, Some(end), 30),
            end + Duration::days(30)
        );
    }
}
