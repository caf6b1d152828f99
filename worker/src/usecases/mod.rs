pub mod remind_expiring;
pub mod revoke_expired;
