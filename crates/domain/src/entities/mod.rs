pub mod promo_codes;
pub mod tariffs;
pub mod users;
