pub mod broadcast;
pub mod memberships;
pub mod promos;
pub mod purchases;
pub mod settings;
pub mod stats;
pub mod tariffs;
