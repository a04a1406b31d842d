pub mod auth;
pub mod map;
