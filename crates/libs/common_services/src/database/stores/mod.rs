pub mod map_store;
pub mod user_store;
