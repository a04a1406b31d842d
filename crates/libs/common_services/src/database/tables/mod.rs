pub mod album;
pub mod app_user;
pub mod media_item;
