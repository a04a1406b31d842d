pub mod geo_media_item;
