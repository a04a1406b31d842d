use crate::api_state::ApiContext;
use crate::map::handlers::{
    get_date_range_handler, get_map_settings_handler, get_photos_in_viewport_handler,
    get_points_handler,
};
use axum::{Router, routing::get};

pub fn map_protected_router() -> Router<ApiContext> {
    Router::new()
        .route("/map/points", get(get_points_handler))
        .route("/map/photos", get(get_photos_in_viewport_handler))
        .route("/map/date-range", get(get_date_range_handler))
        .route("/map/settings", get(get_map_settings_handler))
}
