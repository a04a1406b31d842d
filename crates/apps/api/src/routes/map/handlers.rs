use crate::api_state::ApiContext;
use app_state::MapSettings;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use common_services::api::map::error::MapError;
use common_services::api::map::interfaces::{
    DateRangeResponse, MapPointsParams, MapPointsResponse, MapSettingsResponse,
    ViewportPhotosParams, ViewportPhotosResponse,
};
use common_services::api::map::service::{get_date_range, get_photos_in_viewport, get_points};
use common_services::database::app_user::User;

/// Aggregated photo locations inside the viewport, bucketed for the zoom level.
///
/// # Errors
///
/// Returns a `MapError` if the parameters are invalid or the database query fails.
#[utoipa::path(
    get,
    path = "/map/points",
    tag = "Map",
    params(MapPointsParams),
    responses(
        (status = 200, description = "One entry per occupied grid cell, densest first.", body = MapPointsResponse),
        (status = 400, description = "Invalid bounds, zoom or dates."),
        (status = 401, description = "Authentication required."),
        (status = 500, description = "A database or internal error occurred."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_points_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Query(params): Query<MapPointsParams>,
) -> Result<Json<MapPointsResponse>, MapError> {
    let points = get_points(&context.pool, &user, &params).await?;
    Ok(Json(points))
}

/// Individual photos inside the viewport, newest first, for the sidebar list.
///
/// # Errors
///
/// Returns a `MapError` if the parameters are invalid or the database query fails.
#[utoipa::path(
    get,
    path = "/map/photos",
    tag = "Map",
    params(ViewportPhotosParams),
    responses(
        (status = 200, description = "A page of photos and the total count in the viewport.", body = ViewportPhotosResponse),
        (status = 400, description = "Invalid bounds or pagination."),
        (status = 401, description = "Authentication required."),
        (status = 500, description = "A database or internal error occurred."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_photos_in_viewport_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Query(params): Query<ViewportPhotosParams>,
) -> Result<Json<ViewportPhotosResponse>, MapError> {
    let photos = get_photos_in_viewport(&context.pool, &user, &context.settings.map, &params).await?;
    Ok(Json(photos))
}

/// Capture date span of the user's geotagged photos.
///
/// # Errors
///
/// Returns a `MapError` if the database query fails.
#[utoipa::path(
    get,
    path = "/map/date-range",
    tag = "Map",
    responses(
        (status = 200, description = "Earliest and latest capture date.", body = DateRangeResponse),
        (status = 401, description = "Authentication required."),
        (status = 500, description = "A database or internal error occurred."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_date_range_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
) -> Result<Json<DateRangeResponse>, MapError> {
    let range = get_date_range(&context.pool, &user).await?;
    Ok(Json(range))
}

/// Render policy the client should apply to map results.
#[utoipa::path(
    get,
    path = "/map/settings",
    tag = "Map",
    responses(
        (status = 200, description = "Cluster threshold, debounce and paging defaults.", body = MapSettingsResponse),
        (status = 401, description = "Authentication required."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_map_settings_handler(State(settings): State<MapSettings>) -> Json<MapSettingsResponse> {
    Json(MapSettingsResponse::from(&settings))
}
