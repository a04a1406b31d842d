use crate::api::map::error::MapError;
use crate::api::map::interfaces::{
    DateRangeResponse, MapPoint, MapPointsParams, MapPointsResponse, ViewportPhoto,
    ViewportPhotosParams, ViewportPhotosResponse,
};
use crate::api::map::viewport::{PointsQuery, ViewportQuery};
use crate::database::map_store::MapStore;
use crate::database::app_user::User;
use crate::database::predicate::MapFilter;
use app_state::MapSettings;
use sqlx::PgPool;
use tracing::{debug, instrument};

/// Aggregates the user's geotagged photos inside the viewport into grid buckets.
///
/// At most `Precision::limit` buckets are returned, densest first.
#[instrument(skip(pool, user), fields(user_id = user.id))]
pub async fn get_points(
    pool: &PgPool,
    user: &User,
    params: &MapPointsParams,
) -> Result<MapPointsResponse, MapError> {
    let query = PointsQuery::try_from(params)?;
    let filter = MapFilter::geotagged(user.id)
        .within(&query.bounds)
        .taken_between(&query.window);

    let rows = MapStore::aggregate_points(pool, &filter, query.precision).await?;
    debug!(
        buckets = rows.len(),
        factor = query.precision.factor,
        limit = query.precision.limit,
        "Aggregated map points"
    );

    let points = rows
        .into_iter()
        .map(|row| MapPoint::from_row(row, query.precision.factor))
        .collect();
    Ok(MapPointsResponse { points })
}

/// Lists individual photos in the viewport, newest first, together with the total match count.
#[instrument(skip(pool, user, settings), fields(user_id = user.id))]
pub async fn get_photos_in_viewport(
    pool: &PgPool,
    user: &User,
    settings: &MapSettings,
    params: &ViewportPhotosParams,
) -> Result<ViewportPhotosResponse, MapError> {
    let query = ViewportQuery::from_params(params, settings)?;
    let filter = MapFilter::geotagged(user.id).within(&query.bounds);

    let (rows, total) = tokio::try_join!(
        MapStore::list_in_viewport(pool, &filter, query.page),
        MapStore::count_in_viewport(pool, &filter),
    )?;

    Ok(ViewportPhotosResponse {
        photos: rows.into_iter().map(ViewportPhoto::from).collect(),
        total,
    })
}

/// Earliest and latest capture dates across the user's geotagged photos, for the date slider.
#[instrument(skip(pool, user), fields(user_id = user.id))]
pub async fn get_date_range(pool: &PgPool, user: &User) -> Result<DateRangeResponse, MapError> {
    let filter = MapFilter::geotagged(user.id).dated();
    let row = MapStore::date_range(pool, &filter).await?;
    Ok(row.into())
}
