use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One spatial bucket as returned by the aggregation query.
///
/// `lat_index`/`lng_index` are `floor(coordinate * factor)` for the requested precision.
#[derive(Debug, Clone, FromRow)]
pub struct MapPointRow {
    pub id: String,
    pub lat_index: i64,
    pub lng_index: i64,
    pub point_count: i64,
    pub most_recent: Option<DateTime<Utc>>,
    pub thumbnails: Vec<String>,
}

/// A single geotagged, non-deleted media item joined with its album's name.
#[derive(Debug, Clone, FromRow)]
pub struct ViewportPhotoRow {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub thumbnail_key: Option<String>,
    pub display_key: Option<String>,
    pub taken_at: Option<DateTime<Utc>>,
    pub filename: String,
    pub width: i32,
    pub height: i32,
    pub album_id: String,
    pub album_name: String,
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct DateRangeRow {
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
}
