use crate::api::map::precision::GridCell;
use crate::database::media_item::geo_media_item::{DateRangeRow, MapPointRow, ViewportPhotoRow};
use app_state::MapSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Thumbnails carried per map point.
pub const MAX_POINT_THUMBNAILS: usize = 3;

#[derive(Deserialize, IntoParams, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MapPointsParams {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
    pub zoom: f64,
    /// "YYYY-MM-DD" or RFC 3339, inclusive.
    pub start_date: Option<String>,
    /// "YYYY-MM-DD" or RFC 3339, inclusive. A bare date covers the whole day.
    pub end_date: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ViewportPhotosParams {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// One aggregated bucket. `c` and `d` are kept short, responses can hold thousands of these.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct MapPoint {
    /// Smallest photo id in the bucket.
    pub id: String,
    /// Stable grid cell key, `"{factor}/{latIndex}/{lngIndex}"`.
    #[schema(value_type = String, example = "10/137/1005")]
    pub key: GridCell,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "c")]
    pub count: i64,
    /// Most recent capture date as an ISO 8601 string, or `""` when no photo has one.
    #[serde(rename = "d", with = "date_or_empty")]
    #[schema(value_type = String)]
    pub most_recent: Option<DateTime<Utc>>,
    pub thumbs: Vec<String>,
}

impl MapPoint {
    #[must_use]
    pub fn from_row(row: MapPointRow, factor: u32) -> Self {
        let key = GridCell {
            factor,
            lat_index: row.lat_index,
            lng_index: row.lng_index,
        };
        let mut thumbs = row.thumbnails;
        thumbs.truncate(MAX_POINT_THUMBNAILS);
        Self {
            id: row.id,
            lat: key.lat(),
            lng: key.lng(),
            key,
            count: row.point_count,
            most_recent: row.most_recent,
            thumbs,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct MapPointsResponse {
    pub points: Vec<MapPoint>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewportPhoto {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub thumbnail_ref: Option<String>,
    pub display_ref: Option<String>,
    pub capture_date: Option<DateTime<Utc>>,
    pub filename: String,
    pub width: i32,
    pub height: i32,
    pub album_id: String,
    pub album_title: String,
}

impl From<ViewportPhotoRow> for ViewportPhoto {
    fn from(row: ViewportPhotoRow) -> Self {
        Self {
            id: row.id,
            lat: row.latitude,
            lng: row.longitude,
            thumbnail_ref: row.thumbnail_key,
            display_ref: row.display_key,
            capture_date: row.taken_at,
            filename: row.filename,
            width: row.width,
            height: row.height,
            album_id: row.album_id,
            album_title: row.album_name,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct ViewportPhotosResponse {
    pub photos: Vec<ViewportPhoto>,
    pub total: i64,
}

/// Capture date span of every geotagged photo the user can see. Both `null` when there are none.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct DateRangeResponse {
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
}

impl From<DateRangeRow> for DateRangeResponse {
    fn from(row: DateRangeRow) -> Self {
        Self {
            min: row.min,
            max: row.max,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapSettingsResponse {
    pub cluster_threshold: usize,
    pub debounce_ms: u64,
    pub marker_fly_to_zoom: f64,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl From<&MapSettings> for MapSettingsResponse {
    fn from(settings: &MapSettings) -> Self {
        Self {
            cluster_threshold: settings.cluster_threshold,
            debounce_ms: settings.debounce_ms,
            marker_fly_to_zoom: settings.marker_fly_to_zoom,
            default_page_size: settings.default_page_size,
            max_page_size: settings.max_page_size,
        }
    }
}

mod date_or_empty {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value.is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(&value)
            .map(|date| Some(date.with_timezone(&Utc)))
            .map_err(D::Error::custom)
    }
}
