//! Validation of map request parameters. Everything here runs before any query is issued.

use crate::api::map::error::MapError;
use crate::api::map::interfaces::{MapPointsParams, ViewportPhotosParams};
use crate::api::map::precision::Precision;
use app_state::MapSettings;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 24.0;

/// A latitude/longitude bounding box, clamped to valid coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Map widgets report longitudes past +-180 when the world is wrapped, those are clamped.
    /// A box with `min > max` on either axis is rejected.
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Result<Self, MapError> {
        for (name, value) in [
            ("minLat", min_lat),
            ("maxLat", max_lat),
            ("minLng", min_lng),
            ("maxLng", max_lng),
        ] {
            if !value.is_finite() {
                return Err(MapError::InvalidParams(format!("{name} must be a finite number")));
            }
        }

        let bounds = Self {
            min_lat: min_lat.clamp(-90.0, 90.0),
            max_lat: max_lat.clamp(-90.0, 90.0),
            min_lng: min_lng.clamp(-180.0, 180.0),
            max_lng: max_lng.clamp(-180.0, 180.0),
        };
        if bounds.min_lat > bounds.max_lat {
            return Err(MapError::InvalidParams(
                "minLat must not be greater than maxLat".to_string(),
            ));
        }
        if bounds.min_lng > bounds.max_lng {
            return Err(MapError::InvalidParams(
                "minLng must not be greater than maxLng".to_string(),
            ));
        }
        Ok(bounds)
    }

    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }
}

pub fn validate_zoom(zoom: f64) -> Result<f64, MapError> {
    if zoom.is_finite() && (MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        Ok(zoom)
    } else {
        Err(MapError::InvalidParams(format!(
            "zoom must be between {MIN_ZOOM} and {MAX_ZOOM}"
        )))
    }
}

/// Optional inclusive capture-date bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy)]
enum DateBound {
    Start,
    End,
}

impl TimeWindow {
    /// Accepts `YYYY-MM-DD` or RFC 3339 timestamps; empty strings mean "unbounded".
    /// A bare end date includes that whole day.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, MapError> {
        let window = Self {
            start: parse_date_bound(start, DateBound::Start)?,
            end: parse_date_bound(end, DateBound::End)?,
        };
        if let (Some(start), Some(end)) = (window.start, window.end)
            && start > end
        {
            return Err(MapError::InvalidParams(
                "startDate must not be after endDate".to_string(),
            ));
        }
        Ok(window)
    }
}

fn parse_date_bound(value: Option<&str>, bound: DateBound) -> Result<Option<DateTime<Utc>>, MapError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        MapError::InvalidParams(format!(
            "Invalid date '{value}'. Expected YYYY-MM-DD or an RFC 3339 timestamp."
        ))
    })?;
    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN),
    };
    Ok(Some(date.and_time(time).and_utc()))
}

/// Offset pagination for the viewport photo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(offset: Option<i64>, limit: Option<i64>, settings: &MapSettings) -> Result<Self, MapError> {
        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(settings.default_page_size);
        if offset < 0 {
            return Err(MapError::InvalidParams("offset must not be negative".to_string()));
        }
        if !(1..=settings.max_page_size).contains(&limit) {
            return Err(MapError::InvalidParams(format!(
                "limit must be between 1 and {}",
                settings.max_page_size
            )));
        }
        Ok(Self { offset, limit })
    }
}

/// A validated `/map/points` request.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsQuery {
    pub bounds: Bounds,
    pub zoom: f64,
    pub precision: Precision,
    pub window: TimeWindow,
}

impl TryFrom<&MapPointsParams> for PointsQuery {
    type Error = MapError;

    fn try_from(params: &MapPointsParams) -> Result<Self, Self::Error> {
        let bounds = Bounds::new(params.min_lat, params.max_lat, params.min_lng, params.max_lng)?;
        let zoom = validate_zoom(params.zoom)?;
        let window = TimeWindow::parse(params.start_date.as_deref(), params.end_date.as_deref())?;
        Ok(Self {
            bounds,
            zoom,
            precision: Precision::for_zoom(zoom),
            window,
        })
    }
}

/// A validated `/map/photos` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportQuery {
    pub bounds: Bounds,
    pub page: Page,
}

impl ViewportQuery {
    pub fn from_params(params: &ViewportPhotosParams, settings: &MapSettings) -> Result<Self, MapError> {
        Ok(Self {
            bounds: Bounds::new(params.min_lat, params.max_lat, params.min_lng, params.max_lng)?,
            page: Page::new(params.offset, params.limit, settings)?,
        })
    }
}
