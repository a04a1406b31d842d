//! Zoom-dependent grid resolution and result caps for map aggregation.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Smallest cap on returned points, whatever the zoom.
pub const MIN_POINT_LIMIT: i64 = 1_000;
/// Largest number of points a client can be asked to render.
pub const MAX_POINT_LIMIT: i64 = 15_000;

/// Grid cells per degree for a zoom level.
///
/// | zoom    | factor  | cell size |
/// |---------|---------|-----------|
/// | < 5     | 1       | ~111 km   |
/// | 5 - 7   | 10      | ~11.1 km  |
/// | 8 - 10  | 100     | ~1.1 km   |
/// | 11 - 13 | 1000    | ~110 m    |
/// | >= 14   | 100000  | ~1.1 m    |
#[must_use]
pub fn precision_factor(zoom: f64) -> u32 {
    if zoom < 5.0 {
        1
    } else if zoom < 8.0 {
        10
    } else if zoom < 11.0 {
        100
    } else if zoom < 14.0 {
        1_000
    } else {
        100_000
    }
}

/// Maximum number of buckets returned for a zoom level. Non-decreasing in `zoom`.
#[must_use]
pub fn adaptive_limit(zoom: f64) -> i64 {
    let base = if zoom < 5.0 {
        500
    } else if zoom < 10.0 {
        2_000
    } else {
        5_000
    };
    base.clamp(MIN_POINT_LIMIT, MAX_POINT_LIMIT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    pub factor: u32,
    pub limit: i64,
}

impl Precision {
    #[must_use]
    pub fn for_zoom(zoom: f64) -> Self {
        Self {
            factor: precision_factor(zoom),
            limit: adaptive_limit(zoom),
        }
    }

    #[must_use]
    pub fn cell(&self, lat: f64, lng: f64) -> GridCell {
        GridCell::containing(lat, lng, self.factor)
    }
}

/// A bucket of the snapping grid: `floor(coordinate * factor)` on both axes.
///
/// Its textual form `"{factor}/{lat_index}/{lng_index}"` stays the same for the same
/// area at the same precision, so clients can key markers on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub factor: u32,
    pub lat_index: i64,
    pub lng_index: i64,
}

impl GridCell {
    #[must_use]
    pub fn containing(lat: f64, lng: f64, factor: u32) -> Self {
        let f = f64::from(factor);
        Self {
            factor,
            lat_index: (lat * f).floor() as i64,
            lng_index: (lng * f).floor() as i64,
        }
    }

    /// Snapped (floored) latitude of the cell's south-west corner.
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat_index as f64 / f64::from(self.factor)
    }

    /// Snapped (floored) longitude of the cell's south-west corner.
    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng_index as f64 / f64::from(self.factor)
    }

    /// The cell of a coarser grid that contains this one.
    ///
    /// Returns `None` when `factor` is finer than this cell or does not divide its factor,
    /// the cell cannot be split or re-aligned without the photo coordinates.
    #[must_use]
    pub fn coarsen(&self, factor: u32) -> Option<Self> {
        if factor == 0 || factor > self.factor || self.factor % factor != 0 {
            return None;
        }
        let ratio = i64::from(self.factor / factor);
        Some(Self {
            factor,
            lat_index: self.lat_index.div_euclid(ratio),
            lng_index: self.lng_index.div_euclid(ratio),
        })
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.factor, self.lat_index, self.lng_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCellKey(pub String);

impl fmt::Display for InvalidCellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid grid cell key '{}'", self.0)
    }
}

impl std::error::Error for InvalidCellKey {}

impl FromStr for GridCell {
    type Err = InvalidCellKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidCellKey(s.to_string());
        let mut parts = s.split('/');
        let (Some(factor), Some(lat), Some(lng), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let factor: u32 = factor.parse().map_err(|_| invalid())?;
        if factor == 0 {
            return Err(invalid());
        }
        Ok(Self {
            factor,
            lat_index: lat.parse().map_err(|_| invalid())?,
            lng_index: lng.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for GridCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GridCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZOOMS: [f64; 12] = [0.0, 2.0, 4.9, 5.0, 7.5, 8.0, 10.0, 11.0, 13.9, 14.0, 18.0, 24.0];

    #[test]
    fn factor_follows_zoom_table() {
        assert_eq!(precision_factor(0.0), 1);
        assert_eq!(precision_factor(4.99), 1);
        assert_eq!(precision_factor(5.0), 10);
        assert_eq!(precision_factor(7.0), 10);
        assert_eq!(precision_factor(8.0), 100);
        assert_eq!(precision_factor(10.0), 100);
        assert_eq!(precision_factor(11.0), 1_000);
        assert_eq!(precision_factor(13.0), 1_000);
        assert_eq!(precision_factor(14.0), 100_000);
        assert_eq!(precision_factor(22.0), 100_000);
    }

    #[test]
    fn factor_is_non_decreasing_in_zoom() {
        for pair in ZOOMS.windows(2) {
            assert!(precision_factor(pair[0]) <= precision_factor(pair[1]));
        }
    }

    #[test]
    fn limit_is_non_decreasing_and_bounded() {
        for pair in ZOOMS.windows(2) {
            assert!(adaptive_limit(pair[0]) <= adaptive_limit(pair[1]));
        }
        for zoom in ZOOMS {
            let limit = adaptive_limit(zoom);
            assert!((MIN_POINT_LIMIT..=MAX_POINT_LIMIT).contains(&limit), "{zoom} -> {limit}");
        }
    }

    #[test]
    fn low_zoom_base_is_raised_to_the_floor() {
        assert_eq!(adaptive_limit(3.0), MIN_POINT_LIMIT);
        assert_eq!(adaptive_limit(6.0), 2_000);
        assert_eq!(adaptive_limit(12.0), 5_000);
    }

    #[test]
    fn cells_floor_towards_negative_infinity() {
        let cell = GridCell::containing(-0.05, 100.55, 10);
        assert_eq!(cell.lat_index, -1);
        assert_eq!(cell.lng_index, 1005);
        assert!((cell.lat() - -0.1).abs() < 1e-12);
        assert!((cell.lng() - 100.5).abs() < 1e-12);
    }

    #[test]
    fn same_floored_coordinates_share_a_cell() {
        let precision = Precision::for_zoom(9.0);
        assert_eq!(precision.cell(13.751, 100.502), precision.cell(13.759, 100.509));
        assert_ne!(precision.cell(13.751, 100.502), precision.cell(13.761, 100.502));
    }

    #[test]
    fn coarsen_uses_integer_division() {
        let fine = GridCell::containing(13.754, -100.502, 1_000);
        let coarse = fine.coarsen(10).expect("10 divides 1000");
        assert_eq!(coarse, GridCell::containing(13.754, -100.502, 10));
        assert_eq!(fine.coarsen(1_000), Some(fine));
        assert_eq!(fine.coarsen(100_000), None);
        assert_eq!(fine.coarsen(0), None);
    }

    #[test]
    fn key_round_trips_through_text() {
        let cell = GridCell::containing(-33.8688, 151.2093, 1_000);
        let key = cell.to_string();
        assert_eq!(key, "1000/-33869/151209");
        assert_eq!(key.parse::<GridCell>(), Ok(cell));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        for key in ["", "10", "10/1", "10/1/2/3", "0/1/2", "ten/1/2", "10/x/2"] {
            assert!(key.parse::<GridCell>().is_err(), "{key}");
        }
    }
}
