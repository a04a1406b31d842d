//! Merging of already aggregated points into the coarser grid of a lower zoom level.
//!
//! Clients zooming out can regroup the points they already hold instead of refetching.
//! Cell indices are integers, so a coarse cell is found with floor division. Counts,
//! the minimum id and the latest date agree with the aggregation query at that zoom as
//! long as the input was not truncated. Thumbnails are picked from the members' own
//! previews, newest member first, so they can differ from a fresh query.

use crate::api::map::interfaces::{MAX_POINT_THUMBNAILS, MapPoint};
use crate::api::map::precision::{GridCell, Precision};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Regroups `points` for display at `zoom`.
///
/// Points whose cell cannot be coarsened to the target grid (the target is finer) are kept as they are.
/// The merged set is ordered densest first, ties broken by cell key, and capped at the zoom's limit.
#[must_use]
pub fn recluster(points: &[MapPoint], zoom: f64) -> Vec<MapPoint> {
    let precision = Precision::for_zoom(zoom);

    let mut groups: BTreeMap<GridCell, Vec<&MapPoint>> = BTreeMap::new();
    for point in points {
        let cell = point.key.coarsen(precision.factor).unwrap_or(point.key);
        groups.entry(cell).or_default().push(point);
    }

    let mut merged: Vec<MapPoint> = groups
        .into_iter()
        .map(|(cell, members)| merge(cell, members))
        .collect();
    merged.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    merged.truncate(usize::try_from(precision.limit).unwrap_or(usize::MAX));
    merged
}

fn merge(cell: GridCell, mut members: Vec<&MapPoint>) -> MapPoint {
    if let [single] = members.as_slice()
        && single.key == cell
    {
        return (*single).clone();
    }

    // Newest contributors first, undated ones last.
    members.sort_by_key(|p| (p.most_recent.is_none(), Reverse(p.most_recent), p.id.clone()));

    let thumbs = members
        .iter()
        .flat_map(|p| p.thumbs.iter().cloned())
        .take(MAX_POINT_THUMBNAILS)
        .collect();
    let id = members
        .iter()
        .map(|p| p.id.as_str())
        .min()
        .unwrap_or_default()
        .to_string();

    MapPoint {
        id,
        key: cell,
        lat: cell.lat(),
        lng: cell.lng(),
        count: members.iter().map(|p| p.count).sum(),
        most_recent: members.iter().filter_map(|p| p.most_recent).max(),
        thumbs,
    }
}
