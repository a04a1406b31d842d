//! Client-side render policy for the map view.
//!
//! The map client owns the event loop, this module owns the decisions: which layer to render for a
//! result set, when a debounced viewport change turns into a request, which responses are stale,
//! and what a marker click does. Time is always passed in by the caller.

use crate::api::map::interfaces::MapPoint;
use crate::api::map::precision::GridCell;
use app_state::MapSettings;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One positioned thumbnail marker per point.
    Markers,
    /// A WebGL circle layer that keeps clustering on the client.
    Clusters,
}

impl RenderMode {
    /// Clusters only when strictly more than `threshold` points came back. No hysteresis.
    #[must_use]
    pub fn for_point_count(point_count: usize, threshold: usize) -> Self {
        if point_count > threshold {
            Self::Clusters
        } else {
            Self::Markers
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPolicy {
    pub cluster_threshold: usize,
    pub debounce: Duration,
    pub marker_fly_to_zoom: f64,
}

impl From<&MapSettings> for RenderPolicy {
    fn from(settings: &MapSettings) -> Self {
        Self {
            cluster_threshold: settings.cluster_threshold,
            debounce: settings.debounce(),
            marker_fly_to_zoom: settings.marker_fly_to_zoom,
        }
    }
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::from(&MapSettings::default())
    }
}

/// Identifies one issued points request. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapViewState {
    Idle,
    Fetching { ticket: Ticket },
    Rendering { mode: RenderMode, point_count: usize },
}

/// Sent to the client when a request should go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCommand {
    pub ticket: Ticket,
    /// The in-flight request this one supersedes, to be aborted.
    pub cancel: Option<Ticket>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyTo {
    pub lat: f64,
    pub lng: f64,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerClick {
    pub fly_to: Option<FlyTo>,
    pub highlighted: GridCell,
}

#[derive(Debug)]
pub struct MapViewController {
    policy: RenderPolicy,
    state: MapViewState,
    last_rendered: Option<MapViewState>,
    next_ticket: u64,
    in_flight: Option<Ticket>,
    changed_at: Option<Instant>,
    highlighted: Option<GridCell>,
}

impl MapViewController {
    #[must_use]
    pub fn new(policy: RenderPolicy) -> Self {
        Self {
            policy,
            state: MapViewState::Idle,
            last_rendered: None,
            next_ticket: 0,
            in_flight: None,
            changed_at: None,
            highlighted: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> MapViewState {
        self.state
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<GridCell> {
        self.highlighted
    }

    /// Records a pan or zoom. Every call restarts the debounce period.
    pub fn viewport_changed(&mut self, now: Instant) {
        self.changed_at = Some(now);
    }

    /// Issues a request once the viewport has been still for the debounce period.
    pub fn poll(&mut self, now: Instant) -> Option<FetchCommand> {
        let changed_at = self.changed_at?;
        if now.saturating_duration_since(changed_at) < self.policy.debounce {
            return None;
        }
        self.changed_at = None;

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        let cancel = self.in_flight.replace(ticket);
        self.state = MapViewState::Fetching { ticket };
        Some(FetchCommand { ticket, cancel })
    }

    /// Applies a response. Returns `None` and changes nothing when `ticket` was superseded.
    pub fn on_result(&mut self, ticket: Ticket, point_count: usize) -> Option<RenderMode> {
        if self.in_flight != Some(ticket) {
            return None;
        }
        self.in_flight = None;

        let mode = RenderMode::for_point_count(point_count, self.policy.cluster_threshold);
        self.state = MapViewState::Rendering { mode, point_count };
        self.last_rendered = Some(self.state);
        Some(mode)
    }

    /// A failed request leaves the previous rendering on screen.
    pub fn on_failure(&mut self, ticket: Ticket) {
        if self.in_flight != Some(ticket) {
            return;
        }
        self.in_flight = None;
        self.state = self.last_rendered.unwrap_or(MapViewState::Idle);
    }

    pub fn marker_clicked(&mut self, point: &MapPoint, current_zoom: f64) -> MarkerClick {
        let fly_to = (current_zoom < self.policy.marker_fly_to_zoom).then_some(FlyTo {
            lat: point.lat,
            lng: point.lng,
            zoom: self.policy.marker_fly_to_zoom,
        });
        self.highlighted = Some(point.key);
        MarkerClick {
            fly_to,
            highlighted: point.key,
        }
    }

    /// Clears the highlight, returning the cell that was highlighted.
    pub fn empty_map_clicked(&mut self) -> Option<GridCell> {
        self.highlighted.take()
    }
}
