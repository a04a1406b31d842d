//! Filter conditions for map queries, composed as values and rendered with bound parameters.
//!
//! Every query reads `media_item` as `mi`, restricted to the albums the caller holds a grant for.

use crate::api::map::viewport::{Bounds, TimeWindow};
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

#[derive(Debug, Clone, PartialEq)]
pub enum MapPredicate {
    /// Both coordinates present.
    Geotagged,
    NotDeleted,
    LatitudeBetween { min: f64, max: f64 },
    LongitudeBetween { min: f64, max: f64 },
    TakenFrom(DateTime<Utc>),
    TakenUntil(DateTime<Utc>),
    HasCaptureDate,
}

impl MapPredicate {
    fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match *self {
            Self::Geotagged => {
                builder.push("mi.latitude IS NOT NULL AND mi.longitude IS NOT NULL");
            }
            Self::NotDeleted => {
                builder.push("mi.deleted = false");
            }
            Self::LatitudeBetween { min, max } => {
                builder
                    .push("mi.latitude BETWEEN ")
                    .push_bind(min)
                    .push(" AND ")
                    .push_bind(max);
            }
            Self::LongitudeBetween { min, max } => {
                builder
                    .push("mi.longitude BETWEEN ")
                    .push_bind(min)
                    .push(" AND ")
                    .push_bind(max);
            }
            Self::TakenFrom(start) => {
                builder.push("mi.taken_at >= ").push_bind(start);
            }
            Self::TakenUntil(end) => {
                builder.push("mi.taken_at <= ").push_bind(end);
            }
            Self::HasCaptureDate => {
                builder.push("mi.taken_at IS NOT NULL");
            }
        }
    }
}

/// The access scope of one user plus the predicates all rows must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFilter {
    pub user_id: i32,
    pub predicates: Vec<MapPredicate>,
}

impl MapFilter {
    /// Geotagged, non-deleted media in every album `user_id` has a grant for.
    #[must_use]
    pub fn geotagged(user_id: i32) -> Self {
        Self {
            user_id,
            predicates: vec![MapPredicate::Geotagged, MapPredicate::NotDeleted],
        }
    }

    #[must_use]
    pub fn within(mut self, bounds: &Bounds) -> Self {
        self.predicates.push(MapPredicate::LatitudeBetween {
            min: bounds.min_lat,
            max: bounds.max_lat,
        });
        self.predicates.push(MapPredicate::LongitudeBetween {
            min: bounds.min_lng,
            max: bounds.max_lng,
        });
        self
    }

    #[must_use]
    pub fn taken_between(mut self, window: &TimeWindow) -> Self {
        if let Some(start) = window.start {
            self.predicates.push(MapPredicate::TakenFrom(start));
        }
        if let Some(end) = window.end {
            self.predicates.push(MapPredicate::TakenUntil(end));
        }
        self
    }

    #[must_use]
    pub fn dated(mut self) -> Self {
        self.predicates.push(MapPredicate::HasCaptureDate);
        self
    }

    /// Pushes the `FROM` clause with the access-scope join. The join on the unique
    /// `(album_id, user_id)` grant keeps each media item at most once.
    pub fn push_from(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder
            .push(" FROM media_item mi JOIN album_collaborator ac ON ac.album_id = mi.album_id AND ac.user_id = ")
            .push_bind(self.user_id);
    }

    /// Pushes every predicate, joined with `AND`.
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            builder.push(if i == 0 { " WHERE (" } else { " AND (" });
            predicate.push_sql(builder);
            builder.push(")");
        }
    }
}
