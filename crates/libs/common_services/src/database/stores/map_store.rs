use crate::api::map::precision::Precision;
use crate::api::map::viewport::Page;
use crate::database::DbError;
use crate::database::media_item::geo_media_item::{DateRangeRow, MapPointRow, ViewportPhotoRow};
use crate::database::predicate::MapFilter;
use sqlx::{Executor, Postgres, QueryBuilder};

pub struct MapStore;

impl MapStore {
    //================================================================================
    // Aggregation
    //================================================================================

    /// Groups every matching media item into its grid cell, densest cells first.
    ///
    /// Cells with equal counts come back in whatever order Postgres produces.
    pub async fn aggregate_points(
        executor: impl Executor<'_, Database = Postgres>,
        filter: &MapFilter,
        precision: Precision,
    ) -> Result<Vec<MapPointRow>, DbError> {
        let mut builder = aggregate_points_query(filter, precision);
        Ok(builder
            .build_query_as::<MapPointRow>()
            .fetch_all(executor)
            .await?)
    }

    //================================================================================
    // Viewport listing
    //================================================================================

    /// One page of individual media items, newest first. Undated items sort last.
    pub async fn list_in_viewport(
        executor: impl Executor<'_, Database = Postgres>,
        filter: &MapFilter,
        page: Page,
    ) -> Result<Vec<ViewportPhotoRow>, DbError> {
        let mut builder = list_in_viewport_query(filter, page);
        Ok(builder
            .build_query_as::<ViewportPhotoRow>()
            .fetch_all(executor)
            .await?)
    }

    pub async fn count_in_viewport(
        executor: impl Executor<'_, Database = Postgres>,
        filter: &MapFilter,
    ) -> Result<i64, DbError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        filter.push_from(&mut builder);
        filter.push_where(&mut builder);
        Ok(builder
            .build_query_scalar::<i64>()
            .fetch_one(executor)
            .await?)
    }

    //================================================================================
    // Date range
    //================================================================================

    /// Earliest and latest capture date. Both are `NULL` when nothing matches.
    pub async fn date_range(
        executor: impl Executor<'_, Database = Postgres>,
        filter: &MapFilter,
    ) -> Result<DateRangeRow, DbError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT MIN(mi.taken_at) AS min, MAX(mi.taken_at) AS max");
        filter.push_from(&mut builder);
        filter.push_where(&mut builder);
        Ok(builder
            .build_query_as::<DateRangeRow>()
            .fetch_one(executor)
            .await?)
    }
}

fn aggregate_points_query(filter: &MapFilter, precision: Precision) -> QueryBuilder<'static, Postgres> {
    let factor = f64::from(precision.factor);
    let mut builder = QueryBuilder::<Postgres>::new(
        r"
        SELECT
            MIN(mi.id) AS id,
            FLOOR(mi.latitude * ",
    );
    builder
        .push_bind(factor)
        .push(")::BIGINT AS lat_index, FLOOR(mi.longitude * ")
        .push_bind(factor)
        .push(
            r")::BIGINT AS lng_index,
            COUNT(*) AS point_count,
            MAX(mi.taken_at) AS most_recent,
            COALESCE(
                (array_agg(mi.thumbnail_key ORDER BY mi.taken_at DESC NULLS LAST, mi.id)
                    FILTER (WHERE mi.thumbnail_key IS NOT NULL))[1:3],
                '{}'::TEXT[]
            ) AS thumbnails",
        );
    filter.push_from(&mut builder);
    filter.push_where(&mut builder);
    builder
        .push(" GROUP BY lat_index, lng_index ORDER BY point_count DESC LIMIT ")
        .push_bind(precision.limit);
    builder
}

fn list_in_viewport_query(filter: &MapFilter, page: Page) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(
        r"
        SELECT
            mi.id,
            mi.latitude,
            mi.longitude,
            mi.thumbnail_key,
            mi.display_key,
            mi.taken_at,
            mi.filename,
            mi.width,
            mi.height,
            mi.album_id,
            a.name AS album_name",
    );
    filter.push_from(&mut builder);
    builder.push(" JOIN album a ON a.id = mi.album_id");
    filter.push_where(&mut builder);
    builder
        .push(" ORDER BY mi.taken_at DESC NULLS LAST, mi.id LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);
    builder
}
