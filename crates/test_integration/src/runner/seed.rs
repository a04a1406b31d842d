use chrono::{DateTime, TimeZone, Utc};
use color_eyre::Result;
use common_services::database::album::album_collaborator::{AlbumCollaborator, AlbumRole};
use sqlx::{PgPool, Postgres, QueryBuilder};

/// A media item row to insert. Coordinates are either both set or both absent.
#[derive(Debug, Clone)]
pub struct SeedPhoto {
    pub id: String,
    pub coordinates: Option<(f64, f64)>,
    pub taken_at: Option<DateTime<Utc>>,
    pub thumbnail_key: Option<String>,
    pub deleted: bool,
}

impl SeedPhoto {
    pub fn at(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        let id = id.into();
        Self {
            thumbnail_key: Some(format!("thumb/{id}")),
            id,
            coordinates: Some((lat, lng)),
            taken_at: None,
            deleted: false,
        }
    }

    pub fn ungeotagged(id: impl Into<String>) -> Self {
        Self {
            coordinates: None,
            ..Self::at(id, 0.0, 0.0)
        }
    }

    #[must_use]
    pub fn taken(mut self, year: i32, month: u32, day: u32) -> Self {
        self.taken_at = Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single();
        self
    }

    #[must_use]
    pub fn without_thumbnail(mut self) -> Self {
        self.thumbnail_key = None;
        self
    }

    #[must_use]
    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }
}

pub async fn create_user(pool: &PgPool, email: &str) -> Result<i32> {
    let id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO app_user (email, name) VALUES ($1, $1) RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Creates an album and grants its owner access.
pub async fn create_album(pool: &PgPool, album_id: &str, owner_id: i32) -> Result<()> {
    sqlx::query("INSERT INTO album (id, owner_id, name) VALUES ($1, $2, $3)")
        .bind(album_id)
        .bind(owner_id)
        .bind(format!("Album {album_id}"))
        .execute(pool)
        .await?;
    grant(pool, album_id, owner_id, AlbumRole::Owner).await?;
    Ok(())
}

pub async fn grant(
    pool: &PgPool,
    album_id: &str,
    user_id: i32,
    role: AlbumRole,
) -> Result<AlbumCollaborator> {
    let collaborator = sqlx::query_as::<_, AlbumCollaborator>(
        r"
        INSERT INTO album_collaborator (album_id, user_id, role)
        VALUES ($1, $2, $3)
        RETURNING id, album_id, user_id, role, added_at
        ",
    )
    .bind(album_id)
    .bind(user_id)
    .bind(role)
    .fetch_one(pool)
    .await?;
    Ok(collaborator)
}

pub async fn insert_photos(pool: &PgPool, album_id: &str, photos: &[SeedPhoto]) -> Result<()> {
    for chunk in photos.chunks(1_000) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO media_item (id, album_id, filename, width, height, latitude, longitude, taken_at, thumbnail_key, display_key, deleted) ",
        );
        builder.push_values(chunk, |mut row, photo| {
            row.push_bind(&photo.id)
                .push_bind(album_id)
                .push_bind(format!("{}.jpg", photo.id))
                .push_bind(4_000_i32)
                .push_bind(3_000_i32)
                .push_bind(photo.coordinates.map(|(lat, _)| lat))
                .push_bind(photo.coordinates.map(|(_, lng)| lng))
                .push_bind(photo.taken_at)
                .push_bind(&photo.thumbnail_key)
                .push_bind(photo.thumbnail_key.as_ref().map(|key| key.replace("thumb/", "display/")))
                .push_bind(photo.deleted);
        });
        builder.build().execute(pool).await?;
    }
    Ok(())
}

/// A user owning one album filled with `photos`. Returns the user id.
pub async fn user_with_album(pool: &PgPool, name: &str, photos: &[SeedPhoto]) -> Result<i32> {
    let user_id = create_user(pool, &format!("{name}@example.com")).await?;
    let album_id = format!("{name}-album");
    create_album(pool, &album_id, user_id).await?;
    insert_photos(pool, &album_id, photos).await?;
    Ok(user_id)
}
