//! Venue repository: `venues` and `venue_images`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use buzzvar_core::{VenueId, VenueImageId};

use super::RepositoryError;
use crate::models::{NewVenue, Venue, VenueImage, VenueUpdate};

/// Internal row type for `venues` queries.
#[derive(Debug, sqlx::FromRow)]
struct VenueRow {
    id: VenueId,
    name: String,
    description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VenueRow> for Venue {
    fn from(row: VenueRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            address: row.address,
            city: row.city,
            verified: row.verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for `venue_images` queries.
#[derive(Debug, sqlx::FromRow)]
struct VenueImageRow {
    id: VenueImageId,
    venue_id: VenueId,
    url: String,
    caption: Option<String>,
    kind: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<VenueImageRow> for VenueImage {
    fn from(row: VenueImageRow) -> Self {
        Self {
            id: row.id,
            venue_id: row.venue_id,
            url: row.url,
            caption: row.caption,
            kind: row.kind,
            created_at: row.created_at,
        }
    }
}

/// Access to venue profiles and their images.
#[async_trait]
pub trait VenueStore: Send + Sync {
    /// Point lookup by venue ID.
    async fn get(&self, id: VenueId) -> Result<Option<Venue>, RepositoryError>;

    /// Page of venues, newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Venue>, RepositoryError>;

    /// Venues referenced by the given IDs (for owner venue listings).
    async fn get_many(&self, ids: &[VenueId]) -> Result<Vec<Venue>, RepositoryError>;

    /// Total number of venues.
    async fn count(&self) -> Result<i64, RepositoryError>;

    /// Number of venues created strictly before `cutoff`.
    async fn count_created_before(&self, cutoff: DateTime<Utc>) -> Result<i64, RepositoryError>;

    /// Insert a new venue and return it.
    async fn insert(&self, venue: &NewVenue) -> Result<Venue, RepositoryError>;

    /// Apply a partial update and return the updated venue.
    async fn update(&self, id: VenueId, update: &VenueUpdate) -> Result<Venue, RepositoryError>;

    /// Set the verification flag.
    async fn set_verified(&self, id: VenueId, verified: bool) -> Result<Venue, RepositoryError>;

    /// Hard-delete a venue (also used as the compensating action when the
    /// ownership insert after creation fails).
    async fn delete(&self, id: VenueId) -> Result<(), RepositoryError>;

    /// Images attached to a venue, oldest first.
    async fn list_images(&self, venue_id: VenueId) -> Result<Vec<VenueImage>, RepositoryError>;

    /// Attach an image URL returned by the file storage collaborator.
    async fn insert_image(
        &self,
        venue_id: VenueId,
        url: &str,
        caption: Option<&str>,
        kind: Option<&str>,
    ) -> Result<VenueImage, RepositoryError>;

    /// Remove an image, scoped to the venue so a foreign image ID cannot
    /// delete across venues.
    async fn delete_image(
        &self,
        venue_id: VenueId,
        image_id: VenueImageId,
    ) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed [`VenueStore`].
pub struct PgVenueStore {
    pool: PgPool,
}

impl PgVenueStore {
    /// Create a new venue store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const VENUE_COLUMNS: &str = "id, name, description, address, city, verified, created_at, updated_at";

#[async_trait]
impl VenueStore for PgVenueStore {
    async fn get(&self, id: VenueId) -> Result<Option<Venue>, RepositoryError> {
        let row = sqlx::query_as::<_, VenueRow>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venues"))?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Venue>, RepositoryError> {
        let rows = sqlx::query_as::<_, VenueRow>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venues"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_many(&self, ids: &[VenueId]) -> Result<Vec<Venue>, RepositoryError> {
        let raw: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();
        let rows = sqlx::query_as::<_, VenueRow>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE id = ANY($1) ORDER BY created_at DESC"
        ))
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venues"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM venues")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "venues"))
    }

    async fn count_created_before(&self, cutoff: DateTime<Utc>) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM venues WHERE created_at < $1")
            .bind(cutoff)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "venues"))
    }

    async fn insert(&self, venue: &NewVenue) -> Result<Venue, RepositoryError> {
        let row = sqlx::query_as::<_, VenueRow>(&format!(
            r"
            INSERT INTO venues (name, description, address, city, verified)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING {VENUE_COLUMNS}
            "
        ))
        .bind(&venue.name)
        .bind(&venue.description)
        .bind(&venue.address)
        .bind(&venue.city)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venues"))?;

        Ok(row.into())
    }

    async fn update(&self, id: VenueId, update: &VenueUpdate) -> Result<Venue, RepositoryError> {
        let row = sqlx::query_as::<_, VenueRow>(&format!(
            r"
            UPDATE venues
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                city = COALESCE($5, city),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {VENUE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.address)
        .bind(&update.city)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venues"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn set_verified(&self, id: VenueId, verified: bool) -> Result<Venue, RepositoryError> {
        let row = sqlx::query_as::<_, VenueRow>(&format!(
            r"
            UPDATE venues
            SET verified = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {VENUE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(verified)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venues"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: VenueId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "venues"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_images(&self, venue_id: VenueId) -> Result<Vec<VenueImage>, RepositoryError> {
        let rows = sqlx::query_as::<_, VenueImageRow>(
            r"
            SELECT id, venue_id, url, caption, kind, created_at
            FROM venue_images
            WHERE venue_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venue_images"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_image(
        &self,
        venue_id: VenueId,
        url: &str,
        caption: Option<&str>,
        kind: Option<&str>,
    ) -> Result<VenueImage, RepositoryError> {
        let row = sqlx::query_as::<_, VenueImageRow>(
            r"
            INSERT INTO venue_images (venue_id, url, caption, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING id, venue_id, url, caption, kind, created_at
            ",
        )
        .bind(venue_id)
        .bind(url)
        .bind(caption)
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venue_images"))?;

        Ok(row.into())
    }

    async fn delete_image(
        &self,
        venue_id: VenueId,
        image_id: VenueImageId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM venue_images WHERE id = $1 AND venue_id = $2")
            .bind(image_id)
            .bind(venue_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "venue_images"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
