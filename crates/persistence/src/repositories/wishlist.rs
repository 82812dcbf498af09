//! Wishlist repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::WishlistEntity;

const WISHLIST_COLUMNS: &str =
    "id, title, description, slug, is_public, event_date, owner_id, created_at, updated_at";

/// Attempts before giving up on generating a unique slug.
const SLUG_ATTEMPTS: usize = 3;

/// Input for creating a wishlist.
#[derive(Debug, Clone)]
pub struct NewWishlist {
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub event_date: Option<DateTime<Utc>>,
}

/// Partial update of a wishlist; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateWishlist {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub event_date: Option<DateTime<Utc>>,
}

/// Repository for wishlist-related database operations.
#[derive(Clone)]
pub struct WishlistRepository {
    pool: PgPool,
}

impl WishlistRepository {
    /// Creates a new WishlistRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new wishlist with a server-generated unique slug.
    ///
    /// On a slug collision (unique violation) a fresh slug is generated
    /// and the insert retried.
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: NewWishlist,
    ) -> Result<WishlistEntity, sqlx::Error> {
        let mut last_err = None;
        for _ in 0..SLUG_ATTEMPTS {
            let slug = shared::slug::generate_slug();
            let result = sqlx::query_as::<_, WishlistEntity>(&format!(
                r#"
                INSERT INTO wishlists (id, title, description, slug, is_public, event_date, owner_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, now())
                RETURNING {WISHLIST_COLUMNS}
                "#,
            ))
            .bind(Uuid::new_v4())
            .bind(&input.title)
            .bind(&input.description)
            .bind(&slug)
            .bind(input.is_public)
            .bind(input.event_date)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await;

            match result {
                Ok(entity) => return Ok(entity),
                Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                    last_err = Some(sqlx::Error::Database(db_err));
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.expect("retry loop ran at least once"))
    }

    /// Find a wishlist by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WishlistEntity>, sqlx::Error> {
        sqlx::query_as::<_, WishlistEntity>(&format!(
            "SELECT {WISHLIST_COLUMNS} FROM wishlists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a wishlist owned by the given user.
    pub async fn find_by_id_and_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<WishlistEntity>, sqlx::Error> {
        sqlx::query_as::<_, WishlistEntity>(&format!(
            "SELECT {WISHLIST_COLUMNS} FROM wishlists WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// All wishlists of a user, newest first.
    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<WishlistEntity>, sqlx::Error> {
        sqlx::query_as::<_, WishlistEntity>(&format!(
            "SELECT {WISHLIST_COLUMNS} FROM wishlists WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Find a public wishlist by its share slug.
    pub async fn find_public_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<WishlistEntity>, sqlx::Error> {
        sqlx::query_as::<_, WishlistEntity>(&format!(
            "SELECT {WISHLIST_COLUMNS} FROM wishlists WHERE slug = $1 AND is_public = true"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
    }

    /// Whether the wishlist exists and is public. Used by the realtime
    /// channel accept/refuse decision.
    pub async fn is_public(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT is_public FROM wishlists WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(is_public,)| is_public).unwrap_or(false))
    }

    /// Partial update of an owner's wishlist. Returns `None` if the
    /// wishlist does not exist or is owned by someone else.
    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        update: UpdateWishlist,
    ) -> Result<Option<WishlistEntity>, sqlx::Error> {
        sqlx::query_as::<_, WishlistEntity>(&format!(
            r#"
            UPDATE wishlists
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                is_public = COALESCE($5, is_public),
                event_date = COALESCE($6, event_date),
                updated_at = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING {WISHLIST_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(owner_id)
        .bind(update.title)
        .bind(update.description)
        .bind(update.is_public)
        .bind(update.event_date)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete an owner's wishlist (items, reservations and contributions
    /// cascade). Returns the number of rows affected.
    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wishlists WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
