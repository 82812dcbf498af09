//! Reservation repository for database operations.
//!
//! Reserve and cancel both run inside a transaction holding a row lock on
//! the item, so the single-claim invariant (`reserved` iff a reservation
//! exists) survives concurrent requests.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use domain::services::gifting::{self, GiftingError};

use crate::entities::{ItemEntity, ReservationEntity, WishlistEntity};

const RESERVATION_COLUMNS: &str =
    "id, item_id, reserver_name, reserver_email, message, created_at";

/// Input for reserving an item.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub reserver_name: String,
    pub reserver_email: Option<String>,
    pub message: Option<String>,
}

/// Result of a cancellation.
#[derive(Debug, Clone)]
pub struct CancelOutcome {
    /// Recomputed reserved state of the item after the cancellation.
    pub reserved: bool,
    /// Parent wishlist, if it still exists; `None` suppresses the
    /// broadcast.
    pub wishlist_id: Option<Uuid>,
}

/// Repository for reservation-related database operations.
#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reserve a non-pooling item for a single claimant.
    ///
    /// Returns the reservation and the parent wishlist id for the
    /// broadcast payload.
    pub async fn reserve(
        &self,
        item_id: Uuid,
        input: NewReservation,
    ) -> Result<(ReservationEntity, Uuid), GiftingError> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, ItemEntity>(
            r#"
            SELECT id, title, description, url, image_url, price, currency, priority,
                   reserved, pooling_enabled, wishlist_id, created_at, updated_at
            FROM wishlist_items
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(GiftingError::NotFound("Item"))?;

        let wishlist = sqlx::query_as::<_, WishlistEntity>(
            r#"
            SELECT id, title, description, slug, is_public, event_date, owner_id,
                   created_at, updated_at
            FROM wishlists
            WHERE id = $1
            "#,
        )
        .bind(item.wishlist_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(GiftingError::NotFound("Wishlist"))?;

        gifting::ensure_reservable(&item.clone().into(), &wishlist.into())?;

        let reservation = sqlx::query_as::<_, ReservationEntity>(&format!(
            r#"
            INSERT INTO reservations (id, item_id, reserver_name, reserver_email, message, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            RETURNING {RESERVATION_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(item_id)
        .bind(&input.reserver_name)
        .bind(&input.reserver_email)
        .bind(&input.message)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE wishlist_items SET reserved = true, updated_at = now() WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(%item_id, wishlist_id = %item.wishlist_id, "item reserved");
        Ok((reservation, item.wishlist_id))
    }

    /// Cancel the reservation whose contact email matches the credential.
    ///
    /// Deletes the matching reservation, recomputes the item's reserved
    /// state from the remaining rows, and reports whether the parent
    /// wishlist still exists (it may have been deleted concurrently, in
    /// which case the caller suppresses the broadcast).
    pub async fn cancel(
        &self,
        item_id: Uuid,
        reserver_email: &str,
    ) -> Result<CancelOutcome, GiftingError> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, ItemEntity>(
            r#"
            SELECT id, title, description, url, image_url, price, currency, priority,
                   reserved, pooling_enabled, wishlist_id, created_at, updated_at
            FROM wishlist_items
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(GiftingError::NotFound("Item"))?;

        let reservation = sqlx::query_as::<_, ReservationEntity>(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations
            WHERE item_id = $1 AND reserver_email = $2
            LIMIT 1
            "#,
        ))
        .bind(item_id)
        .bind(reserver_email)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(GiftingError::NotFound("Reservation"))?;

        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(reservation.id)
            .execute(&mut *tx)
            .await?;

        // Recompute the cached flag from the durable rows.
        let (remaining,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM reservations WHERE item_id = $1")
                .bind(item_id)
                .fetch_one(&mut *tx)
                .await?;

        let reserved = remaining > 0;
        if !reserved {
            sqlx::query(
                "UPDATE wishlist_items SET reserved = false, updated_at = now() WHERE id = $1",
            )
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let wishlist_id: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM wishlists WHERE id = $1")
                .bind(item.wishlist_id)
                .fetch_optional(&self.pool)
                .await?;

        info!(%item_id, reserved, "reservation cancelled");
        Ok(CancelOutcome {
            reserved,
            wishlist_id: wishlist_id.map(|(id,)| id),
        })
    }

    /// All reservations of an item, oldest first.
    pub async fn find_by_item(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<ReservationEntity>, sqlx::Error> {
        sqlx::query_as::<_, ReservationEntity>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE item_id = $1 ORDER BY created_at"
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await
    }
}
