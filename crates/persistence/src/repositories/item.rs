//! Wishlist item repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use domain::services::gifting::{self, GiftingError};

use crate::entities::ItemEntity;

const ITEM_COLUMNS: &str = "id, title, description, url, image_url, price, currency, priority, \
                            reserved, pooling_enabled, wishlist_id, created_at, updated_at";

/// Input for creating an item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub currency: String,
    pub priority: i16,
    pub pooling_enabled: bool,
}

/// Partial update of an item; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub priority: Option<i16>,
    pub pooling_enabled: Option<bool>,
}

/// Repository for item-related database operations.
#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// Creates a new ItemRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new item into a wishlist.
    pub async fn insert(
        &self,
        wishlist_id: Uuid,
        input: NewItem,
    ) -> Result<ItemEntity, sqlx::Error> {
        sqlx::query_as::<_, ItemEntity>(&format!(
            r#"
            INSERT INTO wishlist_items
                (id, title, description, url, image_url, price, currency, priority,
                 reserved, pooling_enabled, wishlist_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, false, $9, $10, now())
            RETURNING {ITEM_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.url)
        .bind(&input.image_url)
        .bind(input.price)
        .bind(&input.currency)
        .bind(input.priority)
        .bind(input.pooling_enabled)
        .bind(wishlist_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Find an item by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ItemEntity>, sqlx::Error> {
        sqlx::query_as::<_, ItemEntity>(&format!(
            "SELECT {ITEM_COLUMNS} FROM wishlist_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// All items of a wishlist in insertion order.
    pub async fn find_by_wishlist(
        &self,
        wishlist_id: Uuid,
    ) -> Result<Vec<ItemEntity>, sqlx::Error> {
        sqlx::query_as::<_, ItemEntity>(&format!(
            "SELECT {ITEM_COLUMNS} FROM wishlist_items WHERE wishlist_id = $1 ORDER BY created_at"
        ))
        .bind(wishlist_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Partial update of an item. The `reserved` flag is deliberately not
    /// updatable here; it is a cached projection owned by the gifting
    /// transactions.
    pub async fn update(
        &self,
        id: Uuid,
        update: UpdateItem,
    ) -> Result<Option<ItemEntity>, sqlx::Error> {
        sqlx::query_as::<_, ItemEntity>(&format!(
            r#"
            UPDATE wishlist_items
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                url = COALESCE($4, url),
                image_url = COALESCE($5, image_url),
                price = COALESCE($6, price),
                currency = COALESCE($7, currency),
                priority = COALESCE($8, priority),
                pooling_enabled = COALESCE($9, pooling_enabled),
                updated_at = now()
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(update.title)
        .bind(update.description)
        .bind(update.url)
        .bind(update.image_url)
        .bind(update.price)
        .bind(update.currency)
        .bind(update.priority)
        .bind(update.pooling_enabled)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete an item unless it carries pooled funds.
    ///
    /// Runs inside a transaction with a row lock on the item so the guard
    /// cannot race a concurrent contribution. Returns the parent wishlist
    /// id for the `item_deleted` broadcast.
    pub async fn delete_guarded(&self, item_id: Uuid) -> Result<Uuid, GiftingError> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, ItemEntity>(&format!(
            "SELECT {ITEM_COLUMNS} FROM wishlist_items WHERE id = $1 FOR UPDATE"
        ))
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(GiftingError::NotFound("Item"))?;

        let (count, total): (i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(amount), 0)
            FROM contributions
            WHERE item_id = $1
            "#,
        )
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        gifting::ensure_deletable(count, total)?;

        sqlx::query("DELETE FROM wishlist_items WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(%item_id, wishlist_id = %item.wishlist_id, "item deleted");
        Ok(item.wishlist_id)
    }
}
