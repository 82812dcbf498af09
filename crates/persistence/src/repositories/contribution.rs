//! Contribution repository for database operations.
//!
//! The contribute path is the one place the funding invariant can be
//! raced: two concurrent contributions may each pass the cap check and
//! together exceed the price. The transaction therefore takes a
//! `FOR UPDATE` row lock on the item for the whole read-total / insert /
//! recompute / maybe-flip-reserved sequence, serializing contributions
//! per item.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use domain::services::funding;
use domain::services::gifting::{self, GiftingError};

use crate::entities::{ContributionEntity, ItemEntity, WishlistEntity};

const CONTRIBUTION_COLUMNS: &str =
    "id, item_id, contributor_name, contributor_email, amount, message, created_at";

/// Input for contributing toward an item.
#[derive(Debug, Clone)]
pub struct NewContribution {
    pub contributor_name: String,
    pub contributor_email: Option<String>,
    pub amount: Decimal,
    pub message: Option<String>,
}

/// Result of a committed contribution.
#[derive(Debug, Clone)]
pub struct ContributeOutcome {
    pub contribution: ContributionEntity,
    pub wishlist_id: Uuid,
    /// Pooled total after the commit, recomputed from the durable rows.
    pub total_contributed: Decimal,
    /// Whether this contribution completed the funding.
    pub reserved: bool,
}

/// Repository for contribution-related database operations.
#[derive(Clone)]
pub struct ContributionRepository {
    pool: PgPool,
}

impl ContributionRepository {
    /// Creates a new ContributionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a contribution toward a pooling item, enforcing the funding
    /// cap and flipping `reserved` when the price is reached.
    pub async fn contribute(
        &self,
        item_id: Uuid,
        input: NewContribution,
    ) -> Result<ContributeOutcome, GiftingError> {
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

        let price = gifting::ensure_contributable(&item.clone().into(), &wishlist.into())?;

        let (total,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM contributions WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        gifting::ensure_within_price(price, total, input.amount)?;

        let contribution = sqlx::query_as::<_, ContributionEntity>(&format!(
            r#"
            INSERT INTO contributions
                (id, item_id, contributor_name, contributor_email, amount, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            RETURNING {CONTRIBUTION_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(item_id)
        .bind(&input.contributor_name)
        .bind(&input.contributor_email)
        .bind(input.amount)
        .bind(&input.message)
        .fetch_one(&mut *tx)
        .await?;

        // Recompute from the durable rows rather than trusting the
        // in-memory sum.
        let (total_contributed,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM contributions WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        let fully_funded = funding::is_fully_funded(price, total_contributed);
        if fully_funded && !item.reserved {
            sqlx::query(
                "UPDATE wishlist_items SET reserved = true, updated_at = now() WHERE id = $1",
            )
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            %item_id,
            amount = %input.amount,
            total = %total_contributed,
            reserved = fully_funded,
            "contribution recorded"
        );

        Ok(ContributeOutcome {
            contribution,
            wishlist_id: item.wishlist_id,
            total_contributed,
            reserved: item.reserved || fully_funded,
        })
    }

    /// All contributions of an item, oldest first.
    pub async fn find_by_item(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<ContributionEntity>, sqlx::Error> {
        sqlx::query_as::<_, ContributionEntity>(&format!(
            "SELECT {CONTRIBUTION_COLUMNS} FROM contributions WHERE item_id = $1 ORDER BY created_at"
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Pooled total for a single item.
    pub async fn total_for_item(&self, item_id: Uuid) -> Result<Decimal, sqlx::Error> {
        let (total,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM contributions WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Pooled totals for a batch of items. Items without contributions
    /// are absent from the map.
    pub async fn totals_for_items(
        &self,
        item_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Decimal>, sqlx::Error> {
        let rows: Vec<(Uuid, Decimal)> = sqlx::query_as(
            r#"
            SELECT item_id, SUM(amount)
            FROM contributions
            WHERE item_id = ANY($1)
            GROUP BY item_id
            "#,
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}
