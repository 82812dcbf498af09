//! Wishlist CRUD and the public share-link endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    GuestWishlistView, Item, OwnerItemView, OwnerWishlistView, Wishlist,
};
use persistence::repositories::{
    ContributionRepository, ItemRepository, NewItem, NewWishlist, ReservationRepository,
    UpdateWishlist, WishlistRepository,
};
use shared::validation::{validate_currency_code, validate_priority, MAX_NAME_LENGTH};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::views::{guest_item_view, owner_item_view};

pub fn owner_router() -> Router<AppState> {
    Router::new()
        .route("/api/wishlists", get(list_wishlists).post(create_wishlist))
        .route(
            "/api/wishlists/:wishlist_id",
            get(get_wishlist)
                .put(update_wishlist)
                .delete(delete_wishlist),
        )
        .route("/api/wishlists/:wishlist_id/items", post(create_item))
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/api/wishlists/public/:slug", get(get_public_wishlist))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateWishlistRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    title: String,

    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    description: Option<String>,

    #[serde(default)]
    is_public: bool,

    event_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateWishlistRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    title: Option<String>,

    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    description: Option<String>,

    is_public: Option<bool>,

    event_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateItemRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    title: String,

    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    description: Option<String>,

    #[validate(url(message = "must be a valid URL"))]
    url: Option<String>,

    #[validate(url(message = "must be a valid URL"))]
    image_url: Option<String>,

    price: Option<Decimal>,

    #[serde(default = "default_currency")]
    currency: String,

    #[serde(default)]
    priority: i16,

    #[serde(default)]
    pooling_enabled: bool,
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl CreateItemRequest {
    fn validate_domain(&self) -> Result<(), ApiError> {
        validate_currency_code(&self.currency)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        validate_priority(self.priority).map_err(|e| ApiError::Validation(e.to_string()))?;
        if let Some(price) = self.price {
            if price <= Decimal::ZERO {
                return Err(ApiError::Validation("price: must be positive".into()));
            }
        }
        if self.title.len() > MAX_NAME_LENGTH {
            return Err(ApiError::Validation("title: too long".into()));
        }
        Ok(())
    }
}

async fn list_wishlists(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<OwnerWishlistView>>, ApiError> {
    let wishlists = WishlistRepository::new(state.pool.clone())
        .find_by_owner(current_user.user_id)
        .await?;

    let mut views = Vec::with_capacity(wishlists.len());
    for entity in wishlists {
        views.push(build_owner_view(&state, entity.into()).await?);
    }
    Ok(Json(views))
}

async fn create_wishlist(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<CreateWishlistRequest>,
) -> Result<(StatusCode, Json<Wishlist>), ApiError> {
    payload.validate()?;

    let entity = WishlistRepository::new(state.pool.clone())
        .create(
            current_user.user_id,
            NewWishlist {
                title: payload.title,
                description: payload.description,
                is_public: payload.is_public,
                event_date: payload.event_date,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entity.into())))
}

async fn get_wishlist(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(wishlist_id): Path<Uuid>,
) -> Result<Json<OwnerWishlistView>, ApiError> {
    let entity = WishlistRepository::new(state.pool.clone())
        .find_by_id_and_owner(wishlist_id, current_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Wishlist not found".into()))?;

    let view = build_owner_view(&state, entity.into()).await?;
    Ok(Json(view))
}

async fn update_wishlist(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(wishlist_id): Path<Uuid>,
    Json(payload): Json<UpdateWishlistRequest>,
) -> Result<Json<Wishlist>, ApiError> {
    payload.validate()?;

    let repo = WishlistRepository::new(state.pool.clone());
    repo.find_by_id_and_owner(wishlist_id, current_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Wishlist not found".into()))?;

    let entity = repo
        .update(
            wishlist_id,
            current_user.user_id,
            UpdateWishlist {
                title: payload.title,
                description: payload.description,
                is_public: payload.is_public,
                event_date: payload.event_date,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Wishlist not found".into()))?;

    Ok(Json(entity.into()))
}

async fn delete_wishlist(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(wishlist_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = WishlistRepository::new(state.pool.clone())
        .delete(wishlist_id, current_user.user_id)
        .await?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Wishlist not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn create_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(wishlist_id): Path<Uuid>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<OwnerItemView>), ApiError> {
    payload.validate()?;
    payload.validate_domain()?;

    WishlistRepository::new(state.pool.clone())
        .find_by_id_and_owner(wishlist_id, current_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Wishlist not found".into()))?;

    let entity = ItemRepository::new(state.pool.clone())
        .insert(
            wishlist_id,
            NewItem {
                title: payload.title,
                description: payload.description,
                url: payload.url,
                image_url: payload.image_url,
                price: payload.price,
                currency: payload.currency,
                priority: payload.priority,
                pooling_enabled: payload.pooling_enabled,
            },
        )
        .await?;

    let item: Item = entity.into();
    // A fresh item has no contributions.
    let view = owner_item_view(item, None);
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_public_wishlist(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GuestWishlistView>, ApiError> {
    let wishlist = WishlistRepository::new(state.pool.clone())
        .find_public_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Wishlist not found".into()))?;
    let wishlist: Wishlist = wishlist.into();

    let items = ItemRepository::new(state.pool.clone())
        .find_by_wishlist(wishlist.id)
        .await?;

    let reservations = ReservationRepository::new(state.pool.clone());
    let contributions = ContributionRepository::new(state.pool.clone());

    let item_ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
    let totals = contributions.totals_for_items(&item_ids).await?;

    let mut views = Vec::with_capacity(items.len());
    for entity in items {
        let item: Item = entity.into();
        let summed = totals.get(&item.id).copied();
        let item_reservations = reservations
            .find_by_item(item.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        let item_contributions = contributions
            .find_by_item(item.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        views.push(guest_item_view(
            item,
            summed,
            item_reservations,
            item_contributions,
        ));
    }

    Ok(Json(GuestWishlistView::new(wishlist, views)))
}

/// Assemble the owner projection of a wishlist with aggregate funding
/// totals per item.
async fn build_owner_view(
    state: &AppState,
    wishlist: Wishlist,
) -> Result<OwnerWishlistView, ApiError> {
    let items = ItemRepository::new(state.pool.clone())
        .find_by_wishlist(wishlist.id)
        .await?;

    let item_ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
    let totals = ContributionRepository::new(state.pool.clone())
        .totals_for_items(&item_ids)
        .await?;

    let views = items
        .into_iter()
        .map(|entity| {
            let item: Item = entity.into();
            let summed = totals.get(&item.id).copied();
            owner_item_view(item, summed)
        })
        .collect();

    Ok(OwnerWishlistView {
        wishlist,
        items: views,
    })
}
