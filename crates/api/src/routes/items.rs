//! Item update/delete and the guest reserve/cancel/contribute surface.
//!
//! Every state change that survives its transaction is fanned out to the
//! wishlist's realtime channel. Broadcast payloads never include contact
//! emails.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::{Contribution, Item, OwnerItemView, Reservation, WishlistEvent};
use persistence::repositories::{
    ContributionRepository, ItemRepository, NewContribution, NewReservation,
    ReservationRepository, UpdateItem, WishlistRepository,
};
use shared::validation::{validate_currency_code, validate_priority};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::views::owner_item_view;

pub fn owner_router() -> Router<AppState> {
    Router::new().route("/api/items/:item_id", put(update_item).delete(delete_item))
}

pub fn guest_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/items/:item_id/reserve",
            post(reserve_item).delete(cancel_reservation),
        )
        .route("/api/items/:item_id/contribute", post(contribute))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateItemRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    title: Option<String>,

    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    description: Option<String>,

    #[validate(url(message = "must be a valid URL"))]
    url: Option<String>,

    #[validate(url(message = "must be a valid URL"))]
    image_url: Option<String>,

    price: Option<Decimal>,

    currency: Option<String>,

    priority: Option<i16>,

    pooling_enabled: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ReserveRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    reserver_name: String,

    #[validate(email(message = "must be a valid email address"))]
    reserver_email: Option<String>,

    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    message: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CancelReservationRequest {
    #[validate(email(message = "must be a valid email address"))]
    reserver_email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ContributeRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    contributor_name: String,

    #[validate(email(message = "must be a valid email address"))]
    contributor_email: Option<String>,

    amount: Decimal,

    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContributeResponse {
    contribution: Contribution,
    total_contributed: Decimal,
    reserved: bool,
}

async fn update_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<OwnerItemView>, ApiError> {
    payload.validate()?;
    if let Some(currency) = &payload.currency {
        validate_currency_code(currency).map_err(|e| ApiError::Validation(e.to_string()))?;
    }
    if let Some(priority) = payload.priority {
        validate_priority(priority).map_err(|e| ApiError::Validation(e.to_string()))?;
    }
    if let Some(price) = payload.price {
        if price <= Decimal::ZERO {
            return Err(ApiError::Validation("price: must be positive".into()));
        }
    }

    let repo = ItemRepository::new(state.pool.clone());
    let item = ensure_owned_item(&state, &repo, item_id, current_user.user_id).await?;

    let entity = repo
        .update(
            item.id,
            UpdateItem {
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
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".into()))?;

    let item: Item = entity.into();
    let summed = ContributionRepository::new(state.pool.clone())
        .totals_for_items(&[item.id])
        .await?
        .get(&item.id)
        .copied();

    Ok(Json(owner_item_view(item, summed)))
}

/// Delete an item, refusing while pooled contributions exist.
///
/// Guests watching the wishlist are notified so the entry disappears
/// from their view.
async fn delete_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = ItemRepository::new(state.pool.clone());
    ensure_owned_item(&state, &repo, item_id, current_user.user_id).await?;

    let wishlist_id = repo.delete_guarded(item_id).await?;

    state
        .registry
        .broadcast(wishlist_id, WishlistEvent::item_deleted(wishlist_id, item_id));

    Ok(StatusCode::NO_CONTENT)
}

async fn reserve_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    payload.validate()?;

    let (entity, wishlist_id) = ReservationRepository::new(state.pool.clone())
        .reserve(
            item_id,
            NewReservation {
                reserver_name: payload.reserver_name,
                reserver_email: payload.reserver_email,
                message: payload.message,
            },
        )
        .await?;

    let reservation: Reservation = entity.into();
    state.registry.broadcast(
        wishlist_id,
        WishlistEvent::reservation(wishlist_id, item_id, reservation.reserver_name.clone()),
    );

    Ok((StatusCode::CREATED, Json(reservation)))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<CancelReservationRequest>,
) -> Result<StatusCode, ApiError> {
    payload.validate()?;

    let outcome = ReservationRepository::new(state.pool.clone())
        .cancel(item_id, &payload.reserver_email)
        .await?;

    // The wishlist may have been deleted concurrently; nobody is left to
    // notify in that case.
    if let Some(wishlist_id) = outcome.wishlist_id {
        state.registry.broadcast(
            wishlist_id,
            WishlistEvent::reservation_cancelled(wishlist_id, item_id, outcome.reserved),
        );
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn contribute(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<ContributeRequest>,
) -> Result<(StatusCode, Json<ContributeResponse>), ApiError> {
    payload.validate()?;
    if payload.amount <= Decimal::ZERO {
        return Err(ApiError::Validation("amount: must be positive".into()));
    }

    let outcome = ContributionRepository::new(state.pool.clone())
        .contribute(
            item_id,
            NewContribution {
                contributor_name: payload.contributor_name,
                contributor_email: payload.contributor_email,
                amount: payload.amount,
                message: payload.message,
            },
        )
        .await?;

    let contribution: Contribution = outcome.contribution.into();
    state.registry.broadcast(
        outcome.wishlist_id,
        WishlistEvent::contribution(
            outcome.wishlist_id,
            item_id,
            contribution.contributor_name.clone(),
            contribution.amount,
            outcome.total_contributed,
            outcome.reserved,
        ),
    );

    Ok((
        StatusCode::CREATED,
        Json(ContributeResponse {
            contribution,
            total_contributed: outcome.total_contributed,
            reserved: outcome.reserved,
        }),
    ))
}

/// Load an item and verify the caller owns its parent wishlist.
async fn ensure_owned_item(
    state: &AppState,
    repo: &ItemRepository,
    item_id: Uuid,
    user_id: Uuid,
) -> Result<Item, ApiError> {
    let entity = repo
        .find_by_id(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".into()))?;
    let item: Item = entity.into();

    WishlistRepository::new(state.pool.clone())
        .find_by_id_and_owner(item.wishlist_id, user_id)
        .await?
        .ok_or_else(|| ApiError::Forbidden("You do not own this wishlist".into()))?;

    Ok(item)
}
