//! WebSocket endpoint for realtime wishlist updates.
//!
//! Guests subscribe to a public wishlist's channel and receive every
//! reservation, cancellation, contribution, and deletion event as JSON.
//! Subscriptions to non-public or missing wishlists are closed with a
//! policy violation code after the upgrade.

use std::borrow::Cow;

use futures::{SinkExt, StreamExt};

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
    routing::get,
    Router,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use uuid::Uuid;

use persistence::repositories::WishlistRepository;

use crate::app::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/items/ws/:wishlist_id", get(subscribe))
}

async fn subscribe(
    State(state): State<AppState>,
    Path(wishlist_id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(state, wishlist_id, socket))
}

async fn handle_socket(state: AppState, wishlist_id: Uuid, mut socket: WebSocket) {
    let public = WishlistRepository::new(state.pool.clone())
        .is_public(wishlist_id)
        .await
        .unwrap_or(false);

    if !public {
        debug!(%wishlist_id, "refusing subscription to non-public wishlist");
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: close_code::POLICY,
                reason: Cow::from("wishlist is not public"),
            })))
            .await;
        return;
    }

    let mut rx = state.registry.subscribe(wishlist_id);
    let (mut sender, mut receiver) = socket.split();
    debug!(%wishlist_id, "guest subscribed");

    loop {
        tokio::select! {
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Inbound frames carry no meaning; pings are answered
                    // by axum automatically.
                    Some(Ok(_)) => {}
                }
            }
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        let payload = match serde_json::to_string(&event) {
                            Ok(payload) => payload,
                            Err(e) => {
                                warn!(%wishlist_id, "failed to serialize event: {}", e);
                                continue;
                            }
                        };
                        if sender.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    // Slow consumer skipped some events; resume with the
                    // next one rather than dropping the connection.
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(%wishlist_id, skipped, "subscriber lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    // The receiver must be gone before release, or the channel still
    // counts this subscriber and the empty entry is never pruned.
    drop(rx);
    state.registry.release(wishlist_id);
    debug!(%wishlist_id, "guest unsubscribed");
}
