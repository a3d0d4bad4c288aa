use crate::subscribe::WebSocketChannel;
use crate::{AppState, Error};
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::room as RoomApi;
use domain::Id;
use fanout::error::SubscribeError;

use log::*;

/// Client-facing rejection of a subscribe request.
#[derive(Debug)]
pub(crate) struct SubscribeFailure(pub(crate) SubscribeError);

impl IntoResponse for SubscribeFailure {
    fn into_response(self) -> Response {
        match self.0 {
            SubscribeError::RoomNotFound => {
                (StatusCode::NOT_FOUND, "Room not found!").into_response()
            }
            SubscribeError::ChannelUpgradeFailed => (
                StatusCode::BAD_REQUEST,
                "Failed to upgrade to Websocket connection",
            )
                .into_response(),
        }
    }
}

/// GET open a WebSocket that receives every event of a Room.
///
/// The room is checked before the upgrade and the subscriber stays pending
/// until the upgrade completes, so a rejected request never registers one.
#[utoipa::path(
    get,
    path = "/subscribe/{room_id}",
    params(
        ("room_id" = sea_orm::prelude::Uuid, Path, description = "Room to subscribe to")
    ),
    responses(
        (status = 101, description = "Switched to a WebSocket streaming the Room's events"),
        (status = 400, description = "Invalid room id or failed WebSocket upgrade"),
        (status = 404, description = "Room not found"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub(crate) async fn subscribe(
    State(app_state): State<AppState>,
    Path(room_id): Path<Id>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    debug!("GET Subscribe to Room {room_id}");

    if let Err(e) = RoomApi::find_by_id(app_state.db_conn_ref(), room_id).await {
        if e.is_not_found() {
            warn!("Rejecting subscription to unknown room {room_id}");
            return SubscribeFailure(SubscribeError::RoomNotFound).into_response();
        }
        return Error::from(e).into_response();
    }

    let pending = app_state.fanout_manager.admit(room_id);

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => {
            warn!("Failed to upgrade subscriber of room {room_id}: {rejection}");
            return SubscribeFailure(SubscribeError::ChannelUpgradeFailed).into_response();
        }
    };

    upgrade
        .on_failed_upgrade(move |e| {
            warn!("WebSocket upgrade for room {room_id} failed: {e}");
        })
        .on_upgrade(move |socket| async move {
            pending
                .activate()
                .run(WebSocketChannel::new(socket))
                .await;
        })
}
