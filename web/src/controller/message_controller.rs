use crate::controller::ApiResponse;
use crate::params::message::CreateParams;
use crate::response::message::ReactionCount;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::message as MessageApi;
use domain::Id;

use log::*;

/// POST a new Message to a Room; notifies the Room's subscribers.
#[utoipa::path(
    post,
    path = "/rooms/{room_id}/messages",
    params(
        ("room_id" = sea_orm::prelude::Uuid, Path, description = "Room to post the Message to")
    ),
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully Created a New Message", body = domain::messages::Model),
        (status = 404, description = "Room not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Path(room_id): Path<Id>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Message in Room {room_id} from: {params:?}");

    let message = MessageApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        room_id,
        params.message,
    )
    .await?;

    debug!("New Message: {message:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), message)),
    ))
}

/// GET all Messages of a Room
#[utoipa::path(
    get,
    path = "/rooms/{room_id}/messages",
    params(
        ("room_id" = sea_orm::prelude::Uuid, Path, description = "Room whose Messages to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Room's Messages", body = [domain::messages::Model]),
        (status = 404, description = "Room not found"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Path(room_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Messages of Room {room_id}");

    let messages = MessageApi::find_by_room_id(app_state.db_conn_ref(), room_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), messages)))
}

/// GET a particular Message of a Room
#[utoipa::path(
    get,
    path = "/rooms/{room_id}/messages/{message_id}",
    params(
        ("room_id" = sea_orm::prelude::Uuid, Path, description = "Room the Message belongs to"),
        ("message_id" = sea_orm::prelude::Uuid, Path, description = "Message id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Message", body = domain::messages::Model),
        (status = 404, description = "Message not found"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path((room_id, message_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Message {message_id} of Room {room_id}");

    let message = MessageApi::find_in_room(app_state.db_conn_ref(), room_id, message_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), message)))
}

/// PATCH add a reaction to a Message; notifies the Room's subscribers.
#[utoipa::path(
    patch,
    path = "/rooms/{room_id}/messages/{message_id}/react",
    params(
        ("room_id" = sea_orm::prelude::Uuid, Path, description = "Room the Message belongs to"),
        ("message_id" = sea_orm::prelude::Uuid, Path, description = "Message to react to")
    ),
    responses(
        (status = 200, description = "Reaction added, returns the new total", body = ReactionCount),
        (status = 404, description = "Message not found"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn react(
    State(app_state): State<AppState>,
    Path((room_id, message_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("PATCH react to Message {message_id} in Room {room_id}");

    let count = MessageApi::react(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        room_id,
        message_id,
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        ReactionCount { count },
    )))
}

/// DELETE remove a reaction from a Message; notifies the Room's subscribers.
#[utoipa::path(
    delete,
    path = "/rooms/{room_id}/messages/{message_id}/react",
    params(
        ("room_id" = sea_orm::prelude::Uuid, Path, description = "Room the Message belongs to"),
        ("message_id" = sea_orm::prelude::Uuid, Path, description = "Message to remove a reaction from")
    ),
    responses(
        (status = 200, description = "Reaction removed, returns the new total", body = ReactionCount),
        (status = 404, description = "Message not found"),
        (status = 422, description = "Message has no reactions to remove"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn remove_reaction(
    State(app_state): State<AppState>,
    Path((room_id, message_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE reaction from Message {message_id} in Room {room_id}");

    let count = MessageApi::remove_reaction(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        room_id,
        message_id,
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        ReactionCount { count },
    )))
}

/// PATCH mark a Message as answered; notifies the Room's subscribers.
#[utoipa::path(
    patch,
    path = "/rooms/{room_id}/messages/{message_id}/answer",
    params(
        ("room_id" = sea_orm::prelude::Uuid, Path, description = "Room the Message belongs to"),
        ("message_id" = sea_orm::prelude::Uuid, Path, description = "Message to mark answered")
    ),
    responses(
        (status = 200, description = "Message marked answered", body = domain::messages::Model),
        (status = 404, description = "Message not found"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn mark_as_answered(
    State(app_state): State<AppState>,
    Path((room_id, message_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("PATCH mark Message {message_id} in Room {room_id} as answered");

    let message = MessageApi::mark_as_answered(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        room_id,
        message_id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), message)))
}
