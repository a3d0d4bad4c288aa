use crate::controller::ApiResponse;
use crate::params::room::CreateParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::room as RoomApi;
use domain::Id;

use log::*;

/// POST create a new Room
#[utoipa::path(
    post,
    path = "/rooms",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully Created a New Room", body = domain::rooms::Model),
        (status = 422, description = "Unprocessable Entity"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Room from: {params:?}");

    let room = RoomApi::create(app_state.db_conn_ref(), params.theme).await?;

    debug!("New Room: {room:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), room)),
    ))
}

/// GET all Rooms
#[utoipa::path(
    get,
    path = "/rooms",
    responses(
        (status = 200, description = "Successfully retrieved all Rooms", body = [domain::rooms::Model]),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn index(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET all Rooms");

    let rooms = RoomApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), rooms)))
}

/// GET a particular Room specified by its id.
#[utoipa::path(
    get,
    path = "/rooms/{room_id}",
    params(
        ("room_id" = sea_orm::prelude::Uuid, Path, description = "Room id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Room by its id", body = domain::rooms::Model),
        (status = 400, description = "Invalid room id"),
        (status = 404, description = "Room not found"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(room_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Room by id: {room_id}");

    let room = RoomApi::find_by_id(app_state.db_conn_ref(), room_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), room)))
}
