use crate::error::Error;
use crate::messages::Model;
use crate::{room, Id};
use entity_api::message as MessageApi;
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;

use log::*;

/// Posts a new message to a room and notifies the room's subscribers.
pub async fn create(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    room_id: Id,
    message: String,
) -> Result<Model, Error> {
    room::find_by_id(db, room_id).await?;

    let message = MessageApi::create(db, room_id, message).await?;

    event_publisher
        .publish(DomainEvent::message_created(
            room_id,
            message.id,
            message.message.clone(),
        ))
        .await;

    Ok(message)
}

pub async fn find_by_room_id(db: &DatabaseConnection, room_id: Id) -> Result<Vec<Model>, Error> {
    room::find_by_id(db, room_id).await?;

    Ok(MessageApi::find_by_room_id(db, room_id).await?)
}

/// Finds a message, treating a message from another room as missing.
pub async fn find_in_room(
    db: &DatabaseConnection,
    room_id: Id,
    message_id: Id,
) -> Result<Model, Error> {
    let message = MessageApi::find_by_id(db, message_id).await?;

    if message.room_id != room_id {
        warn!("Message {message_id} does not belong to room {room_id}");
        return Err(Error::not_found());
    }

    Ok(message)
}

pub async fn mark_as_answered(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    room_id: Id,
    message_id: Id,
) -> Result<Model, Error> {
    let message = find_in_room(db, room_id, message_id).await?;
    let message = MessageApi::mark_as_answered(db, message).await?;

    event_publisher
        .publish(DomainEvent::message_answered(room_id, message.id))
        .await;

    Ok(message)
}

/// Adds a reaction and returns the message's new reaction total.
pub async fn react(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    room_id: Id,
    message_id: Id,
) -> Result<i64, Error> {
    find_in_room(db, room_id, message_id).await?;

    let count = MessageApi::increment_reactions(db, message_id).await?;

    event_publisher
        .publish(DomainEvent::reaction_increased(room_id, message_id, count))
        .await;

    Ok(count)
}

/// Removes a reaction and returns the message's new reaction total.
pub async fn remove_reaction(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    room_id: Id,
    message_id: Id,
) -> Result<i64, Error> {
    find_in_room(db, room_id, message_id).await?;

    let count = MessageApi::decrement_reactions(db, message_id).await?;

    event_publisher
        .publish(DomainEvent::reaction_decreased(room_id, message_id, count))
        .await;

    Ok(count)
}
