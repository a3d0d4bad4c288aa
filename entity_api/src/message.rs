use super::error::Error;
use entity::messages::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection,
};

use log::*;

pub async fn create(db: &DatabaseConnection, room_id: Id, message: String) -> Result<Model, Error> {
    let message = message.trim().to_owned();
    if message.is_empty() {
        warn!("Refusing to create an empty message in room {room_id}");
        return Err(Error::invalid());
    }

    let message_active_model = ActiveModel {
        id: Set(Id::new_v4()),
        room_id: Set(room_id),
        message: Set(message),
        reaction_count: Set(0),
        answered: Set(false),
    };

    debug!("New Message to be inserted: {message_active_model:?}");

    Ok(message_active_model.insert(db).await?)
}

pub async fn find_by_room_id(db: &DatabaseConnection, room_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::RoomId.eq(room_id))
        .all(db)
        .await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Marks an already loaded message as answered. A message deleted in the
/// meantime is reported as not found.
pub async fn mark_as_answered(db: &DatabaseConnection, message: Model) -> Result<Model, Error> {
    debug!("Existing Message model to be marked answered: {message:?}");

    let active_model = ActiveModel {
        id: Unchanged(message.id),
        room_id: Unchanged(message.room_id),
        message: Unchanged(message.message),
        reaction_count: Unchanged(message.reaction_count),
        answered: Set(true),
    };

    Ok(active_model.update(db).await?)
}

/// Adds one reaction and returns the new total.
pub async fn increment_reactions(db: &DatabaseConnection, id: Id) -> Result<i64, Error> {
    let updated = Entity::update_many()
        .col_expr(
            Column::ReactionCount,
            Expr::col(Column::ReactionCount).add(1),
        )
        .filter(Column::Id.eq(id))
        .exec_with_returning(db)
        .await?;

    updated
        .into_iter()
        .next()
        .map(|message| message.reaction_count)
        .ok_or_else(Error::not_found)
}

/// Removes one reaction and returns the new total. A message without
/// reactions is left untouched and reported as invalid.
pub async fn decrement_reactions(db: &DatabaseConnection, id: Id) -> Result<i64, Error> {
    let updated = Entity::update_many()
        .col_expr(
            Column::ReactionCount,
            Expr::col(Column::ReactionCount).sub(1),
        )
        .filter(Column::Id.eq(id))
        .filter(Column::ReactionCount.gt(0))
        .exec_with_returning(db)
        .await?;

    match updated.into_iter().next() {
        Some(message) => Ok(message.reaction_count),
        None => {
            // Distinguish a missing message from one with nothing to remove.
            find_by_id(db, id).await?;
            warn!("Message {id} has no reactions to remove");
            Err(Error::invalid())
        }
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn message_model(reaction_count: i64) -> Model {
        Model {
            id: Id::new_v4(),
            room_id: Id::new_v4(),
            message: "How does Pin work?".to_owned(),
            reaction_count,
            answered: false,
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_message_model() -> Result<(), Error> {
        let message_model = message_model(0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![message_model.clone()]])
            .into_connection();

        let message = create(&db, message_model.room_id, message_model.message.clone()).await?;

        assert_eq!(message, message_model);

        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_empty_message() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = create(&db, Id::new_v4(), "\n".to_owned()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::ValidationError
        );
    }

    #[tokio::test]
    async fn mark_as_answered_returns_the_answered_message() -> Result<(), Error> {
        let message_model = message_model(2);
        let answered_model = Model {
            answered: true,
            ..message_model.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![answered_model]])
            .into_connection();

        let message = mark_as_answered(&db, message_model).await?;

        assert!(message.answered);

        Ok(())
    }

    #[tokio::test]
    async fn mark_as_answered_returns_error_when_message_was_deleted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = mark_as_answered(&db, message_model(0)).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn increment_reactions_returns_new_total() -> Result<(), Error> {
        let incremented = message_model(4);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![incremented.clone()]])
            .into_connection();

        assert_eq!(increment_reactions(&db, incremented.id).await?, 4);

        Ok(())
    }

    #[tokio::test]
    async fn increment_reactions_returns_error_when_message_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = increment_reactions(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn decrement_reactions_returns_new_total() -> Result<(), Error> {
        let decremented = message_model(1);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![decremented.clone()]])
            .into_connection();

        assert_eq!(decrement_reactions(&db, decremented.id).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn decrement_reactions_never_goes_below_zero() {
        let untouched = message_model(0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new(), vec![untouched.clone()]])
            .into_connection();

        let result = decrement_reactions(&db, untouched.id).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::ValidationError
        );
    }

    #[tokio::test]
    async fn decrement_reactions_returns_error_when_message_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new(), Vec::<Model>::new()])
            .into_connection();

        let result = decrement_reactions(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
