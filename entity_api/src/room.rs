use super::error::Error;
use entity::rooms::{ActiveModel, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection};

use log::*;

pub async fn create(db: &DatabaseConnection, theme: String) -> Result<Model, Error> {
    let theme = theme.trim().to_owned();
    if theme.is_empty() {
        warn!("Refusing to create a room without a theme");
        return Err(Error::invalid());
    }

    let room_active_model = ActiveModel {
        id: Set(Id::new_v4()),
        theme: Set(theme),
    };

    debug!("New Room to be inserted: {room_active_model:?}");

    Ok(room_active_model.insert(db).await?)
}

pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().all(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}
