use crate::error::Error;
use crate::rooms::Model;
use crate::Id;
use sea_orm::DatabaseConnection;

pub use entity_api::room::{create, find_all};

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Ok(entity_api::room::find_by_id(db, id).await?)
}
