//! SeaORM Entity for the messages table.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::messages::Model)]
#[sea_orm(schema_name = "ama_rooms", table_name = "messages")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,

    #[serde(skip_deserializing)]
    pub room_id: Id,

    /// The question asked in the room
    #[sea_orm(column_type = "Text")]
    pub message: String,

    /// Net number of reactions, never negative
    #[serde(skip_deserializing)]
    pub reaction_count: i64,

    #[serde(skip_deserializing)]
    pub answered: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Rooms,
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
