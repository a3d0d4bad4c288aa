use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS ama_rooms.rooms (
                    id    UUID PRIMARY KEY NOT NULL DEFAULT gen_random_uuid(),
                    theme TEXT NOT NULL
                );
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS ama_rooms.messages (
                    id             UUID PRIMARY KEY NOT NULL DEFAULT gen_random_uuid(),
                    room_id        UUID NOT NULL REFERENCES ama_rooms.rooms (id) ON DELETE CASCADE,
                    message        TEXT NOT NULL,
                    reaction_count BIGINT NOT NULL DEFAULT 0 CHECK (reaction_count >= 0),
                    answered       BOOLEAN NOT NULL DEFAULT FALSE
                );
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS messages_room_id_idx ON ama_rooms.messages (room_id);",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS ama_rooms.messages;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS ama_rooms.rooms;")
            .await?;

        Ok(())
    }
}
