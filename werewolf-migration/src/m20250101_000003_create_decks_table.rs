use sea_orm_migration::prelude::*;
use crate::m20250101_000001_create_users_table::Users;
use crate::m20250101_000002_create_roles_table::Roles;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250101_000003_create_decks_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Decks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Decks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Decks::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Decks::CreatedBy).integer().not_null())
                    .col(ColumnDef::new(Decks::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Decks::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_decks_created_by")
                            .from(Decks::Table, Decks::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeckRoles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeckRoles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeckRoles::DeckId).integer().not_null())
                    .col(ColumnDef::new(DeckRoles::RoleId).integer().not_null())
                    .col(ColumnDef::new(DeckRoles::Quantity).integer().not_null().default(1))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deck_roles_deck_id")
                            .from(DeckRoles::Table, DeckRoles::DeckId)
                            .to(Decks::Table, Decks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deck_roles_role_id")
                            .from(DeckRoles::Table, DeckRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeckRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Decks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Decks {
    Table,
    Id,
    Name,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DeckRoles {
    Table,
    Id,
    DeckId,
    RoleId,
    Quantity,
}
