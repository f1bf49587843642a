use sea_orm_migration::prelude::*;
use crate::m20250101_000001_create_users_table::Users;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250101_000002_create_roles_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Roles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Roles::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Roles::Description).text().null())
                    .col(ColumnDef::new(Roles::Team).string_len(20).not_null())
                    .col(ColumnDef::new(Roles::Score).integer().not_null())
                    .col(ColumnDef::new(Roles::ImageUrl).string_len(500).null())
                    .col(ColumnDef::new(Roles::ImageHash).string_len(64).null())
                    .col(ColumnDef::new(Roles::IsOfficial).boolean().not_null().default(false))
                    .col(ColumnDef::new(Roles::CreatedBy).integer().null())
                    .col(ColumnDef::new(Roles::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roles_created_by")
                            .from(Roles::Table, Roles::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 重复检测与引用检查都按这两列查询
        manager
            .create_index(
                Index::create()
                    .name("idx_roles_image_hash")
                    .table(Roles::Table)
                    .col(Roles::ImageHash)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_roles_image_url")
                    .table(Roles::Table)
                    .col(Roles::ImageUrl)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Roles {
    Table,
    Id,
    Name,
    Description,
    Team,
    Score,
    ImageUrl,
    ImageHash,
    IsOfficial,
    CreatedBy,
    CreatedAt,
}
