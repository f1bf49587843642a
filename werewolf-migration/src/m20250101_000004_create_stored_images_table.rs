use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250101_000004_create_stored_images_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 内容摘要 -> 文件名 的持久索引，主键保证每个摘要只有一个文件
        manager
            .create_table(
                Table::create()
                    .table(StoredImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StoredImages::Hash)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StoredImages::FileName)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(StoredImages::Size).big_integer().not_null())
                    .col(ColumnDef::new(StoredImages::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StoredImages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StoredImages {
    Table,
    Hash,
    FileName,
    Size,
    CreatedAt,
}
