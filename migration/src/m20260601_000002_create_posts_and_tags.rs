use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Posts
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Posts::Title).text().not_null())
                    .col(ColumnDef::new(Posts::Slug).text().not_null())
                    .col(ColumnDef::new(Posts::Body).text().not_null())
                    .col(ColumnDef::new(Posts::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Posts::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_user_id")
                            .from(Posts::Table, Posts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Slug lookups are frequent but slugs are NOT unique; plain index only.
        manager
            .create_index(Index::create().name("idx_posts_slug").table(Posts::Table).col(Posts::Slug).to_owned())
            .await?;
        manager
            .create_index(Index::create().name("idx_posts_created_at").table(Posts::Table).col(Posts::CreatedAt).to_owned())
            .await?;

        // 2. Tags
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tags::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Tags::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Tags::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // 3. TagsPosts (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(TagsPosts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TagsPosts::TagId).big_integer().not_null())
                    .col(ColumnDef::new(TagsPosts::PostId).big_integer().not_null())
                    .primary_key(Index::create().col(TagsPosts::TagId).col(TagsPosts::PostId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tags_posts_tag_id")
                            .from(TagsPosts::Table, TagsPosts::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tags_posts_post_id")
                            .from(TagsPosts::Table, TagsPosts::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TagsPosts::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Tags::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Posts::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Posts {
    Table,
    Id,
    Title,
    Slug,
    Body,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum TagsPosts {
    Table,
    TagId,
    PostId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
