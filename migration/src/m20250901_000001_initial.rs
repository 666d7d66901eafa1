use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum Customers {
    Table,
    Id,
    FullName,
    Semester,
    CreatedAt,
    UpdatedAt,
}

/// 促销奖品；weight 为相对权重（非百分比），只有 active 的参与抽奖
#[derive(DeriveIden)]
enum Promotions {
    Table,
    Id,
    Name,
    Description,
    Weight,
    Active,
    Color,
    Icon,
    CreatedAt,
    UpdatedAt,
}

/// 轮盘抽奖记录，只追加不修改
#[derive(DeriveIden)]
enum DrawRecords {
    Table,
    Id,
    CustomerId,
    PromotionId,
    PromotionName,
    DrawnAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Customers::Semester).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Customers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Promotions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Promotions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Promotions::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Promotions::Description).text().null())
                    .col(
                        ColumnDef::new(Promotions::Weight)
                            .double()
                            .not_null()
                            .default(10.0),
                    )
                    .col(
                        ColumnDef::new(Promotions::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Promotions::Color)
                            .string_len(7)
                            .not_null()
                            .default("#4B5563"),
                    )
                    .col(
                        ColumnDef::new(Promotions::Icon)
                            .string_len(16)
                            .not_null()
                            .default("🎁"),
                    )
                    .col(
                        ColumnDef::new(Promotions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Promotions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 外键在建表时声明（SQLite 不支持 ALTER TABLE ADD FOREIGN KEY）
        // 删除促销时记录保留，promotion_id 置空，promotion_name 留作历史快照
        manager
            .create_table(
                Table::create()
                    .table(DrawRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DrawRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DrawRecords::CustomerId).integer().not_null())
                    .col(ColumnDef::new(DrawRecords::PromotionId).integer().null())
                    .col(
                        ColumnDef::new(DrawRecords::PromotionName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DrawRecords::DrawnAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draw_records_customer")
                            .from(DrawRecords::Table, DrawRecords::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draw_records_promotion")
                            .from(DrawRecords::Table, DrawRecords::PromotionId)
                            .to(Promotions::Table, Promotions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draw_records_customer")
                    .table(DrawRecords::Table)
                    .col(DrawRecords::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draw_records_drawn_at")
                    .table(DrawRecords::Table)
                    .col(DrawRecords::DrawnAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：记录 -> 促销 -> 客户
        manager
            .drop_table(Table::drop().if_exists().table(DrawRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Promotions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Customers::Table).to_owned())
            .await?;
        Ok(())
    }
}
