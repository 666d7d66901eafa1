use sea_orm_migration::prelude::*;

use super::m20250901_000001_initial::Customers as BaseCustomers;

#[derive(DeriveIden)]
enum Customers {
    Table,
    NationalId,
    PasswordHash,
    Points,
}

/// 积分流水 (正数为增加，负数为兑换扣减)
#[derive(DeriveIden)]
enum PointsMovements {
    Table,
    Id,
    CustomerId,
    Delta,
    Description,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 为客户增加身份证号 / 密码 / 积分余额，并新建积分流水表。
/// SQLite 每条 ALTER 只能带一个操作，因此逐列添加。
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Customers::Table)
                    .add_column(ColumnDef::new(Customers::NationalId).string_len(32).null())
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Customers::Table)
                    .add_column(
                        ColumnDef::new(Customers::PasswordHash)
                            .string_len(255)
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Customers::Table)
                    .add_column(
                        ColumnDef::new(Customers::Points)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引允许多个 NULL（未注册的客户没有身份证号）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customers_national_id_unique")
                    .table(Customers::Table)
                    .col(Customers::NationalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PointsMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PointsMovements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PointsMovements::CustomerId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PointsMovements::Delta).integer().not_null())
                    .col(
                        ColumnDef::new(PointsMovements::Description)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(PointsMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_points_movements_customer")
                            .from(PointsMovements::Table, PointsMovements::CustomerId)
                            .to(BaseCustomers::Table, BaseCustomers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_points_movements_customer")
                    .table(PointsMovements::Table)
                    .col(PointsMovements::CustomerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PointsMovements::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_customers_national_id_unique")
                    .table(Customers::Table)
                    .to_owned(),
            )
            .await?;
        for col in [Customers::Points, Customers::PasswordHash, Customers::NationalId] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Customers::Table)
                        .drop_column(col)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
