use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BmiRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BmiRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(double(BmiRecords::Height))
                    .col(double(BmiRecords::Weight))
                    .col(double(BmiRecords::Value))
                    .col(
                        timestamp_with_time_zone(BmiRecords::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bmi_records_created_at")
                    .table(BmiRecords::Table)
                    .col(BmiRecords::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BmiRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BmiRecords {
    Table,
    Id,
    Height,
    Weight,
    Value,
    CreatedAt,
}
