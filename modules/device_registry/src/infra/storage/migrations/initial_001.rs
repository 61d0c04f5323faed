use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Passports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Passports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Passports::Name).string().not_null())
                    .col(ColumnDef::new(Passports::Model).string().not_null())
                    .col(ColumnDef::new(Passports::SerialPrefix).string().not_null())
                    .col(ColumnDef::new(Passports::FromSerialNumber).big_integer().not_null())
                    .col(ColumnDef::new(Passports::ToSerialNumber).big_integer().not_null())
                    .col(ColumnDef::new(Passports::WarrantyMonths).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Resolution and overlap checks look passports up by prefix and range.
        manager
            .create_index(
                Index::create()
                    .name("idx_passports_prefix_range")
                    .table(Passports::Table)
                    .col(Passports::SerialPrefix)
                    .col(Passports::FromSerialNumber)
                    .col(Passports::ToSerialNumber)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Devices::SerialNumber)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Devices::PassportId).integer().not_null())
                    .col(ColumnDef::new(Devices::PurchaseDate).date().not_null())
                    .col(ColumnDef::new(Devices::OwnerId).uuid().null())
                    .col(ColumnDef::new(Devices::Comment).string().null())
                    .col(ColumnDef::new(Devices::WarrantyExpirationDate).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_devices_passport")
                            .from(Devices::Table, Devices::PassportId)
                            .to(Passports::Table, Passports::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_devices_passport")
                    .table(Devices::Table)
                    .col(Devices::PassportId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Renovations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Renovations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Renovations::SerialNumber).string().not_null())
                    .col(ColumnDef::new(Renovations::Description).string().not_null())
                    .col(ColumnDef::new(Renovations::RenovationDate).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_renovations_device")
                            .from(Renovations::Table, Renovations::SerialNumber)
                            .to(Devices::Table, Devices::SerialNumber)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_renovations_serial")
                    .table(Renovations::Table)
                    .col(Renovations::SerialNumber)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Renovations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Devices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Passports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Passports {
    Table,
    Id,
    Name,
    Model,
    SerialPrefix,
    FromSerialNumber,
    ToSerialNumber,
    WarrantyMonths,
}

#[derive(DeriveIden)]
enum Devices {
    Table,
    SerialNumber,
    PassportId,
    PurchaseDate,
    OwnerId,
    Comment,
    WarrantyExpirationDate,
}

#[derive(DeriveIden)]
enum Renovations {
    Table,
    Id,
    SerialNumber,
    Description,
    RenovationDate,
}
