use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string_null(Users::WalletAddress).unique_key())
                    .col(string_len(Users::UserType, 20))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create energy_offers table
        manager
            .create_table(
                Table::create()
                    .table(EnergyOffers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnergyOffers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(EnergyOffers::SellerId))
                    .col(decimal_len(EnergyOffers::EnergyAmount, 10, 2))
                    .col(decimal_len(EnergyOffers::PricePerKwh, 10, 6))
                    .col(string_len(EnergyOffers::EnergyType, 20))
                    .col(string_null(EnergyOffers::Location))
                    .col(boolean(EnergyOffers::IsActive).default(true))
                    .col(timestamp_with_time_zone(EnergyOffers::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_energy_offers_seller")
                            .from(EnergyOffers::Table, EnergyOffers::SellerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing reads filter on is_active and sort by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_energy_offers_active_created")
                    .table(EnergyOffers::Table)
                    .col(EnergyOffers::IsActive)
                    .col(EnergyOffers::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Create energy_transactions table
        manager
            .create_table(
                Table::create()
                    .table(EnergyTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnergyTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(EnergyTransactions::OfferId))
                    .col(string(EnergyTransactions::BuyerId))
                    .col(string(EnergyTransactions::SellerId))
                    .col(decimal_len(EnergyTransactions::EnergyAmount, 10, 2))
                    .col(decimal_len(EnergyTransactions::TotalPrice, 10, 6))
                    .col(string_null(EnergyTransactions::TransactionHash))
                    .col(integer_null(EnergyTransactions::BlockNumber))
                    .col(string_len(EnergyTransactions::Status, 20))
                    .col(timestamp_with_time_zone(EnergyTransactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_energy_transactions_offer")
                            .from(EnergyTransactions::Table, EnergyTransactions::OfferId)
                            .to(EnergyOffers::Table, EnergyOffers::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_energy_transactions_buyer")
                            .from(EnergyTransactions::Table, EnergyTransactions::BuyerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_energy_transactions_seller")
                            .from(EnergyTransactions::Table, EnergyTransactions::SellerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Transaction history is queried by buyer or seller
        manager
            .create_index(
                Index::create()
                    .name("idx_energy_transactions_buyer")
                    .table(EnergyTransactions::Table)
                    .col(EnergyTransactions::BuyerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_energy_transactions_seller")
                    .table(EnergyTransactions::Table)
                    .col(EnergyTransactions::SellerId)
                    .to_owned(),
            )
            .await?;

        // Create energy_generation table
        manager
            .create_table(
                Table::create()
                    .table(EnergyGeneration::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnergyGeneration::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(EnergyGeneration::UserId))
                    .col(decimal_len(EnergyGeneration::CurrentOutput, 8, 2))
                    .col(decimal_len(EnergyGeneration::DailyGeneration, 10, 2))
                    .col(decimal_len(EnergyGeneration::AvailableToSell, 10, 2))
                    .col(string_len(EnergyGeneration::EnergyType, 20))
                    .col(timestamp_with_time_zone(EnergyGeneration::LastUpdated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_energy_generation_user")
                            .from(EnergyGeneration::Table, EnergyGeneration::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_energy_generation_user")
                    .table(EnergyGeneration::Table)
                    .col(EnergyGeneration::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(EnergyGeneration::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EnergyTransactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EnergyOffers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    WalletAddress,
    UserType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EnergyOffers {
    Table,
    Id,
    SellerId,
    EnergyAmount,
    PricePerKwh,
    EnergyType,
    Location,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EnergyTransactions {
    Table,
    Id,
    OfferId,
    BuyerId,
    SellerId,
    EnergyAmount,
    TotalPrice,
    TransactionHash,
    BlockNumber,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EnergyGeneration {
    Table,
    Id,
    UserId,
    CurrentOutput,
    DailyGeneration,
    AvailableToSell,
    EnergyType,
    LastUpdated,
}
