use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ThemeSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ThemeSettings::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ThemeSettings::ThemeMode)
                            .string()
                            .not_null()
                            .default("Light"),
                    )
                    .col(ColumnDef::new(ThemeSettings::PrimaryColor).string().not_null())
                    .col(
                        ColumnDef::new(ThemeSettings::SecondaryColor)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ThemeSettings::SuccessColor).string().not_null())
                    .col(ColumnDef::new(ThemeSettings::DangerColor).string().not_null())
                    .col(ColumnDef::new(ThemeSettings::WarningColor).string().not_null())
                    .col(ColumnDef::new(ThemeSettings::InfoColor).string().not_null())
                    .col(
                        ColumnDef::new(ThemeSettings::BackgroundColor)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ThemeSettings::TextColor).string().not_null())
                    .col(
                        ColumnDef::new(ThemeSettings::CardBackgroundColor)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ThemeSettings::NavbarBackgroundColor)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ThemeSettings::SidebarBackgroundColor)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ThemeSettings::FooterBackgroundColor)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ThemeSettings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ThemeSettings::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(ThemeSettings::UpdatedBy).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ThemeSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ThemeSettings {
    Table,
    Id,
    ThemeMode,
    PrimaryColor,
    SecondaryColor,
    SuccessColor,
    DangerColor,
    WarningColor,
    InfoColor,
    BackgroundColor,
    TextColor,
    CardBackgroundColor,
    NavbarBackgroundColor,
    SidebarBackgroundColor,
    FooterBackgroundColor,
    IsActive,
    UpdatedAt,
    UpdatedBy,
}
