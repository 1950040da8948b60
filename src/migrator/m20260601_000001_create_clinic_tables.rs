use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Owners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Owners::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Owners::Name).string().not_null())
                    .col(ColumnDef::new(Owners::Surname).string().not_null())
                    .col(
                        ColumnDef::new(Owners::Document)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Owners::Phone).string().not_null())
                    .col(ColumnDef::new(Owners::Email).string())
                    .col(ColumnDef::new(Owners::Address).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Pets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pets::Name).string().not_null())
                    .col(ColumnDef::new(Pets::Species).string().not_null())
                    .col(ColumnDef::new(Pets::Breed).string().not_null())
                    .col(ColumnDef::new(Pets::BirthDate).date().not_null())
                    .col(ColumnDef::new(Pets::Weight).double())
                    .col(ColumnDef::new(Pets::Notes).text())
                    .col(ColumnDef::new(Pets::OwnerId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pets_owner")
                            .from(Pets::Table, Pets::OwnerId)
                            .to(Owners::Table, Owners::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appointments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Appointments::Date).date().not_null())
                    .col(ColumnDef::new(Appointments::Time).time().not_null())
                    .col(ColumnDef::new(Appointments::Reason).string().not_null())
                    .col(
                        ColumnDef::new(Appointments::Status)
                            .string()
                            .not_null()
                            .default("Scheduled"),
                    )
                    .col(ColumnDef::new(Appointments::PetId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_pet")
                            .from(Appointments::Table, Appointments::PetId)
                            .to(Pets::Table, Pets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClinicalRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClinicalRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClinicalRecords::Date).date().not_null())
                    .col(ColumnDef::new(ClinicalRecords::Diagnosis).string().not_null())
                    .col(ColumnDef::new(ClinicalRecords::Treatment).text().not_null())
                    .col(ColumnDef::new(ClinicalRecords::Medications).string())
                    .col(
                        ColumnDef::new(ClinicalRecords::Veterinarian)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClinicalRecords::Observations).text())
                    .col(ColumnDef::new(ClinicalRecords::WeightAtVisit).double())
                    .col(ColumnDef::new(ClinicalRecords::PetId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clinical_records_pet")
                            .from(ClinicalRecords::Table, ClinicalRecords::PetId)
                            .to(Pets::Table, Pets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pets_owner_id")
                    .table(Pets::Table)
                    .col(Pets::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_pet_id")
                    .table(Appointments::Table)
                    .col(Appointments::PetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_date")
                    .table(Appointments::Table)
                    .col(Appointments::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clinical_records_pet_id")
                    .table(ClinicalRecords::Table)
                    .col(ClinicalRecords::PetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClinicalRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Owners::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Owners {
    Table,
    Id,
    Name,
    Surname,
    Document,
    Phone,
    Email,
    Address,
}

#[derive(DeriveIden)]
enum Pets {
    Table,
    Id,
    Name,
    Species,
    Breed,
    BirthDate,
    Weight,
    Notes,
    OwnerId,
}

#[derive(DeriveIden)]
enum Appointments {
    Table,
    Id,
    Date,
    Time,
    Reason,
    Status,
    PetId,
}

#[derive(DeriveIden)]
enum ClinicalRecords {
    Table,
    Id,
    Date,
    Diagnosis,
    Treatment,
    Medications,
    Veterinarian,
    Observations,
    WeightAtVisit,
    PetId,
}
