use sea_orm_migration::prelude::*;

use crate::{m20260301_000001_users::Users, m20260301_000002_groups::Groups};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Shifts {
    Table,
    Id,
    GroupId,
    StartAt,
    EndAt,
}

#[derive(Iden)]
enum ShiftAssignments {
    Table,
    ShiftId,
    UserId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shifts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shifts::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Shifts::GroupId).string().not_null())
                    .col(ColumnDef::new(Shifts::StartAt).timestamp().not_null())
                    .col(ColumnDef::new(Shifts::EndAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-shifts-group_id")
                            .from(Shifts::Table, Shifts::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-shifts-group_id-start_at")
                    .table(Shifts::Table)
                    .col(Shifts::GroupId)
                    .col(Shifts::StartAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ShiftAssignments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ShiftAssignments::ShiftId).string().not_null())
                    .col(ColumnDef::new(ShiftAssignments::UserId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(ShiftAssignments::ShiftId)
                            .col(ShiftAssignments::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-shift_assignments-shift_id")
                            .from(ShiftAssignments::Table, ShiftAssignments::ShiftId)
                            .to(Shifts::Table, Shifts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-shift_assignments-user_id")
                            .from(ShiftAssignments::Table, ShiftAssignments::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-shift_assignments-user_id")
                    .table(ShiftAssignments::Table)
                    .col(ShiftAssignments::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShiftAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shifts::Table).to_owned())
            .await?;
        Ok(())
    }
}
