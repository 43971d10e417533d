use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use sea_orm_migration::prelude::*;

pub async fn apply(manager: &SchemaManager<'_>, conn: &DatabaseConnection) -> Result<(), DbErr> {
    if !manager.has_table("leaves").await? {
        manager
            .create_table(
                Table::create()
                    .table(Leaves::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leaves::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Leaves::EmployeeId).big_integer().not_null())
                    .col(ColumnDef::new(Leaves::LeaveType).string().not_null())
                    .col(ColumnDef::new(Leaves::FromDate).date().not_null())
                    .col(ColumnDef::new(Leaves::ToDate).date().not_null())
                    .col(ColumnDef::new(Leaves::Description).string().not_null())
                    .col(
                        ColumnDef::new(Leaves::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Leaves::AppliedDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .col(ColumnDef::new(Leaves::ApprovedBy).big_integer())
                    .col(ColumnDef::new(Leaves::ApprovedDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Leaves::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .col(
                        ColumnDef::new(Leaves::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .to_owned(),
            )
            .await?;

        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            "ALTER TABLE leaves ADD CONSTRAINT leaves_leave_type_check \
             CHECK (leave_type IN ('sick','annual','casual'))"
                .to_string(),
        ))
        .await?;

        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            "ALTER TABLE leaves ADD CONSTRAINT leaves_status_check \
             CHECK (status IN ('pending','approved','rejected'))"
                .to_string(),
        ))
        .await?;

        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            "CREATE INDEX IF NOT EXISTS leaves_employee_id_idx \
             ON leaves (employee_id)"
                .to_string(),
        ))
        .await?;
    }

    Ok(())
}

#[derive(Iden)]
enum Leaves {
    Table,
    Id,
    EmployeeId,
    LeaveType,
    FromDate,
    ToDate,
    Description,
    Status,
    AppliedDate,
    ApprovedBy,
    ApprovedDate,
    CreatedAt,
    UpdatedAt,
}
