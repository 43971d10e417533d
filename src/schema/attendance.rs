use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use sea_orm_migration::prelude::*;

pub async fn apply(manager: &SchemaManager<'_>, conn: &DatabaseConnection) -> Result<(), DbErr> {
    if !manager.has_table("attendance").await? {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Attendance::EmployeeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(ColumnDef::new(Attendance::Status).string().not_null())
                    .col(
                        ColumnDef::new(Attendance::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .col(
                        ColumnDef::new(Attendance::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .to_owned(),
            )
            .await?;

        // Deliberately not unique: one row per (employee, day) is maintained
        // by read-before-write in the attendance service.
        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            "CREATE INDEX IF NOT EXISTS attendance_employee_date_idx \
             ON attendance (employee_id, date)"
                .to_string(),
        ))
        .await?;
    }

    Ok(())
}

#[derive(Iden)]
enum Attendance {
    Table,
    Id,
    EmployeeId,
    Date,
    Status,
    CreatedAt,
    UpdatedAt,
}
