use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use sea_orm_migration::prelude::*;

pub async fn apply(manager: &SchemaManager<'_>, conn: &DatabaseConnection) -> Result<(), DbErr> {
    if !manager.has_table("employees").await? {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Employees::EmployeeCode).string().not_null())
                    .col(ColumnDef::new(Employees::Dob).date())
                    .col(ColumnDef::new(Employees::Gender).string())
                    .col(ColumnDef::new(Employees::MaritalStatus).string())
                    .col(ColumnDef::new(Employees::Designation).string())
                    .col(
                        ColumnDef::new(Employees::DepartmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employees::Salary).double())
                    .col(
                        ColumnDef::new(Employees::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .to_owned(),
            )
            .await?;

        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            "ALTER TABLE employees ADD CONSTRAINT employees_status_check \
             CHECK (status IN ('active','resigned'))"
                .to_string(),
        ))
        .await?;

        // One account owns one employee record.
        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            "CREATE UNIQUE INDEX IF NOT EXISTS employees_user_id_unique \
             ON employees (user_id)"
                .to_string(),
        ))
        .await?;

        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            "CREATE INDEX IF NOT EXISTS employees_department_id_idx \
             ON employees (department_id)"
                .to_string(),
        ))
        .await?;
    }

    Ok(())
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    UserId,
    EmployeeCode,
    Dob,
    Gender,
    MaritalStatus,
    Designation,
    DepartmentId,
    Salary,
    Status,
    CreatedAt,
    UpdatedAt,
}
