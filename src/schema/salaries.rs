use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use sea_orm_migration::prelude::*;

pub async fn apply(manager: &SchemaManager<'_>, conn: &DatabaseConnection) -> Result<(), DbErr> {
    if !manager.has_table("salaries").await? {
        manager
            .create_table(
                Table::create()
                    .table(Salaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Salaries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Salaries::EmployeeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Salaries::BasicSalary).double().not_null())
                    .col(
                        ColumnDef::new(Salaries::Allowances)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Salaries::Deductions)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Salaries::NetSalary).double().not_null())
                    .col(ColumnDef::new(Salaries::PayDate).date().not_null())
                    .col(
                        ColumnDef::new(Salaries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .col(
                        ColumnDef::new(Salaries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .to_owned(),
            )
            .await?;

        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            "CREATE INDEX IF NOT EXISTS salaries_employee_id_idx \
             ON salaries (employee_id)"
                .to_string(),
        ))
        .await?;
    }

    Ok(())
}

#[derive(Iden)]
enum Salaries {
    Table,
    Id,
    EmployeeId,
    BasicSalary,
    Allowances,
    Deductions,
    NetSalary,
    PayDate,
    CreatedAt,
    UpdatedAt,
}
