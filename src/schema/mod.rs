use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use sea_orm_migration::prelude::*;

mod attendance;
mod departments;
mod employees;
mod leaves;
mod salaries;
mod users;

pub async fn apply(conn: &DatabaseConnection) -> Result<(), DbErr> {
    let manager = SchemaManager::new(conn);

    users::apply(&manager, conn).await?;
    departments::apply(&manager, conn).await?;
    employees::apply(&manager, conn).await?;
    leaves::apply(&manager, conn).await?;
    salaries::apply(&manager, conn).await?;
    attendance::apply(&manager, conn).await?;
    apply_updated_at_triggers(conn).await?;

    Ok(())
}

async fn apply_updated_at_triggers(conn: &DatabaseConnection) -> Result<(), DbErr> {
    conn.execute(Statement::from_string(
        DbBackend::Postgres,
        r#"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS trigger AS $$
BEGIN
  NEW.updated_at = now();
  RETURN NEW;
END;
$$ LANGUAGE plpgsql;
"#
        .to_string(),
    ))
    .await?;

    for table in [
        "users",
        "departments",
        "employees",
        "leaves",
        "salaries",
        "attendance",
    ] {
        let trigger_name = format!("trg_{}_set_updated_at", table);
        conn.execute(Statement::from_string(
            DbBackend::Postgres,
            format!(
                r#"
DO $$
BEGIN
  IF NOT EXISTS (
    SELECT 1
    FROM pg_trigger
    WHERE tgname = '{trigger_name}'
      AND tgrelid = '{table}'::regclass
  ) THEN
    EXECUTE 'CREATE TRIGGER {trigger_name}
             BEFORE UPDATE ON {table}
             FOR EACH ROW
             EXECUTE FUNCTION set_updated_at()';
  END IF;
END $$;
"#
            ),
        ))
        .await?;
    }

    Ok(())
}
