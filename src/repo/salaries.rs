use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    entities::{departments, employees, salaries, users},
    state::DatabaseClient,
};

#[derive(Debug, Serialize, FromQueryResult, ToSchema)]
pub struct SalaryWithDetails {
    pub id: i64,
    pub employee_id: i64,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub net_salary: f64,
    pub pay_date: NaiveDate,
    pub employee_code: String,
    pub employee_status: String,
    pub name: String,
    pub email: String,
    pub department_name: String,
}

fn with_details() -> Select<salaries::Entity> {
    salaries::Entity::find()
        .join(JoinType::InnerJoin, salaries::Relation::Employee.def())
        .join(JoinType::InnerJoin, employees::Relation::User.def())
        .join(JoinType::InnerJoin, employees::Relation::Department.def())
        .select_only()
        .column(salaries::Column::Id)
        .column(salaries::Column::EmployeeId)
        .column(salaries::Column::BasicSalary)
        .column(salaries::Column::Allowances)
        .column(salaries::Column::Deductions)
        .column(salaries::Column::NetSalary)
        .column(salaries::Column::PayDate)
        .column_as(employees::Column::EmployeeCode, "employee_code")
        .column_as(employees::Column::Status, "employee_status")
        .column_as(users::Column::Name, "name")
        .column_as(users::Column::Email, "email")
        .column_as(departments::Column::Name, "department_name")
}

#[async_trait]
pub trait SalariesRepo: Send + Sync {
    async fn insert(
        &self,
        model: salaries::ActiveModel,
    ) -> Result<salaries::Model, sea_orm::DbErr>;
    async fn find_by_id(&self, id: i64) -> Result<Option<salaries::Model>, sea_orm::DbErr>;
    async fn find_by_id_with_details(
        &self,
        id: i64,
    ) -> Result<Option<SalaryWithDetails>, sea_orm::DbErr>;
    async fn find_active_with_details(&self) -> Result<Vec<SalaryWithDetails>, sea_orm::DbErr>;
    async fn find_by_employee_with_details(
        &self,
        employee_id: i64,
    ) -> Result<Vec<SalaryWithDetails>, sea_orm::DbErr>;
    async fn update(
        &self,
        model: salaries::ActiveModel,
    ) -> Result<salaries::Model, sea_orm::DbErr>;
    async fn delete_by_id(&self, id: i64) -> Result<u64, sea_orm::DbErr>;
    async fn delete_by_employee_with_txn(
        &self,
        txn: &DatabaseTransaction,
        employee_id: i64,
    ) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmSalariesRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmSalariesRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SalariesRepo for SeaOrmSalariesRepo {
    async fn insert(
        &self,
        model: salaries::ActiveModel,
    ) -> Result<salaries::Model, sea_orm::DbErr> {
        model.insert(self.db.conn()).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<salaries::Model>, sea_orm::DbErr> {
        salaries::Entity::find_by_id(id).one(self.db.conn()).await
    }

    async fn find_by_id_with_details(
        &self,
        id: i64,
    ) -> Result<Option<SalaryWithDetails>, sea_orm::DbErr> {
        with_details()
            .filter(salaries::Column::Id.eq(id))
            .into_model::<SalaryWithDetails>()
            .one(self.db.conn())
            .await
    }

    async fn find_active_with_details(&self) -> Result<Vec<SalaryWithDetails>, sea_orm::DbErr> {
        with_details()
            .filter(employees::Column::Status.ne("resigned"))
            .order_by_desc(salaries::Column::PayDate)
            .into_model::<SalaryWithDetails>()
            .all(self.db.conn())
            .await
    }

    async fn find_by_employee_with_details(
        &self,
        employee_id: i64,
    ) -> Result<Vec<SalaryWithDetails>, sea_orm::DbErr> {
        with_details()
            .filter(salaries::Column::EmployeeId.eq(employee_id))
            .order_by_desc(salaries::Column::PayDate)
            .into_model::<SalaryWithDetails>()
            .all(self.db.conn())
            .await
    }

    async fn update(
        &self,
        model: salaries::ActiveModel,
    ) -> Result<salaries::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, sea_orm::DbErr> {
        let result = salaries::Entity::delete_by_id(id)
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_by_employee_with_txn(
        &self,
        txn: &DatabaseTransaction,
        employee_id: i64,
    ) -> Result<u64, sea_orm::DbErr> {
        let result = salaries::Entity::delete_many()
            .filter(salaries::Column::EmployeeId.eq(employee_id))
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}
