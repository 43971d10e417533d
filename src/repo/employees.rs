use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    entities::{departments, employees, users},
    state::DatabaseClient,
};

/// Employee row composed with its owning account and department at query
/// time. Replaces the lazy reference resolution of typical document stores
/// with one explicit join.
#[derive(Debug, Serialize, FromQueryResult, ToSchema)]
pub struct EmployeeWithDetails {
    pub id: i64,
    pub user_id: i64,
    pub employee_code: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub designation: Option<String>,
    pub department_id: i64,
    pub salary: Option<f64>,
    pub status: String,
    pub name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub role: String,
    pub department_name: String,
}

fn with_details() -> Select<employees::Entity> {
    employees::Entity::find()
        .join(JoinType::InnerJoin, employees::Relation::User.def())
        .join(JoinType::InnerJoin, employees::Relation::Department.def())
        .select_only()
        .column(employees::Column::Id)
        .column(employees::Column::UserId)
        .column(employees::Column::EmployeeCode)
        .column(employees::Column::Dob)
        .column(employees::Column::Gender)
        .column(employees::Column::MaritalStatus)
        .column(employees::Column::Designation)
        .column(employees::Column::DepartmentId)
        .column(employees::Column::Salary)
        .column(employees::Column::Status)
        .column_as(users::Column::Name, "name")
        .column_as(users::Column::Email, "email")
        .column_as(users::Column::ProfileImage, "profile_image")
        .column_as(users::Column::Role, "role")
        .column_as(departments::Column::Name, "department_name")
}

#[async_trait]
pub trait EmployeesRepo: Send + Sync {
    async fn insert_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: employees::ActiveModel,
    ) -> Result<employees::Model, sea_orm::DbErr>;
    async fn find_by_id(&self, id: i64) -> Result<Option<employees::Model>, sea_orm::DbErr>;
    async fn find_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<employees::Model>, sea_orm::DbErr>;
    async fn find_active_with_details(&self)
        -> Result<Vec<EmployeeWithDetails>, sea_orm::DbErr>;
    async fn find_by_id_with_details(
        &self,
        id: i64,
    ) -> Result<Option<EmployeeWithDetails>, sea_orm::DbErr>;
    async fn update(
        &self,
        model: employees::ActiveModel,
    ) -> Result<employees::Model, sea_orm::DbErr>;
    async fn delete_by_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmEmployeesRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmEmployeesRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeesRepo for SeaOrmEmployeesRepo {
    async fn insert_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: employees::ActiveModel,
    ) -> Result<employees::Model, sea_orm::DbErr> {
        model.insert(txn).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<employees::Model>, sea_orm::DbErr> {
        employees::Entity::find_by_id(id).one(self.db.conn()).await
    }

    async fn find_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<employees::Model>, sea_orm::DbErr> {
        employees::Entity::find()
            .filter(employees::Column::UserId.eq(user_id))
            .one(self.db.conn())
            .await
    }

    async fn find_active_with_details(
        &self,
    ) -> Result<Vec<EmployeeWithDetails>, sea_orm::DbErr> {
        with_details()
            .filter(employees::Column::Status.ne("resigned"))
            .order_by_asc(employees::Column::EmployeeCode)
            .into_model::<EmployeeWithDetails>()
            .all(self.db.conn())
            .await
    }

    async fn find_by_id_with_details(
        &self,
        id: i64,
    ) -> Result<Option<EmployeeWithDetails>, sea_orm::DbErr> {
        with_details()
            .filter(employees::Column::Id.eq(id))
            .into_model::<EmployeeWithDetails>()
            .one(self.db.conn())
            .await
    }

    async fn update(
        &self,
        model: employees::ActiveModel,
    ) -> Result<employees::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn delete_by_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<u64, sea_orm::DbErr> {
        let result = employees::Entity::delete_by_id(id).exec(txn).await?;
        Ok(result.rows_affected)
    }
}
