use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    entities::{attendance, departments, employees, users},
    state::DatabaseClient,
};

#[derive(Debug, Serialize, FromQueryResult, ToSchema)]
pub struct AttendanceWithDetails {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub status: String,
    pub employee_code: String,
    pub name: String,
    pub department_name: String,
}

fn with_details() -> Select<attendance::Entity> {
    attendance::Entity::find()
        .join(JoinType::InnerJoin, attendance::Relation::Employee.def())
        .join(JoinType::InnerJoin, employees::Relation::User.def())
        .join(JoinType::InnerJoin, employees::Relation::Department.def())
        .select_only()
        .column(attendance::Column::Id)
        .column(attendance::Column::EmployeeId)
        .column(attendance::Column::Date)
        .column(attendance::Column::Status)
        .column_as(employees::Column::EmployeeCode, "employee_code")
        .column_as(users::Column::Name, "name")
        .column_as(departments::Column::Name, "department_name")
}

#[async_trait]
pub trait AttendanceRepo: Send + Sync {
    async fn insert(
        &self,
        model: attendance::ActiveModel,
    ) -> Result<attendance::Model, sea_orm::DbErr>;
    async fn update(
        &self,
        model: attendance::ActiveModel,
    ) -> Result<attendance::Model, sea_orm::DbErr>;
    async fn find_by_employee_and_date(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<Option<attendance::Model>, sea_orm::DbErr>;
    async fn find_range_with_details(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        employee_id: Option<i64>,
    ) -> Result<Vec<AttendanceWithDetails>, sea_orm::DbErr>;
    async fn find_by_date_with_details(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceWithDetails>, sea_orm::DbErr>;
    async fn delete_by_employee_with_txn(
        &self,
        txn: &DatabaseTransaction,
        employee_id: i64,
    ) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmAttendanceRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmAttendanceRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttendanceRepo for SeaOrmAttendanceRepo {
    async fn insert(
        &self,
        model: attendance::ActiveModel,
    ) -> Result<attendance::Model, sea_orm::DbErr> {
        model.insert(self.db.conn()).await
    }

    async fn update(
        &self,
        model: attendance::ActiveModel,
    ) -> Result<attendance::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn find_by_employee_and_date(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<Option<attendance::Model>, sea_orm::DbErr> {
        attendance::Entity::find()
            .filter(attendance::Column::EmployeeId.eq(employee_id))
            .filter(attendance::Column::Date.eq(date))
            .one(self.db.conn())
            .await
    }

    async fn find_range_with_details(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        employee_id: Option<i64>,
    ) -> Result<Vec<AttendanceWithDetails>, sea_orm::DbErr> {
        let mut query = with_details().filter(attendance::Column::Date.between(start, end));
        if let Some(employee_id) = employee_id {
            query = query.filter(attendance::Column::EmployeeId.eq(employee_id));
        }
        query
            .order_by_asc(attendance::Column::Date)
            .into_model::<AttendanceWithDetails>()
            .all(self.db.conn())
            .await
    }

    async fn find_by_date_with_details(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceWithDetails>, sea_orm::DbErr> {
        with_details()
            .filter(attendance::Column::Date.eq(date))
            .order_by_asc(employees::Column::EmployeeCode)
            .into_model::<AttendanceWithDetails>()
            .all(self.db.conn())
            .await
    }

    async fn delete_by_employee_with_txn(
        &self,
        txn: &DatabaseTransaction,
        employee_id: i64,
    ) -> Result<u64, sea_orm::DbErr> {
        let result = attendance::Entity::delete_many()
            .filter(attendance::Column::EmployeeId.eq(employee_id))
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}
