use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    entities::{departments, employees, leaves, users},
    state::DatabaseClient,
};

#[derive(Debug, Serialize, FromQueryResult, ToSchema)]
pub struct LeaveWithDetails {
    pub id: i64,
    pub employee_id: i64,
    pub leave_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub description: String,
    pub status: String,
    pub applied_date: DateTime<FixedOffset>,
    pub approved_by: Option<i64>,
    pub approved_date: Option<DateTime<FixedOffset>>,
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub department_name: String,
}

fn with_details() -> Select<leaves::Entity> {
    leaves::Entity::find()
        .join(JoinType::InnerJoin, leaves::Relation::Employee.def())
        .join(JoinType::InnerJoin, employees::Relation::User.def())
        .join(JoinType::InnerJoin, employees::Relation::Department.def())
        .select_only()
        .column(leaves::Column::Id)
        .column(leaves::Column::EmployeeId)
        .column(leaves::Column::LeaveType)
        .column(leaves::Column::FromDate)
        .column(leaves::Column::ToDate)
        .column(leaves::Column::Description)
        .column(leaves::Column::Status)
        .column(leaves::Column::AppliedDate)
        .column(leaves::Column::ApprovedBy)
        .column(leaves::Column::ApprovedDate)
        .column_as(employees::Column::EmployeeCode, "employee_code")
        .column_as(users::Column::Name, "name")
        .column_as(users::Column::Email, "email")
        .column_as(users::Column::ProfileImage, "profile_image")
        .column_as(departments::Column::Name, "department_name")
}

#[async_trait]
pub trait LeavesRepo: Send + Sync {
    async fn insert(&self, model: leaves::ActiveModel)
        -> Result<leaves::Model, sea_orm::DbErr>;
    async fn find_by_id(&self, id: i64) -> Result<Option<leaves::Model>, sea_orm::DbErr>;
    async fn find_by_id_with_details(
        &self,
        id: i64,
    ) -> Result<Option<LeaveWithDetails>, sea_orm::DbErr>;
    async fn find_all_with_details(&self) -> Result<Vec<LeaveWithDetails>, sea_orm::DbErr>;
    async fn find_by_employee_with_details(
        &self,
        employee_id: i64,
    ) -> Result<Vec<LeaveWithDetails>, sea_orm::DbErr>;
    async fn update(&self, model: leaves::ActiveModel)
        -> Result<leaves::Model, sea_orm::DbErr>;
    async fn delete_by_id(&self, id: i64) -> Result<u64, sea_orm::DbErr>;
    async fn delete_by_employee_with_txn(
        &self,
        txn: &DatabaseTransaction,
        employee_id: i64,
    ) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmLeavesRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmLeavesRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LeavesRepo for SeaOrmLeavesRepo {
    async fn insert(
        &self,
        model: leaves::ActiveModel,
    ) -> Result<leaves::Model, sea_orm::DbErr> {
        model.insert(self.db.conn()).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<leaves::Model>, sea_orm::DbErr> {
        leaves::Entity::find_by_id(id).one(self.db.conn()).await
    }

    async fn find_by_id_with_details(
        &self,
        id: i64,
    ) -> Result<Option<LeaveWithDetails>, sea_orm::DbErr> {
        with_details()
            .filter(leaves::Column::Id.eq(id))
            .into_model::<LeaveWithDetails>()
            .one(self.db.conn())
            .await
    }

    async fn find_all_with_details(&self) -> Result<Vec<LeaveWithDetails>, sea_orm::DbErr> {
        with_details()
            .order_by_desc(leaves::Column::AppliedDate)
            .into_model::<LeaveWithDetails>()
            .all(self.db.conn())
            .await
    }

    async fn find_by_employee_with_details(
        &self,
        employee_id: i64,
    ) -> Result<Vec<LeaveWithDetails>, sea_orm::DbErr> {
        with_details()
            .filter(leaves::Column::EmployeeId.eq(employee_id))
            .order_by_desc(leaves::Column::AppliedDate)
            .into_model::<LeaveWithDetails>()
            .all(self.db.conn())
            .await
    }

    async fn update(
        &self,
        model: leaves::ActiveModel,
    ) -> Result<leaves::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, sea_orm::DbErr> {
        let result = leaves::Entity::delete_by_id(id).exec(self.db.conn()).await?;
        Ok(result.rows_affected)
    }

    async fn delete_by_employee_with_txn(
        &self,
        txn: &DatabaseTransaction,
        employee_id: i64,
    ) -> Result<u64, sea_orm::DbErr> {
        let result = leaves::Entity::delete_many()
            .filter(leaves::Column::EmployeeId.eq(employee_id))
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}
