use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder};

use crate::{entities::departments, state::DatabaseClient};

#[async_trait]
pub trait DepartmentsRepo: Send + Sync {
    async fn insert(
        &self,
        model: departments::ActiveModel,
    ) -> Result<departments::Model, sea_orm::DbErr>;
    async fn find_all(&self) -> Result<Vec<departments::Model>, sea_orm::DbErr>;
    async fn find_by_id(&self, id: i64) -> Result<Option<departments::Model>, sea_orm::DbErr>;
    async fn update(
        &self,
        model: departments::ActiveModel,
    ) -> Result<departments::Model, sea_orm::DbErr>;
    async fn delete_by_id(&self, id: i64) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmDepartmentsRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmDepartmentsRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DepartmentsRepo for SeaOrmDepartmentsRepo {
    async fn insert(
        &self,
        model: departments::ActiveModel,
    ) -> Result<departments::Model, sea_orm::DbErr> {
        model.insert(self.db.conn()).await
    }

    async fn find_all(&self) -> Result<Vec<departments::Model>, sea_orm::DbErr> {
        departments::Entity::find()
            .order_by_asc(departments::Column::Name)
            .all(self.db.conn())
            .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<departments::Model>, sea_orm::DbErr> {
        departments::Entity::find_by_id(id).one(self.db.conn()).await
    }

    async fn update(
        &self,
        model: departments::ActiveModel,
    ) -> Result<departments::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, sea_orm::DbErr> {
        let result = departments::Entity::delete_by_id(id)
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected)
    }
}
