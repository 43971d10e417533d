use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, DatabaseTransaction, EntityTrait, QueryFilter,
};

use crate::{entities::users, state::DatabaseClient};

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn insert_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: users::ActiveModel,
    ) -> Result<users::Model, sea_orm::DbErr>;
    async fn insert(&self, model: users::ActiveModel) -> Result<users::Model, sea_orm::DbErr>;
    async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, sea_orm::DbErr>;
    async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, sea_orm::DbErr>;
    async fn update(&self, model: users::ActiveModel) -> Result<users::Model, sea_orm::DbErr>;
    async fn delete_by_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<u64, sea_orm::DbErr>;
}

pub struct SeaOrmUsersRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmUsersRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsersRepo for SeaOrmUsersRepo {
    async fn insert_with_txn(
        &self,
        txn: &DatabaseTransaction,
        model: users::ActiveModel,
    ) -> Result<users::Model, sea_orm::DbErr> {
        model.insert(txn).await
    }

    async fn insert(&self, model: users::ActiveModel) -> Result<users::Model, sea_orm::DbErr> {
        model.insert(self.db.conn()).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, sea_orm::DbErr> {
        users::Entity::find_by_id(id).one(self.db.conn()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, sea_orm::DbErr> {
        // Matches the partial unique index on lower(email).
        users::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(users::Column::Email)))
                    .eq(email.to_lowercase()),
            )
            .one(self.db.conn())
            .await
    }

    async fn update(&self, model: users::ActiveModel) -> Result<users::Model, sea_orm::DbErr> {
        model.update(self.db.conn()).await
    }

    async fn delete_by_id_with_txn(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<u64, sea_orm::DbErr> {
        let result = users::Entity::delete_by_id(id).exec(txn).await?;
        Ok(result.rows_affected)
    }
}
