use async_trait::async_trait;
use std::sync::Arc;

use crate::{entities::departments, error::ServiceError, repo::departments::DepartmentsRepo};

pub struct DepartmentInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[async_trait]
pub trait DepartmentsService: Send + Sync {
    async fn create(&self, input: DepartmentInput) -> Result<departments::Model, ServiceError>;
    async fn list(&self) -> Result<Vec<departments::Model>, ServiceError>;
    async fn get(&self, id: i64) -> Result<departments::Model, ServiceError>;
    async fn update(
        &self,
        id: i64,
        input: DepartmentInput,
    ) -> Result<departments::Model, ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

pub struct DepartmentsServiceImpl {
    departments_repo: Arc<dyn DepartmentsRepo>,
}

impl DepartmentsServiceImpl {
    pub fn new(departments_repo: Arc<dyn DepartmentsRepo>) -> Self {
        Self { departments_repo }
    }
}

fn required_name(input: &DepartmentInput) -> Result<String, ServiceError> {
    match input.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ServiceError::invalid("Department name is required")),
    }
}

#[async_trait]
impl DepartmentsService for DepartmentsServiceImpl {
    async fn create(&self, input: DepartmentInput) -> Result<departments::Model, ServiceError> {
        let name = required_name(&input)?;
        let model = departments::ActiveModel {
            name: sea_orm::Set(name),
            description: sea_orm::Set(input.description),
            ..Default::default()
        };
        Ok(self.departments_repo.insert(model).await?)
    }

    async fn list(&self) -> Result<Vec<departments::Model>, ServiceError> {
        Ok(self.departments_repo.find_all().await?)
    }

    async fn get(&self, id: i64) -> Result<departments::Model, ServiceError> {
        self.departments_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department not found"))
    }

    async fn update(
        &self,
        id: i64,
        input: DepartmentInput,
    ) -> Result<departments::Model, ServiceError> {
        let name = required_name(&input)?;
        let Some(model) = self.departments_repo.find_by_id(id).await? else {
            return Err(ServiceError::not_found("Department not found"));
        };

        let mut active: departments::ActiveModel = model.into();
        active.name = sea_orm::Set(name);
        active.description = sea_orm::Set(input.description);
        Ok(self.departments_repo.update(active).await?)
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self.departments_repo.delete_by_id(id).await?;
        if deleted == 0 {
            return Err(ServiceError::not_found("Department not found"));
        }
        Ok(())
    }
}
