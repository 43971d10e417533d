use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    entities::departments,
    error::ServiceError,
    handler::guard::{require_admin, AuthUser},
    service::departments::DepartmentInput,
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct DepartmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct DepartmentResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<departments::Model> for DepartmentResponse {
    fn from(model: departments::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DepartmentEnvelope {
    pub success: bool,
    pub department: DepartmentResponse,
}

#[derive(Serialize, ToSchema)]
pub struct DepartmentListEnvelope {
    pub success: bool,
    pub departments: Vec<DepartmentResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct DeletedEnvelope {
    pub success: bool,
}

#[utoipa::path(
    post,
    path = "/api/department",
    security(("bearer_auth" = [])),
    request_body = DepartmentRequest,
    responses(
        (status = 201, description = "Created", body = DepartmentEnvelope),
        (status = 400, description = "Name missing"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_department(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<DepartmentRequest>,
) -> Result<(StatusCode, Json<DepartmentEnvelope>), ServiceError> {
    require_admin(&caller)?;
    let department = state
        .departments()
        .create(DepartmentInput {
            name: payload.name,
            description: payload.description,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(DepartmentEnvelope {
            success: true,
            department: department.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/department",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All departments", body = DepartmentListEnvelope)
    )
)]
pub async fn list_departments(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
) -> Result<Json<DepartmentListEnvelope>, ServiceError> {
    let departments = state.departments().list().await?;
    Ok(Json(DepartmentListEnvelope {
        success: true,
        departments: departments.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/department/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department", body = DepartmentEnvelope),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_department(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DepartmentEnvelope>, ServiceError> {
    let department = state.departments().get(id).await?;
    Ok(Json(DepartmentEnvelope {
        success: true,
        department: department.into(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/department/{id}",
    security(("bearer_auth" = [])),
    request_body = DepartmentRequest,
    params(("id" = i64, Path, description = "Department id")),
    responses(
        (status = 200, description = "Updated", body = DepartmentEnvelope),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_department(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<DepartmentRequest>,
) -> Result<Json<DepartmentEnvelope>, ServiceError> {
    require_admin(&caller)?;
    let department = state
        .departments()
        .update(
            id,
            DepartmentInput {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;
    Ok(Json(DepartmentEnvelope {
        success: true,
        department: department.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/department/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Department id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedEnvelope),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_department(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeletedEnvelope>, ServiceError> {
    require_admin(&caller)?;
    state.departments().delete(id).await?;
    Ok(Json(DeletedEnvelope { success: true }))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/department", post(create_department))
        .route("/api/department", get(list_departments))
        .route("/api/department/:id", get(get_department))
        .route("/api/department/:id", put(update_department))
        .route("/api/department/:id", delete(delete_department))
        .with_state(state)
}
