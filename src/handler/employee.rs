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
    error::ServiceError,
    handler::guard::{require_admin, AuthUser},
    repo::employees::EmployeeWithDetails,
    service::employees::{CreateEmployeeInput, UpdateEmployeeInput, UpdateProfileInput},
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub employee_code: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub designation: Option<String>,
    pub department_id: Option<i64>,
    pub salary: Option<f64>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub employee_code: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub designation: Option<String>,
    pub department_id: Option<i64>,
    pub salary: Option<f64>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeEnvelope {
    pub success: bool,
    pub employee: EmployeeWithDetails,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListEnvelope {
    pub success: bool,
    pub employees: Vec<EmployeeWithDetails>,
}

#[utoipa::path(
    post,
    path = "/api/employee/add",
    security(("bearer_auth" = [])),
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Created", body = MessageEnvelope),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<MessageEnvelope>), ServiceError> {
    require_admin(&caller)?;
    state
        .employees()
        .create(CreateEmployeeInput {
            name: payload.name,
            email: payload.email,
            employee_code: payload.employee_code,
            dob: payload.dob,
            gender: payload.gender,
            marital_status: payload.marital_status,
            designation: payload.designation,
            department_id: payload.department_id,
            salary: payload.salary,
            password: payload.password,
            role: payload.role,
            profile_image: payload.profile_image,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageEnvelope {
            success: true,
            message: "Employee created successfully".to_string(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/employee",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active employees", body = EmployeeListEnvelope)
    )
)]
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    AuthUser(_caller): AuthUser,
) -> Result<Json<EmployeeListEnvelope>, ServiceError> {
    let employees = state.employees().list().await?;
    Ok(Json(EmployeeListEnvelope {
        success: true,
        employees,
    }))
}

#[utoipa::path(
    get,
    path = "/api/employee/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee", body = EmployeeEnvelope),
        (status = 403, description = "Not the caller's record"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<EmployeeEnvelope>, ServiceError> {
    let employee = state.employees().get(id, caller).await?;
    Ok(Json(EmployeeEnvelope {
        success: true,
        employee,
    }))
}

#[utoipa::path(
    put,
    path = "/api/employee/profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = MessageEnvelope),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<MessageEnvelope>, ServiceError> {
    state
        .employees()
        .update_profile(
            caller,
            UpdateProfileInput {
                name: payload.name,
                email: payload.email,
                dob: payload.dob,
                gender: payload.gender,
                marital_status: payload.marital_status,
                profile_image: payload.profile_image,
            },
        )
        .await?;
    Ok(Json(MessageEnvelope {
        success: true,
        message: "Profile updated successfully".to_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/employee/{id}",
    security(("bearer_auth" = [])),
    request_body = UpdateEmployeeRequest,
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Updated", body = MessageEnvelope),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<MessageEnvelope>, ServiceError> {
    require_admin(&caller)?;
    state
        .employees()
        .update(
            id,
            UpdateEmployeeInput {
                name: payload.name,
                email: payload.email,
                employee_code: payload.employee_code,
                dob: payload.dob,
                gender: payload.gender,
                marital_status: payload.marital_status,
                designation: payload.designation,
                department_id: payload.department_id,
                salary: payload.salary,
                password: payload.password,
                role: payload.role,
                status: payload.status,
                profile_image: payload.profile_image,
            },
        )
        .await?;
    Ok(Json(MessageEnvelope {
        success: true,
        message: "Employee updated successfully".to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/employee/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee and dependent records removed", body = MessageEnvelope),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageEnvelope>, ServiceError> {
    require_admin(&caller)?;
    state.employees().delete(id).await?;
    Ok(Json(MessageEnvelope {
        success: true,
        message: "Employee deleted successfully".to_string(),
    }))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/employee/add", post(create_employee))
        .route("/api/employee", get(list_employees))
        .route("/api/employee/profile", put(update_profile))
        .route("/api/employee/:id", get(get_employee))
        .route("/api/employee/:id", put(update_employee))
        .route("/api/employee/:id", delete(delete_employee))
        .with_state(state)
}
