use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    entities::salaries,
    error::ServiceError,
    handler::guard::{require_admin, AuthUser},
    repo::salaries::SalaryWithDetails,
    service::salaries::{AddSalaryInput, UpdateSalaryInput},
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct AddSalaryRequest {
    pub employee_id: Option<i64>,
    pub basic_salary: Option<f64>,
    pub allowances: Option<f64>,
    pub deductions: Option<f64>,
    pub pay_date: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateSalaryRequest {
    pub basic_salary: Option<f64>,
    pub allowances: Option<f64>,
    pub deductions: Option<f64>,
    pub pay_date: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SalaryResponse {
    pub id: i64,
    pub employee_id: i64,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub net_salary: f64,
    pub pay_date: NaiveDate,
}

impl From<salaries::Model> for SalaryResponse {
    fn from(model: salaries::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            basic_salary: model.basic_salary,
            allowances: model.allowances,
            deductions: model.deductions,
            net_salary: model.net_salary,
            pay_date: model.pay_date,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SalaryEnvelope {
    pub success: bool,
    pub salary: SalaryResponse,
}

#[derive(Serialize, ToSchema)]
pub struct SalaryDetailsEnvelope {
    pub success: bool,
    pub salary: SalaryWithDetails,
}

#[derive(Serialize, ToSchema)]
pub struct SalaryListEnvelope {
    pub success: bool,
    pub salaries: Vec<SalaryWithDetails>,
}

#[derive(Serialize, ToSchema)]
pub struct SalaryDeletedEnvelope {
    pub success: bool,
}

#[utoipa::path(
    post,
    path = "/api/salary/add",
    security(("bearer_auth" = [])),
    request_body = AddSalaryRequest,
    responses(
        (status = 201, description = "Recorded", body = SalaryEnvelope),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Unknown employee")
    )
)]
pub async fn add_salary(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<AddSalaryRequest>,
) -> Result<(StatusCode, Json<SalaryEnvelope>), ServiceError> {
    require_admin(&caller)?;
    let salary = state
        .salaries()
        .add(AddSalaryInput {
            employee_id: payload.employee_id,
            basic_salary: payload.basic_salary,
            allowances: payload.allowances,
            deductions: payload.deductions,
            pay_date: payload.pay_date,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SalaryEnvelope {
            success: true,
            salary: salary.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/salary",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All salary records", body = SalaryListEnvelope),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_salaries(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<Json<SalaryListEnvelope>, ServiceError> {
    require_admin(&caller)?;
    let salaries = state.salaries().list_all().await?;
    Ok(Json(SalaryListEnvelope {
        success: true,
        salaries,
    }))
}

#[utoipa::path(
    get,
    path = "/api/salary/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Salary record id")),
    responses(
        (status = 200, description = "Salary record", body = SalaryDetailsEnvelope),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_salary(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<SalaryDetailsEnvelope>, ServiceError> {
    require_admin(&caller)?;
    let salary = state.salaries().get(id).await?;
    Ok(Json(SalaryDetailsEnvelope {
        success: true,
        salary,
    }))
}

#[utoipa::path(
    put,
    path = "/api/salary/{id}",
    security(("bearer_auth" = [])),
    request_body = UpdateSalaryRequest,
    params(("id" = i64, Path, description = "Salary record id")),
    responses(
        (status = 200, description = "Updated", body = SalaryEnvelope),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_salary(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSalaryRequest>,
) -> Result<Json<SalaryEnvelope>, ServiceError> {
    require_admin(&caller)?;
    let salary = state
        .salaries()
        .update(
            id,
            UpdateSalaryInput {
                basic_salary: payload.basic_salary,
                allowances: payload.allowances,
                deductions: payload.deductions,
                pay_date: payload.pay_date,
            },
        )
        .await?;
    Ok(Json(SalaryEnvelope {
        success: true,
        salary: salary.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/salary/employee/{employee_id}",
    security(("bearer_auth" = [])),
    params(("employee_id" = i64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee's salary history", body = SalaryListEnvelope),
        (status = 403, description = "Not the caller's history"),
        (status = 404, description = "Unknown employee")
    )
)]
pub async fn salaries_by_employee(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(employee_id): Path<i64>,
) -> Result<Json<SalaryListEnvelope>, ServiceError> {
    let salaries = state.salaries().by_employee(employee_id, caller).await?;
    Ok(Json(SalaryListEnvelope {
        success: true,
        salaries,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/salary/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Salary record id")),
    responses(
        (status = 200, description = "Deleted", body = SalaryDeletedEnvelope),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_salary(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<SalaryDeletedEnvelope>, ServiceError> {
    require_admin(&caller)?;
    state.salaries().delete(id).await?;
    Ok(Json(SalaryDeletedEnvelope { success: true }))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/salary/add", post(add_salary))
        .route("/api/salary", get(list_salaries))
        .route("/api/salary/employee/:employee_id", get(salaries_by_employee))
        .route("/api/salary/:id", get(get_salary))
        .route("/api/salary/:id", put(update_salary))
        .route("/api/salary/:id", delete(delete_salary))
        .with_state(state)
}
