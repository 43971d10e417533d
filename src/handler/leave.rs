use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    entities::leaves,
    error::ServiceError,
    handler::guard::{require_admin, AuthUser},
    repo::leaves::LeaveWithDetails,
    service::leaves::SubmitLeaveInput,
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct SubmitLeaveRequest {
    pub leave_type: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct TransitionLeaveRequest {
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveResponse {
    pub id: i64,
    pub employee_id: i64,
    pub leave_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub description: String,
    pub status: String,
    pub applied_date: DateTime<Utc>,
    pub approved_by: Option<i64>,
    pub approved_date: Option<DateTime<Utc>>,
}

impl From<leaves::Model> for LeaveResponse {
    fn from(model: leaves::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            leave_type: model.leave_type,
            from_date: model.from_date,
            to_date: model.to_date,
            description: model.description,
            status: model.status,
            applied_date: model.applied_date.with_timezone(&Utc),
            approved_by: model.approved_by,
            approved_date: model.approved_date.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct LeaveEnvelope {
    pub success: bool,
    pub leave: LeaveResponse,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveDetailsEnvelope {
    pub success: bool,
    pub leave: LeaveWithDetails,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListEnvelope {
    pub success: bool,
    pub leaves: Vec<LeaveWithDetails>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveDeletedEnvelope {
    pub success: bool,
}

#[utoipa::path(
    post,
    path = "/api/leave/add",
    security(("bearer_auth" = [])),
    request_body = SubmitLeaveRequest,
    responses(
        (status = 201, description = "Submitted", body = LeaveEnvelope),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Caller has no employee record")
    )
)]
pub async fn submit_leave(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<SubmitLeaveRequest>,
) -> Result<(StatusCode, Json<LeaveEnvelope>), ServiceError> {
    let leave = state
        .leaves()
        .submit(
            caller,
            SubmitLeaveInput {
                leave_type: payload.leave_type,
                from_date: payload.from_date,
                to_date: payload.to_date,
                description: payload.description,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(LeaveEnvelope {
            success: true,
            leave: leave.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/leave",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All leave requests", body = LeaveListEnvelope),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_leaves(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<Json<LeaveListEnvelope>, ServiceError> {
    require_admin(&caller)?;
    let leaves = state.leaves().list_all().await?;
    Ok(Json(LeaveListEnvelope {
        success: true,
        leaves,
    }))
}

#[utoipa::path(
    get,
    path = "/api/leave/employee/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's leave requests", body = LeaveListEnvelope),
        (status = 404, description = "Caller has no employee record")
    )
)]
pub async fn my_leaves(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<Json<LeaveListEnvelope>, ServiceError> {
    let leaves = state.leaves().my_leaves(caller).await?;
    Ok(Json(LeaveListEnvelope {
        success: true,
        leaves,
    }))
}

#[utoipa::path(
    get,
    path = "/api/leave/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave request", body = LeaveDetailsEnvelope),
        (status = 403, description = "Not the caller's request"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_leave(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<LeaveDetailsEnvelope>, ServiceError> {
    let leave = state.leaves().get(id, caller).await?;
    Ok(Json(LeaveDetailsEnvelope {
        success: true,
        leave,
    }))
}

#[utoipa::path(
    put,
    path = "/api/leave/{id}",
    security(("bearer_auth" = [])),
    request_body = TransitionLeaveRequest,
    params(("id" = i64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Transitioned", body = LeaveEnvelope),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Already processed")
    )
)]
pub async fn transition_leave(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<TransitionLeaveRequest>,
) -> Result<Json<LeaveEnvelope>, ServiceError> {
    let leave = state
        .leaves()
        .transition(id, payload.status.as_deref(), caller)
        .await?;
    Ok(Json(LeaveEnvelope {
        success: true,
        leave: leave.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/leave/{id}",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Deleted", body = LeaveDeletedEnvelope),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_leave(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<LeaveDeletedEnvelope>, ServiceError> {
    require_admin(&caller)?;
    state.leaves().delete(id).await?;
    Ok(Json(LeaveDeletedEnvelope { success: true }))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/leave/add", post(submit_leave))
        .route("/api/leave", get(list_leaves))
        .route("/api/leave/employee/me", get(my_leaves))
        .route("/api/leave/:id", get(get_leave))
        .route("/api/leave/:id", put(transition_leave))
        .route("/api/leave/:id", delete(delete_leave))
        .with_state(state)
}
