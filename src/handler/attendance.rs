use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    entities::attendance,
    error::ServiceError,
    handler::guard::{require_admin, AuthUser},
    repo::attendance::AttendanceWithDetails,
    service::attendance::MarkAttendanceInput,
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendanceRequest {
    pub employee_id: Option<i64>,
    pub date: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceLookupQuery {
    pub employee_id: Option<i64>,
    pub date: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub employee_id: Option<i64>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceDayQuery {
    pub date: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub status: String,
}

impl From<attendance::Model> for AttendanceRecord {
    fn from(model: attendance::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            date: model.date,
            status: model.status,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MarkAttendanceEnvelope {
    pub success: bool,
    pub message: String,
    pub attendance: AttendanceRecord,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceLookupEnvelope {
    pub success: bool,
    pub attendance: Option<AttendanceRecord>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListEnvelope {
    pub success: bool,
    pub attendance: Vec<AttendanceWithDetails>,
}

#[utoipa::path(
    post,
    path = "/api/attendance/mark",
    security(("bearer_auth" = [])),
    request_body = MarkAttendanceRequest,
    responses(
        (status = 200, description = "Marked or updated", body = MarkAttendanceEnvelope),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Unknown employee")
    )
)]
pub async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<Json<MarkAttendanceEnvelope>, ServiceError> {
    require_admin(&caller)?;
    let outcome = state
        .attendance()
        .mark(MarkAttendanceInput {
            employee_id: payload.employee_id,
            date: payload.date,
            status: payload.status,
        })
        .await?;
    let message = if outcome.updated {
        "Attendance updated successfully"
    } else {
        "Attendance marked successfully"
    };
    Ok(Json(MarkAttendanceEnvelope {
        success: true,
        message: message.to_string(),
        attendance: outcome.record.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    security(("bearer_auth" = [])),
    params(AttendanceLookupQuery),
    responses(
        (status = 200, description = "Record for one employee and day", body = AttendanceLookupEnvelope),
        (status = 400, description = "Missing employee_id or date"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_attendance(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Query(query): Query<AttendanceLookupQuery>,
) -> Result<Json<AttendanceLookupEnvelope>, ServiceError> {
    require_admin(&caller)?;
    let (Some(employee_id), Some(date)) = (query.employee_id, query.date.as_deref()) else {
        return Err(ServiceError::invalid("Employee ID and date are required"));
    };
    let attendance = state.attendance().get(employee_id, date).await?;
    Ok(Json(AttendanceLookupEnvelope {
        success: true,
        attendance: attendance.map(Into::into),
    }))
}

#[utoipa::path(
    get,
    path = "/api/attendance/report",
    security(("bearer_auth" = [])),
    params(AttendanceReportQuery),
    responses(
        (status = 200, description = "Records in the inclusive range", body = AttendanceListEnvelope),
        (status = 400, description = "Missing or inverted range"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn attendance_report(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Query(query): Query<AttendanceReportQuery>,
) -> Result<Json<AttendanceListEnvelope>, ServiceError> {
    require_admin(&caller)?;
    let (Some(start), Some(end)) = (query.start_date.as_deref(), query.end_date.as_deref())
    else {
        return Err(ServiceError::invalid(
            "Start date and end date are required",
        ));
    };
    let attendance = state
        .attendance()
        .report(start, end, query.employee_id)
        .await?;
    Ok(Json(AttendanceListEnvelope {
        success: true,
        attendance,
    }))
}

#[utoipa::path(
    get,
    path = "/api/attendance/all",
    security(("bearer_auth" = [])),
    params(AttendanceDayQuery),
    responses(
        (status = 200, description = "All records for one day", body = AttendanceListEnvelope),
        (status = 400, description = "Missing date"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn attendance_for_date(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Query(query): Query<AttendanceDayQuery>,
) -> Result<Json<AttendanceListEnvelope>, ServiceError> {
    require_admin(&caller)?;
    let Some(date) = query.date.as_deref() else {
        return Err(ServiceError::invalid("Date is required"));
    };
    let attendance = state.attendance().for_date(date).await?;
    Ok(Json(AttendanceListEnvelope {
        success: true,
        attendance,
    }))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/attendance/mark", post(mark_attendance))
        .route("/api/attendance", get(get_attendance))
        .route("/api/attendance/report", get(attendance_report))
        .route("/api/attendance/all", get(attendance_for_date))
        .with_state(state)
}
