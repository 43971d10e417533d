use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    handler,
    handler::{
        attendance::{
            AttendanceListEnvelope, AttendanceLookupEnvelope, AttendanceRecord,
            MarkAttendanceEnvelope, MarkAttendanceRequest,
        },
        auth::{
            ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, UserResponse,
            VerifyResponse,
        },
        department::{
            DeletedEnvelope, DepartmentEnvelope, DepartmentListEnvelope, DepartmentRequest,
            DepartmentResponse,
        },
        employee::{
            CreateEmployeeRequest, EmployeeEnvelope, EmployeeListEnvelope, MessageEnvelope,
            UpdateEmployeeRequest, UpdateProfileRequest,
        },
        health::Health,
        leave::{
            LeaveDeletedEnvelope, LeaveDetailsEnvelope, LeaveEnvelope, LeaveListEnvelope,
            LeaveResponse, SubmitLeaveRequest, TransitionLeaveRequest,
        },
        salary::{
            AddSalaryRequest, SalaryDeletedEnvelope, SalaryDetailsEnvelope, SalaryEnvelope,
            SalaryListEnvelope, SalaryResponse, UpdateSalaryRequest,
        },
    },
    repo::{
        attendance::AttendanceWithDetails, employees::EmployeeWithDetails,
        leaves::LeaveWithDetails, salaries::SalaryWithDetails,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handler::health::health,
        handler::auth::login,
        handler::auth::verify,
        handler::auth::change_password,
        handler::department::create_department,
        handler::department::list_departments,
        handler::department::get_department,
        handler::department::update_department,
        handler::department::delete_department,
        handler::employee::create_employee,
        handler::employee::list_employees,
        handler::employee::get_employee,
        handler::employee::update_profile,
        handler::employee::update_employee,
        handler::employee::delete_employee,
        handler::leave::submit_leave,
        handler::leave::list_leaves,
        handler::leave::my_leaves,
        handler::leave::get_leave,
        handler::leave::transition_leave,
        handler::leave::delete_leave,
        handler::salary::add_salary,
        handler::salary::list_salaries,
        handler::salary::get_salary,
        handler::salary::update_salary,
        handler::salary::salaries_by_employee,
        handler::salary::delete_salary,
        handler::attendance::mark_attendance,
        handler::attendance::get_attendance,
        handler::attendance::attendance_report,
        handler::attendance::attendance_for_date
    ),
    components(schemas(
        Health,
        LoginRequest,
        LoginResponse,
        VerifyResponse,
        ChangePasswordRequest,
        MessageResponse,
        UserResponse,
        DepartmentRequest,
        DepartmentResponse,
        DepartmentEnvelope,
        DepartmentListEnvelope,
        DeletedEnvelope,
        CreateEmployeeRequest,
        UpdateEmployeeRequest,
        UpdateProfileRequest,
        MessageEnvelope,
        EmployeeEnvelope,
        EmployeeListEnvelope,
        EmployeeWithDetails,
        SubmitLeaveRequest,
        TransitionLeaveRequest,
        LeaveResponse,
        LeaveEnvelope,
        LeaveDetailsEnvelope,
        LeaveListEnvelope,
        LeaveDeletedEnvelope,
        LeaveWithDetails,
        AddSalaryRequest,
        UpdateSalaryRequest,
        SalaryResponse,
        SalaryEnvelope,
        SalaryDetailsEnvelope,
        SalaryListEnvelope,
        SalaryDeletedEnvelope,
        SalaryWithDetails,
        MarkAttendanceRequest,
        AttendanceRecord,
        MarkAttendanceEnvelope,
        AttendanceLookupEnvelope,
        AttendanceListEnvelope,
        AttendanceWithDetails
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check"),
        (name = "auth", description = "Authentication"),
        (name = "department", description = "Department directory"),
        (name = "employee", description = "Employee directory"),
        (name = "leave", description = "Leave workflow"),
        (name = "salary", description = "Salary ledger"),
        (name = "attendance", description = "Attendance log")
    )
)]
pub struct ApiDoc;
