use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::TransactionTrait;
use std::sync::Arc;

use crate::{
    entities::{employees, users},
    error::ServiceError,
    repo::{
        attendance::AttendanceRepo,
        departments::DepartmentsRepo,
        employees::{EmployeeWithDetails, EmployeesRepo},
        leaves::LeavesRepo,
        salaries::SalariesRepo,
        users::UsersRepo,
    },
    service::{
        auth::{hash_password, Caller, Role},
        parse_date,
    },
    state::DatabaseClient,
};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_RESIGNED: &str = "resigned";

#[derive(Default)]
pub struct CreateEmployeeInput {
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

#[derive(Default)]
pub struct UpdateEmployeeInput {
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

#[derive(Default)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug)]
struct ValidatedCreate {
    name: String,
    email: String,
    employee_code: String,
    dob: Option<NaiveDate>,
    gender: Option<String>,
    marital_status: Option<String>,
    designation: Option<String>,
    department_id: i64,
    salary: Option<f64>,
    password: String,
    role: Role,
    profile_image: Option<String>,
}

fn required(label: &str, value: Option<&str>) -> Result<String, ServiceError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ServiceError::invalid(format!("{label} is required"))),
    }
}

fn validate_create(input: &CreateEmployeeInput) -> Result<ValidatedCreate, ServiceError> {
    let Some(department_id) = input.department_id else {
        return Err(ServiceError::invalid("Department is required"));
    };
    let name = required("Name", input.name.as_deref())?;
    let email = required("Email", input.email.as_deref())?.to_lowercase();
    let employee_code = required("Employee code", input.employee_code.as_deref())?;
    let password = required("Password", input.password.as_deref())?;
    let dob = input
        .dob
        .as_deref()
        .map(|v| parse_date("date of birth", v))
        .transpose()?;
    let role = match input.role.as_deref() {
        None => Role::Employee,
        Some(value) => Role::parse(value).ok_or_else(|| ServiceError::invalid("Invalid role"))?,
    };

    Ok(ValidatedCreate {
        name,
        email,
        employee_code,
        dob,
        gender: input.gender.clone(),
        marital_status: input.marital_status.clone(),
        designation: input.designation.clone(),
        department_id,
        salary: input.salary,
        password,
        role,
        profile_image: input.profile_image.clone(),
    })
}

#[async_trait]
pub trait EmployeesService: Send + Sync {
    async fn create(&self, input: CreateEmployeeInput) -> Result<(), ServiceError>;
    async fn list(&self) -> Result<Vec<EmployeeWithDetails>, ServiceError>;
    async fn get(&self, id: i64, caller: Caller) -> Result<EmployeeWithDetails, ServiceError>;
    async fn update(&self, id: i64, input: UpdateEmployeeInput) -> Result<(), ServiceError>;
    async fn update_profile(
        &self,
        caller: Caller,
        input: UpdateProfileInput,
    ) -> Result<(), ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

pub struct EmployeesServiceImpl {
    db: Arc<dyn DatabaseClient>,
    users_repo: Arc<dyn UsersRepo>,
    employees_repo: Arc<dyn EmployeesRepo>,
    departments_repo: Arc<dyn DepartmentsRepo>,
    leaves_repo: Arc<dyn LeavesRepo>,
    salaries_repo: Arc<dyn SalariesRepo>,
    attendance_repo: Arc<dyn AttendanceRepo>,
}

impl EmployeesServiceImpl {
    pub fn new(
        db: Arc<dyn DatabaseClient>,
        users_repo: Arc<dyn UsersRepo>,
        employees_repo: Arc<dyn EmployeesRepo>,
        departments_repo: Arc<dyn DepartmentsRepo>,
        leaves_repo: Arc<dyn LeavesRepo>,
        salaries_repo: Arc<dyn SalariesRepo>,
        attendance_repo: Arc<dyn AttendanceRepo>,
    ) -> Self {
        Self {
            db,
            users_repo,
            employees_repo,
            departments_repo,
            leaves_repo,
            salaries_repo,
            attendance_repo,
        }
    }

    async fn ensure_department_exists(&self, department_id: i64) -> Result<(), ServiceError> {
        if self
            .departments_repo
            .find_by_id(department_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Department not found"));
        }
        Ok(())
    }

    async fn ensure_email_free(
        &self,
        email: &str,
        except_user_id: Option<i64>,
        message: &str,
    ) -> Result<(), ServiceError> {
        if let Some(existing) = self.users_repo.find_by_email(email).await? {
            if Some(existing.id) != except_user_id {
                return Err(ServiceError::conflict(message));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeesService for EmployeesServiceImpl {
    async fn create(&self, input: CreateEmployeeInput) -> Result<(), ServiceError> {
        let validated = validate_create(&input)?;
        self.ensure_department_exists(validated.department_id)
            .await?;
        self.ensure_email_free(&validated.email, None, "User already registered")
            .await?;

        let password_hash = hash_password(&validated.password)?;
        let users_repo = self.users_repo.clone();
        let employees_repo = self.employees_repo.clone();

        self.db
            .conn()
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let user = users_repo
                        .insert_with_txn(
                            txn,
                            users::ActiveModel {
                                name: sea_orm::Set(validated.name),
                                email: sea_orm::Set(validated.email),
                                password_hash: sea_orm::Set(password_hash),
                                role: sea_orm::Set(validated.role.as_str().to_string()),
                                profile_image: sea_orm::Set(validated.profile_image),
                                ..Default::default()
                            },
                        )
                        .await?;

                    employees_repo
                        .insert_with_txn(
                            txn,
                            employees::ActiveModel {
                                user_id: sea_orm::Set(user.id),
                                employee_code: sea_orm::Set(validated.employee_code),
                                dob: sea_orm::Set(validated.dob),
                                gender: sea_orm::Set(validated.gender),
                                marital_status: sea_orm::Set(validated.marital_status),
                                designation: sea_orm::Set(validated.designation),
                                department_id: sea_orm::Set(validated.department_id),
                                salary: sea_orm::Set(validated.salary),
                                status: sea_orm::Set(STATUS_ACTIVE.to_string()),
                                ..Default::default()
                            },
                        )
                        .await?;
                    Ok(())
                })
            })
            .await
            .map_err(|err| ServiceError::Internal(err.to_string()))?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<EmployeeWithDetails>, ServiceError> {
        Ok(self.employees_repo.find_active_with_details().await?)
    }

    async fn get(&self, id: i64, caller: Caller) -> Result<EmployeeWithDetails, ServiceError> {
        let Some(details) = self.employees_repo.find_by_id_with_details(id).await? else {
            return Err(ServiceError::not_found("Employee not found"));
        };
        if !caller.is_admin() && details.user_id != caller.account_id {
            return Err(ServiceError::forbidden(
                "Access denied. You can only view your own profile.",
            ));
        }
        Ok(details)
    }

    async fn update(&self, id: i64, input: UpdateEmployeeInput) -> Result<(), ServiceError> {
        let Some(employee) = self.employees_repo.find_by_id(id).await? else {
            return Err(ServiceError::not_found("Employee not found"));
        };
        let Some(user) = self.users_repo.find_by_id(employee.user_id).await? else {
            return Err(ServiceError::not_found("User not found"));
        };

        let Some(department_id) = input.department_id else {
            return Err(ServiceError::invalid("Department is required"));
        };
        self.ensure_department_exists(department_id).await?;

        let name = required("Name", input.name.as_deref())?;
        let email = required("Email", input.email.as_deref())?.to_lowercase();
        self.ensure_email_free(&email, Some(user.id), "Email already in use")
            .await?;

        let mut user_active: users::ActiveModel = user.into();
        user_active.name = sea_orm::Set(name);
        user_active.email = sea_orm::Set(email);
        if let Some(role) = input.role.as_deref() {
            let role = Role::parse(role).ok_or_else(|| ServiceError::invalid("Invalid role"))?;
            user_active.role = sea_orm::Set(role.as_str().to_string());
        }
        if let Some(password) = input.password.as_deref().filter(|v| !v.is_empty()) {
            user_active.password_hash = sea_orm::Set(hash_password(password)?);
        }
        if let Some(image) = input.profile_image {
            user_active.profile_image = sea_orm::Set(Some(image));
        }
        self.users_repo.update(user_active).await?;

        let mut employee_active: employees::ActiveModel = employee.into();
        employee_active.department_id = sea_orm::Set(department_id);
        if let Some(code) = input.employee_code.as_deref().filter(|v| !v.is_empty()) {
            employee_active.employee_code = sea_orm::Set(code.trim().to_string());
        }
        if let Some(dob) = input.dob.as_deref() {
            employee_active.dob = sea_orm::Set(Some(parse_date("date of birth", dob)?));
        }
        if let Some(gender) = input.gender {
            employee_active.gender = sea_orm::Set(Some(gender));
        }
        if let Some(marital_status) = input.marital_status {
            employee_active.marital_status = sea_orm::Set(Some(marital_status));
        }
        if let Some(designation) = input.designation {
            employee_active.designation = sea_orm::Set(Some(designation));
        }
        if let Some(salary) = input.salary {
            employee_active.salary = sea_orm::Set(Some(salary));
        }
        if let Some(status) = input.status.as_deref() {
            if status != STATUS_ACTIVE && status != STATUS_RESIGNED {
                return Err(ServiceError::invalid("Invalid status"));
            }
            employee_active.status = sea_orm::Set(status.to_string());
        }
        self.employees_repo.update(employee_active).await?;

        Ok(())
    }

    async fn update_profile(
        &self,
        caller: Caller,
        input: UpdateProfileInput,
    ) -> Result<(), ServiceError> {
        let Some(user) = self.users_repo.find_by_id(caller.account_id).await? else {
            return Err(ServiceError::not_found("User not found"));
        };
        let Some(employee) = self.employees_repo.find_by_user_id(user.id).await? else {
            return Err(ServiceError::not_found("Employee record not found"));
        };

        let name = required("Name", input.name.as_deref())?;
        let email = required("Email", input.email.as_deref())?.to_lowercase();
        self.ensure_email_free(&email, Some(user.id), "Email already in use")
            .await?;

        let mut user_active: users::ActiveModel = user.into();
        user_active.name = sea_orm::Set(name);
        user_active.email = sea_orm::Set(email);
        if let Some(image) = input.profile_image {
            user_active.profile_image = sea_orm::Set(Some(image));
        }
        self.users_repo.update(user_active).await?;

        let mut employee_active: employees::ActiveModel = employee.into();
        if let Some(dob) = input.dob.as_deref() {
            employee_active.dob = sea_orm::Set(Some(parse_date("date of birth", dob)?));
        }
        if let Some(gender) = input.gender {
            employee_active.gender = sea_orm::Set(Some(gender));
        }
        if let Some(marital_status) = input.marital_status {
            employee_active.marital_status = sea_orm::Set(Some(marital_status));
        }
        self.employees_repo.update(employee_active).await?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let Some(employee) = self.employees_repo.find_by_id(id).await? else {
            return Err(ServiceError::not_found("Employee not found"));
        };

        let leaves_repo = self.leaves_repo.clone();
        let salaries_repo = self.salaries_repo.clone();
        let attendance_repo = self.attendance_repo.clone();
        let employees_repo = self.employees_repo.clone();
        let users_repo = self.users_repo.clone();
        let user_id = employee.user_id;

        // Dependent rows first, then the employee, then its account. One
        // transaction so a crash cannot strand orphans.
        self.db
            .conn()
            .transaction::<_, (), sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    leaves_repo.delete_by_employee_with_txn(txn, id).await?;
                    salaries_repo.delete_by_employee_with_txn(txn, id).await?;
                    attendance_repo.delete_by_employee_with_txn(txn, id).await?;
                    employees_repo.delete_by_id_with_txn(txn, id).await?;
                    users_repo.delete_by_id_with_txn(txn, user_id).await?;
                    Ok(())
                })
            })
            .await
            .map_err(|err| ServiceError::Internal(err.to_string()))?;

        tracing::info!(employee_id = id, "deleted employee and related records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_input() -> CreateEmployeeInput {
        CreateEmployeeInput {
            name: Some("Jane Roe".to_string()),
            email: Some("Jane@Example.com".to_string()),
            employee_code: Some("EMP-001".to_string()),
            department_id: Some(3),
            password: Some("secret1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn create_requires_a_department() {
        let input = CreateEmployeeInput {
            department_id: None,
            ..minimal_input()
        };
        let err = validate_create(&input).unwrap_err();
        assert_eq!(err.to_string(), "Department is required");
    }

    #[test]
    fn create_requires_identity_fields() {
        let input = CreateEmployeeInput {
            name: Some("   ".to_string()),
            ..minimal_input()
        };
        assert_eq!(
            validate_create(&input).unwrap_err().to_string(),
            "Name is required"
        );

        let input = CreateEmployeeInput {
            password: None,
            ..minimal_input()
        };
        assert_eq!(
            validate_create(&input).unwrap_err().to_string(),
            "Password is required"
        );
    }

    #[test]
    fn create_normalizes_email_and_defaults_role() {
        let validated = validate_create(&minimal_input()).unwrap();
        assert_eq!(validated.email, "jane@example.com");
        assert_eq!(validated.role, Role::Employee);
    }

    #[test]
    fn create_rejects_unknown_role_and_bad_dob() {
        let input = CreateEmployeeInput {
            role: Some("superuser".to_string()),
            ..minimal_input()
        };
        assert_eq!(
            validate_create(&input).unwrap_err().to_string(),
            "Invalid role"
        );

        let input = CreateEmployeeInput {
            dob: Some("01/02/1990".to_string()),
            ..minimal_input()
        };
        assert_eq!(
            validate_create(&input).unwrap_err().to_string(),
            "Invalid date of birth"
        );
    }
}
