use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::{
    entities::leaves,
    error::ServiceError,
    repo::{
        employees::EmployeesRepo,
        leaves::{LeaveWithDetails, LeavesRepo},
    },
    service::{auth::Caller, parse_date},
};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

const LEAVE_TYPES: [&str; 3] = ["sick", "annual", "casual"];

#[derive(Default)]
pub struct SubmitLeaveInput {
    pub leave_type: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub description: Option<String>,
}

fn validate_dates(from: NaiveDate, to: NaiveDate, today: NaiveDate) -> Result<(), ServiceError> {
    if from > to {
        return Err(ServiceError::invalid("From date cannot be after to date"));
    }
    if from < today {
        return Err(ServiceError::invalid("Cannot apply leave for past dates"));
    }
    Ok(())
}

fn validate_submit(
    input: &SubmitLeaveInput,
    today: NaiveDate,
) -> Result<(String, NaiveDate, NaiveDate, String), ServiceError> {
    let (Some(leave_type), Some(from_date), Some(to_date), Some(description)) = (
        input.leave_type.as_deref().filter(|v| !v.trim().is_empty()),
        input.from_date.as_deref().filter(|v| !v.trim().is_empty()),
        input.to_date.as_deref().filter(|v| !v.trim().is_empty()),
        input
            .description
            .as_deref()
            .filter(|v| !v.trim().is_empty()),
    ) else {
        return Err(ServiceError::invalid("All fields are required"));
    };

    if !LEAVE_TYPES.contains(&leave_type) {
        return Err(ServiceError::invalid("Invalid leave type"));
    }
    let from = parse_date("from date", from_date)?;
    let to = parse_date("to date", to_date)?;
    validate_dates(from, to, today)?;

    Ok((leave_type.to_string(), from, to, description.to_string()))
}

#[async_trait]
pub trait LeavesService: Send + Sync {
    async fn submit(
        &self,
        caller: Caller,
        input: SubmitLeaveInput,
    ) -> Result<leaves::Model, ServiceError>;
    async fn list_all(&self) -> Result<Vec<LeaveWithDetails>, ServiceError>;
    async fn get(&self, id: i64, caller: Caller) -> Result<LeaveWithDetails, ServiceError>;
    async fn my_leaves(&self, caller: Caller) -> Result<Vec<LeaveWithDetails>, ServiceError>;
    async fn transition(
        &self,
        id: i64,
        new_status: Option<&str>,
        caller: Caller,
    ) -> Result<leaves::Model, ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

pub struct LeavesServiceImpl {
    leaves_repo: Arc<dyn LeavesRepo>,
    employees_repo: Arc<dyn EmployeesRepo>,
}

impl LeavesServiceImpl {
    pub fn new(leaves_repo: Arc<dyn LeavesRepo>, employees_repo: Arc<dyn EmployeesRepo>) -> Self {
        Self {
            leaves_repo,
            employees_repo,
        }
    }
}

#[async_trait]
impl LeavesService for LeavesServiceImpl {
    async fn submit(
        &self,
        caller: Caller,
        input: SubmitLeaveInput,
    ) -> Result<leaves::Model, ServiceError> {
        let today = Utc::now().date_naive();
        let (leave_type, from, to, description) = validate_submit(&input, today)?;

        // Leave is always self-submitted: resolve the caller to their own
        // employee record, never to a client-supplied id.
        let Some(employee) = self
            .employees_repo
            .find_by_user_id(caller.account_id)
            .await?
        else {
            return Err(ServiceError::not_found("Employee not found"));
        };

        let model = leaves::ActiveModel {
            employee_id: sea_orm::Set(employee.id),
            leave_type: sea_orm::Set(leave_type),
            from_date: sea_orm::Set(from),
            to_date: sea_orm::Set(to),
            description: sea_orm::Set(description),
            status: sea_orm::Set(STATUS_PENDING.to_string()),
            applied_date: sea_orm::Set(Utc::now().into()),
            ..Default::default()
        };
        Ok(self.leaves_repo.insert(model).await?)
    }

    async fn list_all(&self) -> Result<Vec<LeaveWithDetails>, ServiceError> {
        Ok(self.leaves_repo.find_all_with_details().await?)
    }

    async fn get(&self, id: i64, caller: Caller) -> Result<LeaveWithDetails, ServiceError> {
        let Some(leave) = self.leaves_repo.find_by_id_with_details(id).await? else {
            return Err(ServiceError::not_found("Leave request not found"));
        };
        if !caller.is_admin() {
            let owns = self
                .employees_repo
                .find_by_user_id(caller.account_id)
                .await?
                .map(|employee| employee.id == leave.employee_id)
                .unwrap_or(false);
            if !owns {
                return Err(ServiceError::forbidden(
                    "Access denied. You can only view your own leave requests.",
                ));
            }
        }
        Ok(leave)
    }

    async fn my_leaves(&self, caller: Caller) -> Result<Vec<LeaveWithDetails>, ServiceError> {
        let Some(employee) = self
            .employees_repo
            .find_by_user_id(caller.account_id)
            .await?
        else {
            return Err(ServiceError::not_found("Employee not found"));
        };
        Ok(self
            .leaves_repo
            .find_by_employee_with_details(employee.id)
            .await?)
    }

    async fn transition(
        &self,
        id: i64,
        new_status: Option<&str>,
        caller: Caller,
    ) -> Result<leaves::Model, ServiceError> {
        if !caller.is_admin() {
            return Err(ServiceError::forbidden(
                "Only admins can approve or reject leave requests",
            ));
        }
        let new_status = match new_status {
            Some(STATUS_APPROVED) => STATUS_APPROVED,
            Some(STATUS_REJECTED) => STATUS_REJECTED,
            _ => return Err(ServiceError::invalid("Invalid status")),
        };

        let Some(leave) = self.leaves_repo.find_by_id(id).await? else {
            return Err(ServiceError::not_found("Leave request not found"));
        };
        // Approved and rejected are terminal states.
        if leave.status != STATUS_PENDING {
            return Err(ServiceError::conflict(
                "Leave request has already been processed",
            ));
        }

        let mut active: leaves::ActiveModel = leave.into();
        active.status = sea_orm::Set(new_status.to_string());
        active.approved_by = sea_orm::Set(Some(caller.account_id));
        active.approved_date = sea_orm::Set(Some(Utc::now().into()));
        Ok(self.leaves_repo.update(active).await?)
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self.leaves_repo.delete_by_id(id).await?;
        if deleted == 0 {
            return Err(ServiceError::not_found("Leave request not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::employees;
    use crate::service::auth::Role;
    use sea_orm::{ActiveValue, DatabaseTransaction};
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_after_to_is_rejected() {
        let err = validate_dates(date(2024, 1, 2), date(2023, 12, 31), date(2024, 1, 1))
            .unwrap_err();
        assert_eq!(err.to_string(), "From date cannot be after to date");
    }

    #[test]
    fn past_from_date_is_rejected() {
        let err = validate_dates(date(2023, 12, 31), date(2024, 1, 2), date(2024, 1, 1))
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot apply leave for past dates");
    }

    #[test]
    fn from_date_today_is_accepted() {
        assert!(validate_dates(date(2024, 1, 1), date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn submit_requires_all_fields_and_a_known_type() {
        let today = date(2024, 1, 1);
        let err = validate_submit(&SubmitLeaveInput::default(), today).unwrap_err();
        assert_eq!(err.to_string(), "All fields are required");

        let input = SubmitLeaveInput {
            leave_type: Some("sabbatical".to_string()),
            from_date: Some("2024-01-02".to_string()),
            to_date: Some("2024-01-03".to_string()),
            description: Some("x".to_string()),
        };
        assert_eq!(
            validate_submit(&input, today).unwrap_err().to_string(),
            "Invalid leave type"
        );
    }

    struct MockLeavesRepo {
        leaves: Mutex<Vec<leaves::Model>>,
    }

    #[async_trait]
    impl LeavesRepo for MockLeavesRepo {
        async fn insert(
            &self,
            _model: leaves::ActiveModel,
        ) -> Result<leaves::Model, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<leaves::Model>, sea_orm::DbErr> {
            Ok(self
                .leaves
                .lock()
                .unwrap()
                .iter()
                .find(|l| l.id == id)
                .cloned())
        }

        async fn find_by_id_with_details(
            &self,
            _id: i64,
        ) -> Result<Option<LeaveWithDetails>, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }

        async fn find_all_with_details(&self) -> Result<Vec<LeaveWithDetails>, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }

        async fn find_by_employee_with_details(
            &self,
            _employee_id: i64,
        ) -> Result<Vec<LeaveWithDetails>, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }

        async fn update(
            &self,
            model: leaves::ActiveModel,
        ) -> Result<leaves::Model, sea_orm::DbErr> {
            let mut leaves = self.leaves.lock().unwrap();
            let id = match model.id {
                ActiveValue::Set(id) | ActiveValue::Unchanged(id) => id,
                ActiveValue::NotSet => panic!("update without id"),
            };
            let stored = leaves.iter_mut().find(|l| l.id == id).unwrap();
            if let ActiveValue::Set(status) = model.status {
                stored.status = status;
            }
            if let ActiveValue::Set(approved_by) = model.approved_by {
                stored.approved_by = approved_by;
            }
            if let ActiveValue::Set(approved_date) = model.approved_date {
                stored.approved_date = approved_date;
            }
            Ok(stored.clone())
        }

        async fn delete_by_id(&self, _id: i64) -> Result<u64, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }

        async fn delete_by_employee_with_txn(
            &self,
            _txn: &DatabaseTransaction,
            _employee_id: i64,
        ) -> Result<u64, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }
    }

    struct NoEmployeesRepo;

    #[async_trait]
    impl EmployeesRepo for NoEmployeesRepo {
        async fn insert_with_txn(
            &self,
            _txn: &DatabaseTransaction,
            _model: employees::ActiveModel,
        ) -> Result<employees::Model, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }

        async fn find_by_id(
            &self,
            _id: i64,
        ) -> Result<Option<employees::Model>, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }

        async fn find_by_user_id(
            &self,
            _user_id: i64,
        ) -> Result<Option<employees::Model>, sea_orm::DbErr> {
            Ok(None)
        }

        async fn find_active_with_details(
            &self,
        ) -> Result<Vec<crate::repo::employees::EmployeeWithDetails>, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }

        async fn find_by_id_with_details(
            &self,
            _id: i64,
        ) -> Result<Option<crate::repo::employees::EmployeeWithDetails>, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }

        async fn update(
            &self,
            _model: employees::ActiveModel,
        ) -> Result<employees::Model, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }

        async fn delete_by_id_with_txn(
            &self,
            _txn: &DatabaseTransaction,
            _id: i64,
        ) -> Result<u64, sea_orm::DbErr> {
            unimplemented!("not exercised by transition tests")
        }
    }

    fn pending_leave(id: i64) -> leaves::Model {
        leaves::Model {
            id,
            employee_id: 7,
            leave_type: "sick".to_string(),
            from_date: date(2024, 6, 1),
            to_date: date(2024, 6, 3),
            description: "flu".to_string(),
            status: STATUS_PENDING.to_string(),
            applied_date: Utc::now().into(),
            approved_by: None,
            approved_date: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn service_with(leaves: Vec<leaves::Model>) -> LeavesServiceImpl {
        LeavesServiceImpl::new(
            Arc::new(MockLeavesRepo {
                leaves: Mutex::new(leaves),
            }),
            Arc::new(NoEmployeesRepo),
        )
    }

    const ADMIN: Caller = Caller {
        account_id: 1,
        role: Role::Admin,
    };
    const EMPLOYEE: Caller = Caller {
        account_id: 2,
        role: Role::Employee,
    };

    #[tokio::test]
    async fn non_admin_cannot_transition() {
        let svc = service_with(vec![pending_leave(10)]);
        let err = svc
            .transition(10, Some(STATUS_APPROVED), EMPLOYEE)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn pending_leave_transitions_to_approved_with_audit_fields() {
        let svc = service_with(vec![pending_leave(10)]);
        let updated = svc
            .transition(10, Some(STATUS_APPROVED), ADMIN)
            .await
            .unwrap();
        assert_eq!(updated.status, STATUS_APPROVED);
        assert_eq!(updated.approved_by, Some(ADMIN.account_id));
        assert!(updated.approved_date.is_some());
    }

    #[tokio::test]
    async fn approved_and_rejected_are_terminal() {
        let svc = service_with(vec![pending_leave(10)]);
        svc.transition(10, Some(STATUS_REJECTED), ADMIN)
            .await
            .unwrap();
        let err = svc
            .transition(10, Some(STATUS_APPROVED), ADMIN)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn transition_rejects_statuses_outside_the_machine() {
        let svc = service_with(vec![pending_leave(10)]);
        for bad in [Some(STATUS_PENDING), Some("cancelled"), None] {
            let err = svc.transition(10, bad, ADMIN).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
    }
}
