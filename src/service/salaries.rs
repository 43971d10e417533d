use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    entities::salaries,
    error::ServiceError,
    repo::{
        employees::EmployeesRepo,
        salaries::{SalariesRepo, SalaryWithDetails},
    },
    service::{auth::Caller, parse_date},
};

#[derive(Default)]
pub struct AddSalaryInput {
    pub employee_id: Option<i64>,
    pub basic_salary: Option<f64>,
    pub allowances: Option<f64>,
    pub deductions: Option<f64>,
    pub pay_date: Option<String>,
}

#[derive(Default)]
pub struct UpdateSalaryInput {
    pub basic_salary: Option<f64>,
    pub allowances: Option<f64>,
    pub deductions: Option<f64>,
    pub pay_date: Option<String>,
}

/// The stored net is always derived here; client-supplied values never
/// reach the database.
fn net_salary(basic: f64, allowances: f64, deductions: f64) -> f64 {
    basic + allowances - deductions
}

#[async_trait]
pub trait SalariesService: Send + Sync {
    async fn add(&self, input: AddSalaryInput) -> Result<salaries::Model, ServiceError>;
    async fn update(
        &self,
        id: i64,
        input: UpdateSalaryInput,
    ) -> Result<salaries::Model, ServiceError>;
    async fn list_all(&self) -> Result<Vec<SalaryWithDetails>, ServiceError>;
    async fn get(&self, id: i64) -> Result<SalaryWithDetails, ServiceError>;
    async fn by_employee(
        &self,
        employee_id: i64,
        caller: Caller,
    ) -> Result<Vec<SalaryWithDetails>, ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

pub struct SalariesServiceImpl {
    salaries_repo: Arc<dyn SalariesRepo>,
    employees_repo: Arc<dyn EmployeesRepo>,
}

impl SalariesServiceImpl {
    pub fn new(
        salaries_repo: Arc<dyn SalariesRepo>,
        employees_repo: Arc<dyn EmployeesRepo>,
    ) -> Self {
        Self {
            salaries_repo,
            employees_repo,
        }
    }
}

#[async_trait]
impl SalariesService for SalariesServiceImpl {
    async fn add(&self, input: AddSalaryInput) -> Result<salaries::Model, ServiceError> {
        let (Some(employee_id), Some(basic_salary), Some(pay_date)) = (
            input.employee_id,
            input.basic_salary,
            input.pay_date.as_deref(),
        ) else {
            return Err(ServiceError::invalid(
                "Employee ID, basic salary, and pay date are required",
            ));
        };
        let pay_date = parse_date("pay date", pay_date)?;

        if self.employees_repo.find_by_id(employee_id).await?.is_none() {
            return Err(ServiceError::not_found("Employee not found"));
        }

        let allowances = input.allowances.unwrap_or(0.0);
        let deductions = input.deductions.unwrap_or(0.0);
        let model = salaries::ActiveModel {
            employee_id: sea_orm::Set(employee_id),
            basic_salary: sea_orm::Set(basic_salary),
            allowances: sea_orm::Set(allowances),
            deductions: sea_orm::Set(deductions),
            net_salary: sea_orm::Set(net_salary(basic_salary, allowances, deductions)),
            pay_date: sea_orm::Set(pay_date),
            ..Default::default()
        };
        Ok(self.salaries_repo.insert(model).await?)
    }

    async fn update(
        &self,
        id: i64,
        input: UpdateSalaryInput,
    ) -> Result<salaries::Model, ServiceError> {
        let (Some(basic_salary), Some(pay_date)) =
            (input.basic_salary, input.pay_date.as_deref())
        else {
            return Err(ServiceError::invalid(
                "Basic salary and pay date are required",
            ));
        };
        let pay_date = parse_date("pay date", pay_date)?;

        let Some(model) = self.salaries_repo.find_by_id(id).await? else {
            return Err(ServiceError::not_found("Salary record not found"));
        };

        let allowances = input.allowances.unwrap_or(0.0);
        let deductions = input.deductions.unwrap_or(0.0);
        let mut active: salaries::ActiveModel = model.into();
        active.basic_salary = sea_orm::Set(basic_salary);
        active.allowances = sea_orm::Set(allowances);
        active.deductions = sea_orm::Set(deductions);
        active.net_salary = sea_orm::Set(net_salary(basic_salary, allowances, deductions));
        active.pay_date = sea_orm::Set(pay_date);
        Ok(self.salaries_repo.update(active).await?)
    }

    async fn list_all(&self) -> Result<Vec<SalaryWithDetails>, ServiceError> {
        Ok(self.salaries_repo.find_active_with_details().await?)
    }

    async fn get(&self, id: i64) -> Result<SalaryWithDetails, ServiceError> {
        self.salaries_repo
            .find_by_id_with_details(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Salary record not found"))
    }

    async fn by_employee(
        &self,
        employee_id: i64,
        caller: Caller,
    ) -> Result<Vec<SalaryWithDetails>, ServiceError> {
        let Some(employee) = self.employees_repo.find_by_id(employee_id).await? else {
            return Err(ServiceError::not_found("Employee not found"));
        };
        if !caller.is_admin() && employee.user_id != caller.account_id {
            return Err(ServiceError::forbidden(
                "Access denied. You can only view your own salary history.",
            ));
        }
        Ok(self
            .salaries_repo
            .find_by_employee_with_details(employee_id)
            .await?)
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let deleted = self.salaries_repo.delete_by_id(id).await?;
        if deleted == 0 {
            return Err(ServiceError::not_found("Salary record not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::net_salary;

    #[test]
    fn net_is_basic_plus_allowances_minus_deductions() {
        assert_eq!(net_salary(1000.0, 200.0, 50.0), 1150.0);
    }

    #[test]
    fn net_with_zero_allowances_and_deductions_is_basic() {
        assert_eq!(net_salary(1000.0, 0.0, 0.0), 1000.0);
    }

    #[test]
    fn net_can_go_negative_when_deductions_dominate() {
        assert_eq!(net_salary(100.0, 0.0, 250.0), -150.0);
    }
}
