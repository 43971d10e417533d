use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::{
    entities::users,
    repo::{
        attendance::AttendanceRepo, departments::DepartmentsRepo, employees::EmployeesRepo,
        leaves::LeavesRepo, salaries::SalariesRepo, users::UsersRepo,
    },
    service::{
        attendance::AttendanceService, auth::AuthService, config::ConfigService,
        departments::DepartmentsService, employees::EmployeesService, leaves::LeavesService,
        salaries::SalariesService,
    },
};

pub trait DatabaseClient: Send + Sync {
    fn conn(&self) -> &DatabaseConnection;
}

pub struct SeaOrmDatabaseClient {
    conn: DatabaseConnection,
}

impl SeaOrmDatabaseClient {
    pub async fn new() -> Self {
        let conn = crate::db::connect()
            .await
            .expect("database connection failed");
        crate::schema::apply(&conn)
            .await
            .expect("schema apply failed");
        Self { conn }
    }
}

impl DatabaseClient for SeaOrmDatabaseClient {
    fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

pub struct AppState {
    db: Arc<dyn DatabaseClient>,
    users_repo: Arc<dyn UsersRepo>,
    auth: Arc<dyn AuthService>,
    departments: Arc<dyn DepartmentsService>,
    employees: Arc<dyn EmployeesService>,
    leaves: Arc<dyn LeavesService>,
    salaries: Arc<dyn SalariesService>,
    attendance: Arc<dyn AttendanceService>,
    config: Arc<dyn ConfigService>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let db: Arc<dyn DatabaseClient> = Arc::new(SeaOrmDatabaseClient::new().await);

        let users_repo: Arc<dyn UsersRepo> =
            Arc::new(crate::repo::users::SeaOrmUsersRepo::new(db.clone()));
        let departments_repo: Arc<dyn DepartmentsRepo> = Arc::new(
            crate::repo::departments::SeaOrmDepartmentsRepo::new(db.clone()),
        );
        let employees_repo: Arc<dyn EmployeesRepo> =
            Arc::new(crate::repo::employees::SeaOrmEmployeesRepo::new(db.clone()));
        let leaves_repo: Arc<dyn LeavesRepo> =
            Arc::new(crate::repo::leaves::SeaOrmLeavesRepo::new(db.clone()));
        let salaries_repo: Arc<dyn SalariesRepo> =
            Arc::new(crate::repo::salaries::SeaOrmSalariesRepo::new(db.clone()));
        let attendance_repo: Arc<dyn AttendanceRepo> =
            Arc::new(crate::repo::attendance::SeaOrmAttendanceRepo::new(db.clone()));

        let config: Arc<dyn ConfigService> =
            Arc::new(crate::service::config::ConfigServiceImpl::new());

        let auth: Arc<dyn AuthService> = Arc::new(crate::service::auth::AuthServiceImpl::new(
            users_repo.clone(),
            config.clone(),
        ));
        let departments: Arc<dyn DepartmentsService> = Arc::new(
            crate::service::departments::DepartmentsServiceImpl::new(departments_repo.clone()),
        );
        let employees: Arc<dyn EmployeesService> =
            Arc::new(crate::service::employees::EmployeesServiceImpl::new(
                db.clone(),
                users_repo.clone(),
                employees_repo.clone(),
                departments_repo.clone(),
                leaves_repo.clone(),
                salaries_repo.clone(),
                attendance_repo.clone(),
            ));
        let leaves: Arc<dyn LeavesService> = Arc::new(
            crate::service::leaves::LeavesServiceImpl::new(leaves_repo, employees_repo.clone()),
        );
        let salaries: Arc<dyn SalariesService> = Arc::new(
            crate::service::salaries::SalariesServiceImpl::new(
                salaries_repo,
                employees_repo.clone(),
            ),
        );
        let attendance: Arc<dyn AttendanceService> = Arc::new(
            crate::service::attendance::AttendanceServiceImpl::new(attendance_repo, employees_repo),
        );

        let state = Arc::new(Self {
            db,
            users_repo,
            auth,
            departments,
            employees,
            leaves,
            salaries,
            attendance,
            config,
        });

        state
            .ensure_admin_account()
            .await
            .expect("admin bootstrap failed");

        state
    }

    /// First-run bootstrap: the API is unusable without at least one admin,
    /// so create the default one when no account holds that email yet.
    async fn ensure_admin_account(&self) -> Result<(), crate::error::ServiceError> {
        const ADMIN_EMAIL: &str = "admin@gmail.com";

        if self.users_repo.find_by_email(ADMIN_EMAIL).await?.is_some() {
            return Ok(());
        }

        let password_hash = crate::service::auth::hash_password("admin")?;
        self.users_repo
            .insert(users::ActiveModel {
                name: sea_orm::Set("Admin".to_string()),
                email: sea_orm::Set(ADMIN_EMAIL.to_string()),
                password_hash: sea_orm::Set(password_hash),
                role: sea_orm::Set(crate::service::auth::Role::Admin.as_str().to_string()),
                ..Default::default()
            })
            .await?;
        tracing::info!(email = ADMIN_EMAIL, "seeded default admin account");
        Ok(())
    }

    pub fn db(&self) -> &dyn DatabaseClient {
        self.db.as_ref()
    }

    pub fn users_repo(&self) -> &dyn UsersRepo {
        self.users_repo.as_ref()
    }

    pub fn auth(&self) -> &dyn AuthService {
        self.auth.as_ref()
    }

    pub fn departments(&self) -> &dyn DepartmentsService {
        self.departments.as_ref()
    }

    pub fn employees(&self) -> &dyn EmployeesService {
        self.employees.as_ref()
    }

    pub fn leaves(&self) -> &dyn LeavesService {
        self.leaves.as_ref()
    }

    pub fn salaries(&self) -> &dyn SalariesService {
        self.salaries.as_ref()
    }

    pub fn attendance(&self) -> &dyn AttendanceService {
        self.attendance.as_ref()
    }

    pub fn config(&self) -> &dyn ConfigService {
        self.config.as_ref()
    }
}
