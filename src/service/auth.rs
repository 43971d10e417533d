use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::users, error::ServiceError, repo::users::UsersRepo, service::config::ConfigService,
};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }
}

/// The resolved identity every protected handler acts on behalf of.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub account_id: i64,
    pub role: Role,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

pub(crate) fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| ServiceError::Internal(format!("password hash failed: {err}")))?
        .to_string();
    Ok(hash)
}

pub(crate) fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn issue_token(
    secret: &str,
    ttl_seconds: u64,
    account_id: i64,
    role: Role,
) -> Result<String, ServiceError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: account_id,
        role,
        jti: Uuid::new_v4().simple().to_string(),
        iat: now,
        exp: now + ttl_seconds as i64,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| ServiceError::Internal(format!("token signing failed: {err}")))
}

fn decode_token(secret: &str, token: &str) -> Result<Claims, ServiceError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ServiceError::unauthenticated("Invalid or expired token"))
}

#[derive(Debug)]
pub struct LoginOutput {
    pub token: String,
    pub user: users::Model,
}

pub struct ChangePasswordInput {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutput, ServiceError>;
    fn verify_token(&self, token: &str) -> Result<Claims, ServiceError>;
    async fn change_password(
        &self,
        account_id: i64,
        input: ChangePasswordInput,
    ) -> Result<(), ServiceError>;
}

pub struct AuthServiceImpl {
    users_repo: Arc<dyn UsersRepo>,
    config: Arc<dyn ConfigService>,
}

impl AuthServiceImpl {
    pub fn new(users_repo: Arc<dyn UsersRepo>, config: Arc<dyn ConfigService>) -> Self {
        Self { users_repo, config }
    }

    fn secret(&self) -> Result<&str, ServiceError> {
        self.config
            .values()
            .jwt_secret
            .as_deref()
            .ok_or_else(|| ServiceError::Internal("JWT_SECRET is not configured".to_string()))
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutput, ServiceError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(ServiceError::invalid("Email and password are required"));
        }

        // Unknown account and wrong password are deliberately the same
        // outcome so the response does not leak which emails exist.
        let Some(user) = self.users_repo.find_by_email(&email).await? else {
            return Err(ServiceError::unauthenticated("Invalid email or password"));
        };
        if !verify_password(&user.password_hash, password) {
            tracing::warn!(account_id = user.id, "failed login attempt");
            return Err(ServiceError::unauthenticated("Invalid email or password"));
        }

        let role = Role::parse(&user.role)
            .ok_or_else(|| ServiceError::Internal(format!("unknown role {}", user.role)))?;
        let token = issue_token(
            self.secret()?,
            self.config.values().token_ttl_seconds,
            user.id,
            role,
        )?;

        Ok(LoginOutput { token, user })
    }

    fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode_token(self.secret()?, token)
    }

    async fn change_password(
        &self,
        account_id: i64,
        input: ChangePasswordInput,
    ) -> Result<(), ServiceError> {
        let (Some(old_password), Some(new_password), Some(confirm_password)) = (
            input.old_password.as_deref().filter(|v| !v.is_empty()),
            input.new_password.as_deref().filter(|v| !v.is_empty()),
            input.confirm_password.as_deref().filter(|v| !v.is_empty()),
        ) else {
            return Err(ServiceError::invalid("All password fields are required"));
        };

        if new_password != confirm_password {
            return Err(ServiceError::invalid(
                "New password and confirm password do not match",
            ));
        }
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::invalid(
                "New password must be at least 6 characters long",
            ));
        }

        let Some(user) = self.users_repo.find_by_id(account_id).await? else {
            return Err(ServiceError::not_found("User not found"));
        };
        if !verify_password(&user.password_hash, old_password) {
            return Err(ServiceError::unauthenticated(
                "Current password is incorrect",
            ));
        }
        if verify_password(&user.password_hash, new_password) {
            return Err(ServiceError::invalid(
                "New password must be different from current password",
            ));
        }

        let password_hash = hash_password(new_password)?;
        let mut active: users::ActiveModel = user.into();
        active.password_hash = sea_orm::Set(password_hash);
        self.users_repo.update(active).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use sea_orm::DatabaseTransaction;
    use std::sync::Mutex;

    fn user(id: i64, email: &str, password: &str, role: Role) -> users::Model {
        users::Model {
            id,
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            role: role.as_str().to_string(),
            profile_image: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    struct MockUsersRepo {
        users: Mutex<Vec<users::Model>>,
    }

    impl MockUsersRepo {
        fn with(users: Vec<users::Model>) -> Arc<Self> {
            Arc::new(Self {
                users: Mutex::new(users),
            })
        }
    }

    #[async_trait]
    impl UsersRepo for MockUsersRepo {
        async fn insert_with_txn(
            &self,
            _txn: &DatabaseTransaction,
            _model: users::ActiveModel,
        ) -> Result<users::Model, sea_orm::DbErr> {
            unimplemented!("not exercised by auth tests")
        }

        async fn insert(
            &self,
            _model: users::ActiveModel,
        ) -> Result<users::Model, sea_orm::DbErr> {
            unimplemented!("not exercised by auth tests")
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, sea_orm::DbErr> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned())
        }

        async fn find_by_email(
            &self,
            email: &str,
        ) -> Result<Option<users::Model>, sea_orm::DbErr> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        async fn update(
            &self,
            model: users::ActiveModel,
        ) -> Result<users::Model, sea_orm::DbErr> {
            use sea_orm::ActiveValue;
            let mut users = self.users.lock().unwrap();
            let id = match model.id {
                ActiveValue::Set(id) | ActiveValue::Unchanged(id) => id,
                ActiveValue::NotSet => panic!("update without id"),
            };
            let stored = users.iter_mut().find(|u| u.id == id).unwrap();
            if let ActiveValue::Set(hash) = model.password_hash {
                stored.password_hash = hash;
            }
            if let ActiveValue::Set(name) = model.name {
                stored.name = name;
            }
            if let ActiveValue::Set(email) = model.email {
                stored.email = email;
            }
            Ok(stored.clone())
        }

        async fn delete_by_id_with_txn(
            &self,
            _txn: &DatabaseTransaction,
            _id: i64,
        ) -> Result<u64, sea_orm::DbErr> {
            unimplemented!("not exercised by auth tests")
        }
    }

    struct FixedConfig {
        config: Config,
    }

    impl FixedConfig {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                config: Config {
                    port: 0,
                    jwt_secret: Some("test-secret".to_string()),
                    token_ttl_seconds: 864_000,
                },
            })
        }
    }

    impl ConfigService for FixedConfig {
        fn port(&self) -> u16 {
            self.config.port
        }

        fn values(&self) -> &Config {
            &self.config
        }
    }

    fn service(users: Vec<users::Model>) -> AuthServiceImpl {
        AuthServiceImpl::new(MockUsersRepo::with(users), FixedConfig::new())
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("admin").unwrap();
        assert!(verify_password(&hash, "admin"));
        assert!(!verify_password(&hash, "Admin"));
    }

    #[test]
    fn token_round_trip_carries_identity_and_ttl() {
        let token = issue_token("test-secret", 864_000, 42, Role::Admin).unwrap();
        let claims = decode_token("test-secret", &token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 864_000);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = issue_token("test-secret", 864_000, 42, Role::Employee).unwrap();
        let err = decode_token("other-secret", &token).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: Role::Employee,
            jti: "jti".to_string(),
            iat: now - 1000,
            exp: now - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(decode_token("test-secret", &token).is_err());
    }

    #[tokio::test]
    async fn login_unknown_email_and_wrong_password_are_indistinguishable() {
        let svc = service(vec![user(1, "admin@gmail.com", "admin", Role::Admin)]);

        let unknown = svc.login("nobody@gmail.com", "admin").await.unwrap_err();
        let wrong = svc.login("admin@gmail.com", "nope").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(matches!(unknown, ServiceError::Unauthenticated(_)));
        assert!(matches!(wrong, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn login_is_case_insensitive_on_email_and_returns_admin_token() {
        let svc = service(vec![user(1, "admin@gmail.com", "admin", Role::Admin)]);

        let output = svc.login("Admin@Gmail.Com", "admin").await.unwrap();
        let claims = svc.verify_token(&output.token).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn change_password_enforces_confirmation_length_and_difference() {
        let svc = service(vec![user(1, "e@x.com", "oldpass", Role::Employee)]);

        let mismatch = svc
            .change_password(
                1,
                ChangePasswordInput {
                    old_password: Some("oldpass".into()),
                    new_password: Some("newpass1".into()),
                    confirm_password: Some("newpass2".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(mismatch, ServiceError::InvalidInput(_)));

        let too_short = svc
            .change_password(
                1,
                ChangePasswordInput {
                    old_password: Some("oldpass".into()),
                    new_password: Some("short".into()),
                    confirm_password: Some("short".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(too_short, ServiceError::InvalidInput(_)));

        let unchanged = svc
            .change_password(
                1,
                ChangePasswordInput {
                    old_password: Some("oldpass".into()),
                    new_password: Some("oldpass".into()),
                    confirm_password: Some("oldpass".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(unchanged, ServiceError::InvalidInput(_)));

        let wrong_old = svc
            .change_password(
                1,
                ChangePasswordInput {
                    old_password: Some("wrong".into()),
                    new_password: Some("newpass".into()),
                    confirm_password: Some("newpass".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(wrong_old, ServiceError::Unauthenticated(_)));

        svc.change_password(
            1,
            ChangePasswordInput {
                old_password: Some("oldpass".into()),
                new_password: Some("newpass".into()),
                confirm_password: Some("newpass".into()),
            },
        )
        .await
        .unwrap();
        assert!(svc.login("e@x.com", "newpass").await.is_ok());
    }
}
