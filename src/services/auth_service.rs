//! Authentication service - registration, login and session tokens.
//!
//! Password handling lives in the domain `Password` value object; this service
//! only orchestrates lookups, hashing and token issuance.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{Config, DUPLICATE_EMAIL_MESSAGE};
use crate::domain::{Password, Registration, User, UserRole, UserSummary};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Argon2 hash verified when the email is unknown so both paths cost the same
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$ZHVtbXloYXNoMTIzNDU2Nzg5MDEyMzQ1Njc4OTAxMg";

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// A freshly issued session: signed token plus the public view of its user
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub expires_in: i64,
    pub user: UserSummary,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign it in
    async fn register(&self, registration: Registration) -> AppResult<AuthSession>;

    /// Exchange credentials for a session
    async fn login(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn issue_session(user: User, config: &Config) -> AppResult<AuthSession> {
    let now = Utc::now();
    let expires_at = now + Duration::seconds(config.session_max_age_seconds());

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(AuthSession {
        token,
        expires_in: config.session_max_age_seconds(),
        user: UserSummary::from(user),
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        let Registration {
            full_name,
            email,
            password,
            role,
        } = registration;

        let role: UserRole = role.trim().parse()?;

        let full_name = full_name.trim().to_string();
        let email = email.trim().to_string();
        if full_name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::validation("All fields are required"));
        }

        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(DUPLICATE_EMAIL_MESSAGE));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .uow
            .users()
            .create(full_name, email, password_hash, role)
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        issue_session(user, &self.config)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }

        let user = self.uow.users().find_by_email(email).await?;

        // Verify even when the user is unknown so response time does not
        // reveal which emails are registered.
        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| DUMMY_HASH.to_string());
        let password_valid = Password::from_hash(stored_hash).verify(&password);

        match user {
            Some(user) if password_valid => {
                tracing::info!(user_id = %user.id, "User logged in");
                issue_session(user, &self.config)
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        HistoryRepository, MockHistoryRepository, MockProductRepository, MockUserRepository,
        ProductRepository, UserRepository,
    };

    struct TestUnitOfWork {
        users: Arc<MockUserRepository>,
    }

    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn products(&self) -> Arc<dyn ProductRepository> {
            Arc::new(MockProductRepository::new())
        }

        fn history(&self) -> Arc<dyn HistoryRepository> {
            Arc::new(MockHistoryRepository::new())
        }
    }

    fn config() -> Config {
        Config::new("sqlite::memory:", "test-secret-key-minimum-32-chars!!")
    }

    fn service(users: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork {
            users: Arc::new(users),
        };
        Authenticator::new(Arc::new(uow), config())
    }

    fn stored_user(email: &str, password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Jane Doe".to_string(),
            email: email.to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            role: UserRole::Admin,
            created_at: Utc::now(),
        }
    }

    fn registration(role: &str) -> Registration {
        Registration {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "hunter22".to_string(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_issues_session() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|name, email, hash, role| {
                name == "Jane Doe"
                    && email == "jane@example.com"
                    && hash.starts_with("$argon2")
                    && *role == UserRole::SuperAdmin
            })
            .times(1)
            .returning(|full_name, email, password_hash, role| {
                Ok(User {
                    id: Uuid::new_v4(),
                    full_name,
                    email,
                    password_hash,
                    role,
                    created_at: Utc::now(),
                })
            });

        let auth = service(users);
        let session = auth.register(registration("super_admin")).await.unwrap();

        assert_eq!(session.user.email, "jane@example.com");
        assert_eq!(session.user.role, UserRole::SuperAdmin);
        let claims = auth.verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id);
        assert_eq!(claims.role, "super_admin");
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let users = MockUserRepository::new();
        let err = service(users)
            .register(registration("owner"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid role specified"));
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let users = MockUserRepository::new();
        let mut input = registration("admin");
        input.full_name = "   ".to_string();

        let err = service(users).register(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "All fields are required"));
    }

    #[tokio::test]
    async fn test_register_checks_role_before_fields() {
        let users = MockUserRepository::new();
        let err = service(users)
            .register(Registration::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid role specified"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "whatever"))));
        users.expect_create().never();

        let err = service(users)
            .register(registration("admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == DUPLICATE_EMAIL_MESSAGE));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "correct-horse"))));

        let session = service(users)
            .login("jane@example.com".to_string(), "correct-horse".to_string())
            .await
            .unwrap();
        assert_eq!(session.user.email, "jane@example.com");
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "correct-horse"))));

        let err = service(users)
            .login("jane@example.com".to_string(), "battery-staple".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email_matches_wrong_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let err = service(users)
            .login("ghost@example.com".to_string(), "anything".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let auth = service(MockUserRepository::new());
        assert!(auth.verify_token("not.a.jwt").is_err());

        let other = Config::new("sqlite::memory:", "another-secret-key-minimum-32-chars");
        let user = stored_user("jane@example.com", "pw");
        let foreign = issue_session(user, &other).unwrap();
        assert!(auth.verify_token(&foreign.token).is_err());
    }
}
