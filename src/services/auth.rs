use actix_web::{Error as ActixError, FromRequest, HttpRequest, dev::Payload, web::Data};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::{
    AuthResponse, ChangePasswordInput, CreateUserInput, LoginInput, Role, User,
};
use crate::database::repositories::{UserRepository, user::NewUser};
use crate::error::AppError;

const DEFAULT_ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // user id
    pub username: String,
    pub name: String,
    pub role: Role,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn user_id(&self) -> i64 {
        self.sub
    }

    /// Rejects the caller with 403 unless their role ranks at least `role`.
    pub fn require(&self, role: Role) -> Result<(), AppError> {
        if self.role.satisfies(role) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "This action requires the {} role or higher",
                role
            )))
        }
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|value| value.trim().to_string());
        let config = req.app_data::<Data<Config>>().cloned();
        let user_repository = req.app_data::<Data<UserRepository>>().cloned();

        Box::pin(async move {
            let Some(token) = token else {
                return Err(
                    AppError::unauthorized("Missing or invalid authorization header").into(),
                );
            };

            let (Some(config), Some(user_repository)) = (config, user_repository) else {
                log::error!("Config or UserRepository is not registered as app data");
                return Err(AppError::internal_server_error().into());
            };

            let claims = decode_token(&token, &config.jwt_secret).map_err(|e| {
                log::debug!("Rejected bearer token: {}", e);
                AppError::unauthorized("Invalid or expired token")
            })?;

            // Role and active flag come from the stored account, not the token.
            let user = user_repository
                .find_by_id(claims.sub)
                .await
                .map_err(AppError::from)?
                .filter(|user| user.is_active)
                .ok_or_else(|| AppError::unauthorized("Account is no longer active"))?;

            Ok(Claims {
                sub: user.id,
                username: user.username,
                name: user.name,
                role: user.role,
                exp: claims.exp,
            })
        })
    }
}

fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: UserRepository, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    pub async fn login(&self, request: LoginInput) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::unauthorized("Invalid username or password");

        let user = self
            .user_repository
            .find_by_username(request.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !user.is_active {
            log::warn!("Login attempt for inactive account {}", user.username);
            return Err(invalid());
        }

        let matches = verify(&request.password, &user.password_hash).map_err(|e| {
            log::error!("Failed to verify password hash: {}", e);
            AppError::internal_server_error()
        })?;
        if !matches {
            return Err(invalid());
        }

        let token = self.generate_token(&user)?;
        log::info!("User {} logged in", user.username);

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn create_user(&self, request: CreateUserInput) -> Result<User, AppError> {
        let username = request.username.trim().to_string();
        if username.is_empty() || request.name.trim().is_empty() {
            return Err(AppError::bad_request("Username and name are required"));
        }
        if request.password.is_empty() {
            return Err(AppError::bad_request("Password is required"));
        }

        if self.user_repository.username_exists(&username).await? {
            return Err(AppError::conflict("Username already exists"));
        }

        let password_hash = self.hash_password(&request.password)?;
        let user = self
            .user_repository
            .create_user(&NewUser {
                username,
                password_hash,
                name: request.name.trim().to_string(),
                email: request.email,
                role: request.role.unwrap_or_default(),
                employee_id: request.employee_id.filter(|id| *id > 0),
            })
            .await?;

        log::info!("Created user {} with role {}", user.username, user.role);
        Ok(user)
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        request: ChangePasswordInput,
    ) -> Result<(), AppError> {
        if request.new_password.is_empty() {
            return Err(AppError::bad_request("New password is required"));
        }

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let matches = verify(&request.old_password, &user.password_hash).map_err(|e| {
            log::error!("Failed to verify password hash: {}", e);
            AppError::internal_server_error()
        })?;
        if !matches {
            return Err(AppError::unauthorized("Old password is incorrect"));
        }

        let password_hash = self.hash_password(&request.new_password)?;
        self.user_repository
            .set_password(user.id, &password_hash)
            .await?;

        Ok(())
    }

    /// Creates the `admin` account when a bootstrap password is configured and
    /// no such account exists yet.
    pub async fn seed_admin(&self) -> Result<Option<User>, AppError> {
        let Some(password) = self.config.default_admin_password.clone() else {
            return Ok(None);
        };

        if self
            .user_repository
            .username_exists(DEFAULT_ADMIN_USERNAME)
            .await?
        {
            return Ok(None);
        }

        let user = self
            .create_user(CreateUserInput {
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                password,
                name: "Administrator".to_string(),
                email: String::new(),
                role: Some(Role::Admin),
                employee_id: None,
            })
            .await?;

        log::info!("Seeded default administrator account");
        Ok(Some(user))
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(self.config.jwt_expiration_hours))
            .ok_or_else(|| AppError::internal_server_error_message("Token expiry overflow"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
            exp: expiration,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|e| {
            log::error!("Failed to sign token: {}", e);
            AppError::internal_server_error()
        })
    }

    fn hash_password(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.config.bcrypt_cost).map_err(|e| {
            log::error!("Failed to hash password: {}", e);
            AppError::internal_server_error()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: 7,
            username: "clerk".to_string(),
            name: "Clerk".to_string(),
            role,
            exp: (Utc::now().timestamp() + 3600) as usize,
        }
    }

    #[test]
    fn require_enforces_role_ordering() {
        assert!(claims(Role::Admin).require(Role::Hr).is_ok());
        assert!(claims(Role::Hr).require(Role::Finance).is_ok());
        assert!(claims(Role::Finance).require(Role::Hr).is_err());
        assert!(claims(Role::Employee).require(Role::Finance).is_err());
        assert!(claims(Role::Employee).require(Role::Employee).is_ok());
    }

    #[test]
    fn token_round_trips_with_the_same_secret() {
        let secret = "unit-test-secret";
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims(Role::Finance),
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap();

        let decoded = decode_token(&token, secret).unwrap();
        assert_eq!(decoded.sub, 7);
        assert_eq!(decoded.role, Role::Finance);
        assert!(decode_token(&token, "another-secret").is_err());
    }
}
