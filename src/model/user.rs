use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::ValidationError;

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn verify_password(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.password_hash) else {
            tracing::warn!(user_id = self.id, "stored password hash is malformed");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// A `NewUser` whose password has already been hashed; the only shape a
/// store accepts.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
}

impl NewUser {
    pub fn hash(self) -> Result<UserCredentials, CredentialsError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ValidationError::field("Invalid user", "username", "must not be empty").into());
        }
        if self.password.is_empty() {
            return Err(ValidationError::field("Invalid user", "password", "must not be empty").into());
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(self.password.as_bytes(), &salt)
            .map_err(CredentialsError::Hash)?
            .to_string();

        Ok(UserCredentials {
            username: username.to_owned(),
            password_hash,
        })
    }
}
