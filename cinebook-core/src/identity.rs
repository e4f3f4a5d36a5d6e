use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A registered customer. `password_hash` is a PHC string, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already exists")]
    Conflict,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Account registration and credential verification.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<UserAccount, AuthError>;

    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    async fn verify(&self, email: &str, password: &str) -> Result<UserAccount, AuthError>;
}
