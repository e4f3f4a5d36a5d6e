use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use cinebook_core::identity::{AuthError, AuthProvider, UserAccount};
use cinebook_shared::Masked;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory accounts with argon2id password hashes.
#[derive(Default)]
pub struct Argon2AccountStore {
    accounts: RwLock<HashMap<String, UserAccount>>,
}

impl Argon2AccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn hash_password(password: String) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

fn password_matches(password: &str, phc: &str) -> bool {
    PasswordHash::new(phc)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[async_trait]
impl AuthProvider for Argon2AccountStore {
    async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<UserAccount, AuthError> {
        if self.accounts.read().await.contains_key(email) {
            return Err(AuthError::Conflict);
        }

        // argon2 is CPU-bound
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))??;

        let account = UserAccount {
            email: email.to_string(),
            username: username.to_string(),
            password_hash,
        };

        match self.accounts.write().await.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AuthError::Conflict),
            Entry::Vacant(slot) => {
                info!("Registered account {}", Masked::from(email));
                Ok(slot.insert(account).clone())
            }
        }
    }

    async fn verify(&self, email: &str, password: &str) -> Result<UserAccount, AuthError> {
        let account = self
            .accounts
            .read()
            .await
            .get(email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        let password = password.to_string();
        let phc = account.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || password_matches(&password, &phc))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        if matches {
            Ok(account)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_then_verify() {
        let store = Argon2AccountStore::new();
        let account = store.register("a@x.com", "alice", "s3cret").await.unwrap();

        assert_eq!(account.username, "alice");
        assert!(account.password_hash.starts_with("$argon2"));
        assert_ne!(account.password_hash, "s3cret");

        let verified = store.verify("a@x.com", "s3cret").await.unwrap();
        assert_eq!(verified.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let store = Argon2AccountStore::new();
        store.register("a@x.com", "alice", "s3cret").await.unwrap();

        assert!(matches!(
            store.verify("a@x.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            store.verify("b@x.com", "s3cret").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = Argon2AccountStore::new();
        store.register("a@x.com", "alice", "one").await.unwrap();
        assert!(matches!(
            store.register("a@x.com", "alice2", "two").await,
            Err(AuthError::Conflict)
        ));
    }
}
