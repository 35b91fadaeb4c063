//! Account bootstrap for stores that start empty.

use clap::Args;
use tracing::info;

use emenu_core::services::AuthService;
use emenu_core::{DomainError, User};

#[derive(Args, Debug, Clone, Default)]
pub struct SeedAccount {
    /// Create this account at startup (requires --in-memory)
    #[arg(long = "seed-username", requires_all = ["in_memory", "seed_password"])]
    pub username: Option<String>,

    #[arg(long = "seed-email", default_value = "admin@example.com")]
    pub email: String,

    #[arg(long = "seed-password", id = "seed_password", env = "EMENU_SEED_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl SeedAccount {
    /// Creates the account when a username was given; `None` otherwise.
    pub async fn apply(&self, auth: &AuthService) -> Result<Option<User>, DomainError> {
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            return Ok(None);
        };
        let user = auth.create_user(username, "", "", &self.email, password).await?;
        info!("Seeded account {} ({})", user.username, user.id);
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use emenu_infrastructure::InMemoryStore;
    use emenu_security::JwtService;

    fn auth(store: Arc<InMemoryStore>) -> AuthService {
        AuthService::new(store, JwtService::new("seed-test-secret-0123456789abcdef", 3600))
    }

    #[tokio::test]
    async fn test_seeded_account_can_log_in() {
        let auth = auth(Arc::new(InMemoryStore::new()));
        let seed = SeedAccount {
            username: Some("chef".to_string()),
            email: "chef@example.com".to_string(),
            password: Some("correct horse battery".to_string()),
        };

        let user = seed.apply(&auth).await.unwrap().unwrap();
        assert_eq!(user.username, "chef");

        let token = auth.login("chef", "correct horse battery").await.unwrap();
        let principal = auth.authenticate(&token.access_token).await.unwrap();
        assert_eq!(principal.user_id, user.id);
    }

    #[tokio::test]
    async fn test_no_username_seeds_nothing() {
        let auth = auth(Arc::new(InMemoryStore::new()));
        let seed = SeedAccount {
            password: Some("correct horse battery".to_string()),
            ..Default::default()
        };
        assert!(seed.apply(&auth).await.unwrap().is_none());
        assert!(auth.login("admin", "correct horse battery").await.is_err());
    }
}
