//! ============================================================================
//! Auth Backend - Credential verification boundary
//! ============================================================================
//! `SessionStore` never checks credentials itself. It asks an `AuthBackend`.
//! `DemoAuthBackend` accepts fixed demo credentials after a simulated delay;
//! a real implementation replaces it without touching the session contract.
//! ============================================================================

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, warn};

use super::types::{Identity, SocialProvider, UserRole};
use crate::pending::{SimulatedLatency, DEFAULT_SELLER_LATENCY_MS};
use crate::types::StorefrontError;

pub const DEMO_USER_EMAIL: &str = "demo@example.com";
pub const DEMO_USER_PASSWORD: &str = "password123";

pub const DEMO_SELLER_EMAIL: &str = "seller@example.com";
pub const DEMO_SELLER_PASSWORD: &str = "sellerpass123";

pub const DEMO_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEMO_ADMIN_PASSWORD: &str = "adminpass123";
pub const DEMO_ADMIN_KEY: &str = "admin123";

/// Verifies credentials and mints identities
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Identity, StorefrontError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, StorefrontError>;

    async fn social_login(&self, provider: SocialProvider) -> Result<Identity, StorefrontError>;

    async fn seller_login(&self, email: &str, password: &str) -> Result<Identity, StorefrontError>;

    async fn admin_login(
        &self,
        email: &str,
        password: &str,
        admin_key: &str,
    ) -> Result<Identity, StorefrontError>;
}

/// Hardcoded demo accounts behind a fixed delay.
/// Registration and social login always succeed; nothing is checked for
/// uniqueness.
#[derive(Debug, Clone)]
pub struct DemoAuthBackend {
    latency: SimulatedLatency,
    seller_latency: SimulatedLatency,
}

impl Default for DemoAuthBackend {
    fn default() -> Self {
        Self {
            latency: SimulatedLatency::default(),
            seller_latency: SimulatedLatency::from_millis(DEFAULT_SELLER_LATENCY_MS),
        }
    }
}

impl DemoAuthBackend {
    /// Same delay for every operation
    pub fn new(latency: SimulatedLatency) -> Self {
        Self {
            latency,
            seller_latency: latency,
        }
    }

    /// Seller sign-in runs on its own, shorter delay
    pub fn with_seller_latency(mut self, latency: SimulatedLatency) -> Self {
        self.seller_latency = latency;
        self
    }
}

fn generated_user_id() -> String {
    format!("user-{}", chrono::Utc::now().timestamp_millis())
}

#[async_trait]
impl AuthBackend for DemoAuthBackend {
    async fn login(&self, email: &str, password: &str) -> Result<Identity, StorefrontError> {
        self.latency.wait().await;

        if email == DEMO_USER_EMAIL && password == DEMO_USER_PASSWORD {
            return Ok(Identity::new(
                "user-1".into(),
                "DemoUser".into(),
                email.to_string(),
                UserRole::User,
            ));
        }

        warn!("Rejected login for {}", email);
        Err(StorefrontError::InvalidCredentials)
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        _password: &str,
    ) -> Result<Identity, StorefrontError> {
        self.latency.wait().await;

        debug!("Registering {} <{}>", username, email);
        Ok(Identity::new(
            generated_user_id(),
            username.to_string(),
            email.to_string(),
            UserRole::User,
        ))
    }

    async fn social_login(&self, provider: SocialProvider) -> Result<Identity, StorefrontError> {
        self.latency.wait().await;

        let (name_suffix, mail_suffix) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(0..1000), rng.gen_range(0..1000))
        };
        let name = provider.as_str();
        Ok(Identity::new(
            generated_user_id(),
            format!("{}User{}", name, name_suffix),
            format!("{}user{}@example.com", name, mail_suffix),
            UserRole::User,
        )
        .with_provider(provider))
    }

    async fn seller_login(&self, email: &str, password: &str) -> Result<Identity, StorefrontError> {
        self.seller_latency.wait().await;

        if email == DEMO_SELLER_EMAIL && password == DEMO_SELLER_PASSWORD {
            return Ok(Identity::new(
                "seller-1".into(),
                "DemoSeller".into(),
                email.to_string(),
                UserRole::Seller,
            ));
        }

        warn!("Rejected seller login for {}", email);
        Err(StorefrontError::InvalidCredentials)
    }

    async fn admin_login(
        &self,
        email: &str,
        password: &str,
        admin_key: &str,
    ) -> Result<Identity, StorefrontError> {
        self.latency.wait().await;

        if email == DEMO_ADMIN_EMAIL && password == DEMO_ADMIN_PASSWORD && admin_key == DEMO_ADMIN_KEY
        {
            return Ok(Identity::new(
                "admin-1".into(),
                "Admin".into(),
                email.to_string(),
                UserRole::Admin,
            ));
        }

        warn!("Rejected admin login for {}", email);
        Err(StorefrontError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> DemoAuthBackend {
        DemoAuthBackend::new(SimulatedLatency::instant())
    }

    #[tokio::test]
    async fn test_demo_login() {
        let identity = backend().login(DEMO_USER_EMAIL, DEMO_USER_PASSWORD).await.unwrap();
        assert_eq!(identity.id, "user-1");
        assert_eq!(identity.username, "DemoUser");
        assert_eq!(identity.role, UserRole::User);

        let err = backend().login(DEMO_USER_EMAIL, "wrong").await.unwrap_err();
        assert_eq!(err, StorefrontError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_register_always_succeeds() {
        let identity = backend().register("neo", "neo@example.com", "x").await.unwrap();
        assert!(identity.id.starts_with("user-"));
        assert_eq!(identity.username, "neo");
        assert_eq!(identity.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_social_login_tags_provider() {
        let identity = backend().social_login(SocialProvider::Discord).await.unwrap();
        assert!(identity.username.starts_with("discordUser"));
        assert!(identity.email.starts_with("discorduser"));
        assert!(identity.email.ends_with("@example.com"));
        assert_eq!(identity.provider, Some(SocialProvider::Discord));
    }

    #[tokio::test]
    async fn test_seller_and_admin_roles() {
        let seller = backend()
            .seller_login(DEMO_SELLER_EMAIL, DEMO_SELLER_PASSWORD)
            .await
            .unwrap();
        assert_eq!(seller.role, UserRole::Seller);

        let admin = backend()
            .admin_login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, DEMO_ADMIN_KEY)
            .await
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        assert!(backend()
            .admin_login(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, "guess")
            .await
            .is_err());
        assert!(backend()
            .seller_login(DEMO_USER_EMAIL, DEMO_USER_PASSWORD)
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_seller_login_uses_shorter_delay() {
        let backend = DemoAuthBackend::default();

        let start = tokio::time::Instant::now();
        backend
            .seller_login(DEMO_SELLER_EMAIL, DEMO_SELLER_PASSWORD)
            .await
            .unwrap();
        let seller_elapsed = start.elapsed();
        assert!(seller_elapsed >= std::time::Duration::from_millis(1000));
        assert!(seller_elapsed < std::time::Duration::from_millis(1500));

        let start = tokio::time::Instant::now();
        backend.login(DEMO_USER_EMAIL, DEMO_USER_PASSWORD).await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(1500));
    }
}
