//! ============================================================================
//! Session Module - At most one signed-in identity
//! ============================================================================
//! Anonymous -> (login | register | social | seller | admin) -> Authenticated
//! Authenticated -> logout -> Anonymous
//!
//! Credential checks go through an [`AuthBackend`]; the session only tracks
//! the resulting identity, the state of the in-flight operation, and the
//! persisted copy under [`SESSION_KEY`].
//!
//! ## Usage
//! ```rust,ignore
//! let session = SessionStore::load(store, Arc::new(DemoAuthBackend::default()));
//! if session.login("demo@example.com", "password123").await {
//!     println!("hello {}", session.identity().unwrap().username);
//! }
//! ```
//! ============================================================================

mod backend;
mod types;

pub use backend::{
    AuthBackend, DemoAuthBackend, DEMO_ADMIN_EMAIL, DEMO_ADMIN_KEY, DEMO_ADMIN_PASSWORD,
    DEMO_SELLER_EMAIL, DEMO_SELLER_PASSWORD, DEMO_USER_EMAIL, DEMO_USER_PASSWORD,
};
pub use types::{Identity, SocialProvider, UserRole, DEFAULT_AVATAR};

use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::db::{decode_json, store_json, KeyValueStore, SESSION_KEY};
use crate::pending::{OperationState, DEFAULT_AUTH_TIMEOUT_MS};
use crate::types::StorefrontError;

#[derive(Debug)]
struct SessionState {
    identity: Option<Identity>,
    status: OperationState<UserRole>,
}

/// Session container. Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    backend: Arc<dyn AuthBackend>,
    state: Arc<RwLock<SessionState>>,
    timeout: Duration,
}

/// Resets a `Pending` status to `Idle` if the operation future is dropped
struct PendingGuard<'a> {
    state: &'a RwLock<SessionState>,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state.status.is_pending() {
            debug!("Auth operation cancelled before completion");
            state.status = OperationState::Idle;
        }
    }
}

impl SessionStore {
    /// Restore the persisted identity, if any. A value that does not decode
    /// is discarded; a failed read starts anonymous without touching it.
    pub fn load(store: Arc<dyn KeyValueStore>, backend: Arc<dyn AuthBackend>) -> Self {
        let identity = match store.get_raw(SESSION_KEY) {
            Ok(Some(bytes)) => match decode_json::<Identity>(SESSION_KEY, &bytes) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!("Discarding stored session: {}", e);
                    if let Err(e) = store.remove(SESSION_KEY) {
                        warn!("Failed to clear stored session: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read stored session, starting anonymous: {}", e);
                None
            }
        };

        if let Some(identity) = &identity {
            info!("Restored session for {} ({})", identity.username, identity.role.as_str());
        }

        Self {
            store,
            backend,
            state: Arc::new(RwLock::new(SessionState {
                identity,
                status: OperationState::Idle,
            })),
            timeout: Duration::from_millis(DEFAULT_AUTH_TIMEOUT_MS),
        }
    }

    /// Upper bound on a single backend call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read_state().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().identity.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().status.is_pending()
    }

    /// State of the most recent auth operation
    pub fn status(&self) -> OperationState<UserRole> {
        self.read_state().status.clone()
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.authenticate("login", self.backend.login(email, password)).await
    }

    /// Always succeeds with the demo backend
    pub async fn register(&self, username: &str, email: &str, password: &str) -> bool {
        self.authenticate("register", self.backend.register(username, email, password))
            .await
    }

    pub async fn social_login(&self, provider: SocialProvider) -> bool {
        self.authenticate("social login", self.backend.social_login(provider))
            .await
    }

    pub async fn seller_login(&self, email: &str, password: &str) -> bool {
        self.authenticate("seller login", self.backend.seller_login(email, password))
            .await
    }

    pub async fn admin_login(&self, email: &str, password: &str, admin_key: &str) -> bool {
        self.authenticate(
            "admin login",
            self.backend.admin_login(email, password, admin_key),
        )
        .await
    }

    /// Back to anonymous. The cart is left alone.
    pub fn logout(&self) {
        let previous = {
            let mut state = self.write_state();
            state.status = OperationState::Idle;
            state.identity.take()
        };

        if let Err(e) = self.store.remove(SESSION_KEY) {
            warn!("Failed to clear stored session: {}", e);
        }

        if let Some(identity) = previous {
            info!("Logged out {}", identity.username);
        }
    }

    /// Drive one backend call through Pending -> Succeeded | Failed.
    /// A successful call replaces any current identity.
    async fn authenticate<F>(&self, operation: &str, attempt: F) -> bool
    where
        F: Future<Output = Result<Identity, StorefrontError>>,
    {
        self.write_state().status = OperationState::Pending;
        let mut guard = PendingGuard {
            state: &self.state,
            armed: true,
        };

        let outcome = match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(StorefrontError::Timeout(self.timeout.as_millis() as u64)),
        };
        guard.armed = false;

        match outcome {
            Ok(identity) => {
                if let Err(e) = store_json(self.store.as_ref(), SESSION_KEY, &identity) {
                    warn!("Failed to persist session: {}", e);
                }
                info!(
                    "{} succeeded for {} ({})",
                    operation,
                    identity.username,
                    identity.role.as_str()
                );
                let mut state = self.write_state();
                state.status = OperationState::Succeeded(identity.role);
                state.identity = Some(identity);
                true
            }
            Err(e) => {
                warn!("{} failed: {}", operation, e);
                self.write_state().status = OperationState::Failed(e.to_string());
                false
            }
        }
    }
}
