//! Auth store.
//!
//! Mirrors the identity provider's session into local state. Session
//! validity and token lifecycle belong to the provider; this store only
//! tracks the latest snapshot, the derived admin flag, and the loading and
//! error state around sign-in, sign-up, and sign-out.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::instrument;

use sable_core::Email;

use crate::backend::{AuthApi, BackendError, NewAccount, UsersApi};
use crate::models::AuthUser;

/// Pure auth state.
///
/// Starts loading: the initial session probe is assumed to be in flight
/// before anything renders.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub is_authenticated: bool,
    /// Mirrored from the profile's stored flag at sign-in/probe time; does
    /// not update live if the email later changes.
    pub is_admin: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_admin: false,
            loading: true,
            error: None,
        }
    }
}

impl AuthState {
    /// A sign-in/sign-up went in flight.
    pub fn auth_started(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// A sign-in/sign-up resolved with a user.
    pub fn signed_in(&mut self, user: AuthUser, is_admin: bool) {
        self.loading = false;
        self.user = Some(user);
        self.is_authenticated = true;
        self.is_admin = is_admin;
        self.error = None;
    }

    /// A sign-in/sign-up failed. Only the loading flag and error change:
    /// an already-authenticated user is not wiped by one failed attempt.
    pub fn auth_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Sign-out completed: clear user, admin flag, and error regardless of
    /// prior state.
    pub fn signed_out(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        self.is_admin = false;
        self.error = None;
    }

    /// The startup session probe resolved.
    pub fn probe_resolved(&mut self, session: Option<(AuthUser, bool)>) {
        self.loading = false;
        match session {
            Some((user, is_admin)) => {
                self.user = Some(user);
                self.is_authenticated = true;
                self.is_admin = is_admin;
            }
            None => {
                self.user = None;
                self.is_authenticated = false;
                self.is_admin = false;
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Thread-safe container around [`AuthState`] plus the provider calls.
pub struct AuthStore {
    api: Arc<dyn AuthApi>,
    users: Arc<dyn UsersApi>,
    state: RwLock<AuthState>,
}

impl AuthStore {
    pub fn new(api: Arc<dyn AuthApi>, users: Arc<dyn UsersApi>) -> Self {
        Self {
            api,
            users,
            state: RwLock::new(AuthState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve the startup session probe.
    ///
    /// Subscribes once to the provider's session notifications; the first
    /// observed value decides the outcome and probing stops there. A
    /// session whose profile document is missing counts as signed out, and
    /// so does a probe error.
    #[instrument(skip(self))]
    pub async fn check_session(&self) {
        let handle = self.api.session_changes().borrow().clone();

        let resolved = match handle {
            None => None,
            Some(handle) => match self.users.get_profile(&handle.user_id).await {
                Ok(Some(profile)) => {
                    let is_admin = profile.is_admin;
                    Some((AuthUser::from_profile(handle.user_id, &profile), is_admin))
                }
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!("session probe failed: {e}");
                    None
                }
            },
        };

        self.write().probe_resolved(resolved);
    }

    /// Sign in with email and password.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &Email, password: &str) -> Result<(), BackendError> {
        self.write().auth_started();

        match self.api.sign_in(email, password).await {
            Ok(user) => {
                let is_admin = user.profile.is_admin;
                self.write()
                    .signed_in(AuthUser::from_profile(user.id, &user.profile), is_admin);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("sign-in failed: {e}");
                self.write().auth_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Create an account and sign in as it.
    #[instrument(skip(self, account), fields(email = %account.email))]
    pub async fn sign_up(&self, account: NewAccount) -> Result<(), BackendError> {
        self.write().auth_started();

        match self.api.sign_up(account).await {
            Ok(user) => {
                let is_admin = user.profile.is_admin;
                self.write()
                    .signed_in(AuthUser::from_profile(user.id, &user.profile), is_admin);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("sign-up failed: {e}");
                self.write().auth_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Sign in through the external OAuth provider.
    #[instrument(skip(self))]
    pub async fn sign_in_with_provider(&self) -> Result<(), BackendError> {
        self.write().auth_started();

        match self.api.sign_in_with_provider().await {
            Ok(user) => {
                let is_admin = user.profile.is_admin;
                self.write()
                    .signed_in(AuthUser::from_profile(user.id, &user.profile), is_admin);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("provider sign-in failed: {e}");
                self.write().auth_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// End the session. On success the user, admin flag, and error clear;
    /// on failure the state is left as it was.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        match self.api.sign_out().await {
            Ok(()) => {
                self.write().signed_out();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("sign-out failed: {e}");
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.read().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.read().is_admin
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.read().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.write().clear_error();
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.read().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::backend::MemoryBackend;
    use crate::backend::memory::Surface;

    use super::*;

    fn account(email: &str) -> NewAccount {
        NewAccount {
            email: Email::parse(email).unwrap(),
            password: "hunter2hunter2".to_owned(),
            first_name: Some("Jo".to_owned()),
            last_name: Some("Field".to_owned()),
            phone_number: None,
        }
    }

    fn store() -> (Arc<MemoryBackend>, AuthStore) {
        let backend = Arc::new(MemoryBackend::new());
        let store = AuthStore::new(backend.clone(), backend.clone());
        (backend, store)
    }

    #[tokio::test]
    async fn test_sign_up_derives_admin_flag() {
        let (_, store) = store();

        store.sign_up(account("admin@sable.studio")).await.unwrap();
        assert!(store.is_authenticated());
        assert!(store.is_admin());

        store.sign_out().await.unwrap();

        let (_, store) = self::store();
        store.sign_up(account("jo@sable.studio")).await.unwrap();
        assert!(store.is_authenticated());
        assert!(!store.is_admin());
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_current_user() {
        let (_, store) = store();
        store.sign_up(account("jo@example.com")).await.unwrap();

        let email = Email::parse("jo@example.com").unwrap();
        let result = store.sign_in(&email, "wrong-password").await;

        assert!(result.is_err());
        assert!(store.error().is_some());
        // Still signed in as the original user.
        assert!(store.is_authenticated());
        assert_eq!(
            store.current_user().unwrap().email.as_str(),
            "jo@example.com"
        );
    }

    #[tokio::test]
    async fn test_sign_out_clears_everything() {
        let (_, store) = store();
        store.sign_up(account("admin@example.com")).await.unwrap();

        store.sign_out().await.unwrap();

        assert!(!store.is_authenticated());
        assert!(!store.is_admin());
        assert!(store.current_user().is_none());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_check_session_resolves_existing_session() {
        let (backend, store) = store();
        // A previous sign-in left a session at the provider.
        backend.sign_up(account("jo@example.com")).await.unwrap();

        assert!(store.loading());
        store.check_session().await;

        assert!(!store.loading());
        assert!(store.is_authenticated());
        assert_eq!(
            store.current_user().unwrap().email.as_str(),
            "jo@example.com"
        );
    }

    #[tokio::test]
    async fn test_check_session_without_session_is_anonymous() {
        let (_, store) = store();

        store.check_session().await;

        assert!(!store.loading());
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn test_check_session_missing_profile_is_anonymous() {
        let (backend, store) = store();
        let user = backend.sign_up(account("jo@example.com")).await.unwrap();
        backend.remove_profile(&user.id);

        store.check_session().await;

        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn test_check_session_probe_error_is_anonymous() {
        let (backend, store) = store();
        backend.sign_up(account("jo@example.com")).await.unwrap();
        backend.fail(Surface::Users);

        store.check_session().await;

        assert!(!store.loading());
        assert!(!store.is_authenticated());
    }
}
