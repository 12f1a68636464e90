//! Session management
//!
//! Holds the client-side authentication state, persists it across reloads
//! and drives the flows that change it: bootstrap, sign-in, sign-up and
//! logout. The bearer token lives next to, not inside, the session.

use crate::api::MedScoreApi;
use crate::config::{ACCESS_TOKEN_KEY, SESSION_STORE_KEY};
use crate::error::{ClientError, ClientResult};
use crate::fetch::{FetchCache, FetchStatus, Resource};
use crate::request::HttpClient;
use crate::route::SIGNIN_PATH;
use medscore_shared::{Session, SessionPatch, SigninRequest, SignupRequest, UserProfile};
use std::cell::RefCell;
use std::rc::Rc;

// =========================================================
// Storage
// =========================================================

/// Persistent string storage (browser `localStorage` in production).
///
/// Writes are best effort: a full or unavailable storage must not break
/// the in-memory state, so failures are reported as `false`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str);
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Bearer token persisted under `accessToken`.
#[derive(Clone)]
pub struct TokenStore {
    storage: Rc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Current token, or the empty string when none is stored.
    pub fn get(&self) -> String {
        self.storage.get(ACCESS_TOKEN_KEY).unwrap_or_default()
    }

    pub fn set(&self, token: &str) {
        if !self.storage.set(ACCESS_TOKEN_KEY, token) {
            log_warn!("[Session] could not persist access token");
        }
    }

    pub fn clear(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
    }
}

// =========================================================
// SessionStore
// =========================================================

type Listener = Rc<dyn Fn(&Session)>;

struct StoreInner {
    session: RefCell<Session>,
    storage: Rc<dyn KeyValueStore>,
    listeners: RefCell<Vec<Listener>>,
}

/// Single source of truth for the session.
///
/// Cloning yields another handle to the same store. Every mutation is
/// written through to storage and then announced to subscribers.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<StoreInner>,
}

impl SessionStore {
    /// Empty, unauthenticated store.
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                session: RefCell::new(Session::empty()),
                storage,
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Store rehydrated from the last persisted session.
    ///
    /// Unreadable data is discarded and the store starts empty.
    pub fn restore(storage: Rc<dyn KeyValueStore>) -> Self {
        let session = match storage.get(SESSION_STORE_KEY) {
            Some(raw) => serde_json::from_str::<Session>(&raw).unwrap_or_else(|e| {
                log_warn!("[Session] discarding unreadable session: {}", e);
                Session::empty()
            }),
            None => Session::empty(),
        };
        let store = Self::new(storage);
        *store.inner.session.borrow_mut() = session;
        store
    }

    pub fn get_session(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.borrow().is_authenticated
    }

    /// Merges `patch` into the current session.
    pub fn set_session(&self, patch: SessionPatch) {
        self.inner.session.borrow_mut().merge(patch);
        self.commit();
    }

    /// Resets to the empty, unauthenticated session.
    pub fn clear_session(&self) {
        *self.inner.session.borrow_mut() = Session::empty();
        self.commit();
    }

    /// Registers `listener`, called after every change.
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn commit(&self) {
        let snapshot = self.get_session();
        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if !self.inner.storage.set(SESSION_STORE_KEY, &raw) {
                    log_warn!("[Session] could not persist session");
                }
            }
            Err(e) => log_error!("[Session] could not serialize session: {}", e),
        }

        // Listeners may read or even mutate the store again.
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

// =========================================================
// Flows
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The profile was already requested during this page load.
    Skipped,
    Authenticated(UserProfile),
    /// Session left as it was; carries the reason.
    Unauthenticated(String),
}

/// Confirms the stored token against the backend once per page load.
///
/// Success marks the session authenticated with the returned identity.
/// Failure is logged and leaves the session untouched.
#[derive(Default)]
pub struct SessionBootstrap {
    fetches: RefCell<FetchCache<Resource>>,
}

impl SessionBootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> FetchStatus {
        self.fetches.borrow().status(&Resource::Profile)
    }

    pub async fn run<C: HttpClient>(
        &self,
        api: &MedScoreApi<C>,
        store: &SessionStore,
        tokens: &TokenStore,
    ) -> BootstrapOutcome {
        if !self.fetches.borrow_mut().try_begin(Resource::Profile) {
            return BootstrapOutcome::Skipped;
        }

        let token = tokens.get();
        if token.is_empty() {
            self.settle(false);
            log_info!("[Session] no access token, staying signed out");
            return BootstrapOutcome::Unauthenticated("no access token".to_string());
        }

        match api.profile(&token).await {
            Ok(profile) => {
                self.settle(true);
                store.set_session(SessionPatch::authenticated(&profile));
                log_info!("[Session] restored session for {}", profile.email);
                BootstrapOutcome::Authenticated(profile)
            }
            Err(e) => {
                self.settle(false);
                log_warn!("[Session] bootstrap failed: {}", e);
                BootstrapOutcome::Unauthenticated(e.message().to_string())
            }
        }
    }

    fn settle(&self, ok: bool) {
        self.fetches.borrow_mut().finish(&Resource::Profile, ok);
    }
}

/// Signs in, stores the bearer token and authenticates the session.
pub async fn sign_in<C: HttpClient>(
    api: &MedScoreApi<C>,
    store: &SessionStore,
    tokens: &TokenStore,
    req: SigninRequest,
) -> ClientResult<UserProfile> {
    let req = SigninRequest {
        email: req.email.trim().to_string(),
        password: req.password,
    };
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ClientError::validation("Please fill in all fields."));
    }

    let resp = api.signin(&req).await?;
    let token = resp
        .tokens
        .map(|t| t.access_token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ClientError::rejected("Sign in returned no access token").in_op("sign_in"))?;
    let profile = resp.user.unwrap_or_else(|| UserProfile {
        email: req.email.clone(),
        ..Default::default()
    });

    tokens.set(&token);
    store.set_session(SessionPatch::authenticated(&profile));
    log_info!("[Session] signed in as {}", profile.email);
    Ok(profile)
}

pub fn validate_signup(req: &SignupRequest) -> ClientResult<()> {
    let name_len = req.name.trim().chars().count();
    let password_len = req.password.chars().count();

    if req.name.trim().is_empty()
        || req.email.trim().is_empty()
        || req.password.is_empty()
        || req.confirm_password.is_empty()
    {
        return Err(ClientError::validation("Please fill in all fields."));
    }
    if !(3..=50).contains(&name_len) {
        return Err(ClientError::validation(
            "Name must be between 3 and 50 characters.",
        ));
    }
    if !req.email.contains('@') {
        return Err(ClientError::validation("Please enter a valid email."));
    }
    if !(8..=32).contains(&password_len) {
        return Err(ClientError::validation(
            "Password must be between 8 and 32 characters.",
        ));
    }
    if req.password != req.confirm_password {
        return Err(ClientError::validation("Passwords do not match."));
    }
    Ok(())
}

/// Registers an account and returns the path to continue on.
pub async fn sign_up<C: HttpClient>(
    api: &MedScoreApi<C>,
    req: SignupRequest,
) -> ClientResult<String> {
    validate_signup(&req)?;
    let resp = api.signup(&req).await?;
    log_info!("[Session] account created for {}", req.email.trim());
    Ok(resp
        .navigate
        .filter(|p| p.starts_with('/'))
        .unwrap_or_else(|| SIGNIN_PATH.to_string()))
}

/// Drops the token and the session.
///
/// The store is empty before this returns, so a guard evaluated right
/// after sees an unauthenticated visitor.
pub fn logout(store: &SessionStore, tokens: &TokenStore) {
    tokens.clear();
    store.clear_session();
    log_info!("[Session] signed out");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{BASE, api};
    use crate::error::ClientErrorStatus;
    use crate::guard::{GuardDecision, RouteKind, decide};
    use serde_json::json;
    use std::cell::Cell;

    fn stores() -> (Rc<MemoryStore>, SessionStore, TokenStore) {
        let storage = Rc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        let tokens = TokenStore::new(storage.clone());
        (storage, session, tokens)
    }

    fn profile_ok() -> serde_json::Value {
        json!({
            "success": true,
            "result": { "_id": "u1", "name": "Ada", "email": "ada@example.com" }
        })
    }

    fn signup_req(name: &str, password: &str, confirm: &str) -> SignupRequest {
        SignupRequest {
            name: name.into(),
            email: "ada@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn set_session_merges_and_persists() {
        let (storage, store, _) = stores();
        store.set_session(SessionPatch {
            is_authenticated: Some(true),
            user_id: Some("u1".into()),
            ..Default::default()
        });
        store.set_session(SessionPatch {
            name: Some("Ada".into()),
            ..Default::default()
        });

        let session = store.get_session();
        assert!(session.is_authenticated);
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.name, "Ada");

        let restored = SessionStore::restore(storage);
        assert_eq!(restored.get_session(), session);
    }

    #[test]
    fn restore_discards_garbage() {
        let storage = Rc::new(MemoryStore::new());
        storage.set(SESSION_STORE_KEY, "{not json");
        let store = SessionStore::restore(storage);
        assert_eq!(store.get_session(), Session::empty());
    }

    #[test]
    fn subscribers_see_every_change() {
        let (_, store, _) = stores();
        let seen = Rc::new(Cell::new(0));
        let last_auth = Rc::new(Cell::new(false));
        {
            let seen = seen.clone();
            let last_auth = last_auth.clone();
            store.subscribe(move |s| {
                seen.set(seen.get() + 1);
                last_auth.set(s.is_authenticated);
            });
        }
        store.set_session(SessionPatch {
            is_authenticated: Some(true),
            ..Default::default()
        });
        assert!(last_auth.get());
        store.clear_session();
        assert!(!last_auth.get());
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn logout_takes_effect_before_next_guard() {
        let (storage, store, tokens) = stores();
        tokens.set("tok");
        store.set_session(SessionPatch::authenticated(&UserProfile {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }));

        logout(&store, &tokens);

        assert_eq!(
            decide(RouteKind::Private, &store.get_session()),
            GuardDecision::RedirectTo("/signin")
        );
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
        assert_eq!(tokens.get(), "");
        assert!(!store.get_session().has_identity());
    }

    #[tokio::test]
    async fn bootstrap_authenticates_with_profile() {
        let api = api();
        api.client()
            .mock_response(&format!("{}/profile", BASE), 200, profile_ok());
        let (_, store, tokens) = stores();
        tokens.set("tok");
        let bootstrap = SessionBootstrap::new();

        let outcome = bootstrap.run(&api, &store, &tokens).await;
        assert!(matches!(outcome, BootstrapOutcome::Authenticated(ref p) if p.id == "u1"));
        let session = store.get_session();
        assert!(session.is_authenticated);
        assert_eq!(session.email, "ada@example.com");

        let again = bootstrap.run(&api, &store, &tokens).await;
        assert_eq!(again, BootstrapOutcome::Skipped);
        assert_eq!(api.client().count(&format!("{}/profile", BASE)), 1);
    }

    #[tokio::test]
    async fn bootstrap_failure_leaves_session_alone() {
        let api = api();
        api.client().mock_response(
            &format!("{}/profile", BASE),
            401,
            json!({"detail": "Token expired"}),
        );
        let (_, store, tokens) = stores();
        tokens.set("stale");
        let bootstrap = SessionBootstrap::new();

        let outcome = bootstrap.run(&api, &store, &tokens).await;
        assert_eq!(
            outcome,
            BootstrapOutcome::Unauthenticated("Token expired".into())
        );
        assert_eq!(store.get_session(), Session::empty());
        assert_eq!(tokens.get(), "stale");
        assert_eq!(bootstrap.status(), FetchStatus::Failed);
    }

    #[tokio::test]
    async fn bootstrap_without_token_skips_the_request() {
        let api = api();
        let (_, store, tokens) = stores();
        let outcome = SessionBootstrap::new().run(&api, &store, &tokens).await;
        assert!(matches!(outcome, BootstrapOutcome::Unauthenticated(_)));
        assert!(api.client().requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn sign_in_stores_token_and_identity() {
        let api = api();
        api.client().mock_response(
            &format!("{}/signin", BASE),
            200,
            json!({
                "success": true,
                "message": "Login successful",
                "tokens": { "access_token": "a.b.c", "refresh_token": "r" },
                "user": { "id": "u1", "name": "Ada", "email": "ada@example.com" }
            }),
        );
        let (_, store, tokens) = stores();

        let profile = sign_in(
            &api,
            &store,
            &tokens,
            SigninRequest {
                email: " ada@example.com ".into(),
                password: "password1".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(profile.name, "Ada");
        assert_eq!(tokens.get(), "a.b.c");
        assert!(store.is_authenticated());
        assert_eq!(
            decide(RouteKind::AuthOnly, &store.get_session()),
            GuardDecision::RedirectTo("/dashboard")
        );
    }

    #[tokio::test]
    async fn sign_in_without_token_is_rejected() {
        let api = api();
        api.client().mock_response(
            &format!("{}/signin", BASE),
            200,
            json!({ "success": true, "user": { "id": "u1" } }),
        );
        let (_, store, tokens) = stores();
        let err = sign_in(
            &api,
            &store,
            &tokens,
            SigninRequest {
                email: "a@b.c".into(),
                password: "x".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, ClientErrorStatus::Rejected);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn sign_in_requires_both_fields() {
        let api = api();
        let (_, store, tokens) = stores();
        let err = sign_in(
            &api,
            &store,
            &tokens,
            SigninRequest {
                email: "  ".into(),
                password: "secret".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, ClientErrorStatus::Validation);
        assert!(api.client().requests.borrow().is_empty());
    }

    #[test]
    fn signup_validation_rules() {
        assert!(validate_signup(&signup_req("Ada", "password1", "password1")).is_ok());

        let err = validate_signup(&signup_req("", "password1", "password1")).unwrap_err();
        assert_eq!(err.message(), "Please fill in all fields.");
        let err = validate_signup(&signup_req("Al", "password1", "password1")).unwrap_err();
        assert_eq!(err.message(), "Name must be between 3 and 50 characters.");
        let err = validate_signup(&signup_req("Ada", "short", "short")).unwrap_err();
        assert_eq!(err.message(), "Password must be between 8 and 32 characters.");
        let err = validate_signup(&signup_req("Ada", "password1", "password2")).unwrap_err();
        assert_eq!(err.message(), "Passwords do not match.");
    }

    #[tokio::test]
    async fn sign_up_returns_next_path() {
        let api = api();
        api.client().mock_response(
            &format!("{}/signup", BASE),
            201,
            json!({ "success": true, "message": "User created", "navigate": "/signin" }),
        );
        let next = sign_up(&api, signup_req("Ada", "password1", "password1"))
            .await
            .unwrap();
        assert_eq!(next, "/signin");

        let invalid = sign_up(&api, signup_req("Ada", "password1", "nope"))
            .await
            .unwrap_err();
        assert_eq!(invalid.status, ClientErrorStatus::Validation);
        assert_eq!(api.client().count(&format!("{}/signup", BASE)), 1);
    }
}
