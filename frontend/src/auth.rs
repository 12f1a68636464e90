//! Application context
//!
//! Owns the session store, the token store and the API client, and mirrors
//! the session into a signal. The router reads that signal; it never
//! touches the store directly.

use crate::web::{BrowserSleeper, BrowserStorage, FetchHttpClient};
use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use medscore::session::{
    self, BootstrapOutcome, KeyValueStore, SessionBootstrap, SessionStore, TokenStore,
};
use medscore::{ClientConfig, MedScoreApi};
use medscore_shared::{Session, SigninRequest, SignupRequest};
use std::rc::Rc;

pub type Api = MedScoreApi<FetchHttpClient>;

/// Shared through Context; every field is an arena handle, so it is `Copy`.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Reactive mirror of the session store.
    pub session: ReadSignal<Session>,
    store: StoredValue<SessionStore, LocalStorage>,
    tokens: StoredValue<TokenStore, LocalStorage>,
    api: StoredValue<Rc<Api>, LocalStorage>,
    bootstrap: StoredValue<Rc<SessionBootstrap>, LocalStorage>,
}

impl AppContext {
    /// Restores the persisted session before anything renders.
    pub fn new() -> Self {
        let config = ClientConfig::from_build_env();
        let storage: Rc<dyn KeyValueStore> = Rc::new(BrowserStorage);
        let store = SessionStore::restore(storage.clone());
        let tokens = TokenStore::new(storage);
        let api = MedScoreApi::new(&config, FetchHttpClient, Rc::new(BrowserSleeper));

        let (session, set_session) = signal(store.get_session());
        store.subscribe(move |s| set_session.set(s.clone()));

        log!(
            "[Session] {} ({}) using {}",
            config.site_name,
            config.mode,
            config.api_url
        );

        Self {
            session,
            store: StoredValue::new_local(store),
            tokens: StoredValue::new_local(tokens),
            api: StoredValue::new_local(Rc::new(api)),
            bootstrap: StoredValue::new_local(Rc::new(SessionBootstrap::new())),
        }
    }

    pub fn api(&self) -> Rc<Api> {
        self.api.get_value()
    }

    /// Bearer token at call time; empty when signed out.
    pub fn token(&self) -> String {
        self.tokens.with_value(|t| t.get())
    }

    fn store(&self) -> SessionStore {
        self.store.get_value()
    }

    fn tokens(&self) -> TokenStore {
        self.tokens.get_value()
    }
}

/// Gets the application context.
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}

/// Validates the stored token once per page load.
pub fn init_session(ctx: &AppContext) {
    let ctx = *ctx;
    let bootstrap = ctx.bootstrap.get_value();
    spawn_local(async move {
        let api = ctx.api();
        match bootstrap.run(&api, &ctx.store(), &ctx.tokens()).await {
            BootstrapOutcome::Authenticated(profile) => {
                log!("[Session] profile confirmed for {}", profile.email)
            }
            BootstrapOutcome::Unauthenticated(reason) => {
                warn!("[Session] profile not confirmed: {}", reason)
            }
            BootstrapOutcome::Skipped => {}
        }
    });
}

/// Signs in. On success the router moves away from the sign-in page by
/// itself when the session flips.
///
/// Errors are the message to show next to the form.
pub async fn sign_in(ctx: &AppContext, email: String, password: String) -> Result<(), String> {
    let api = ctx.api();
    session::sign_in(
        &api,
        &ctx.store(),
        &ctx.tokens(),
        SigninRequest { email, password },
    )
    .await
    .map(|_| ())
    .map_err(|e| e.message().to_string())
}

/// Creates an account and returns where to go next.
pub async fn sign_up(ctx: &AppContext, req: SignupRequest) -> Result<String, String> {
    let api = ctx.api();
    session::sign_up(&api, req)
        .await
        .map_err(|e| e.message().to_string())
}

/// Signs out. Navigation follows from the session change.
pub fn logout(ctx: &AppContext) {
    session::logout(&ctx.store(), &ctx.tokens());
}
