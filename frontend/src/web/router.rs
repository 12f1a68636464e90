//! Router service
//!
//! Wraps the History API and runs every navigation through the core guard:
//! request -> resolve (forward + guard) -> history -> render. The outlet
//! resolves again at render time, so a session change never shows a
//! protected view for even one frame.

use leptos::logging::log;
use leptos::prelude::*;
use medscore::guard::resolve;
use medscore::route::AppRoute;
use medscore_shared::Session;
use wasm_bindgen::prelude::*;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// Injected by the app; the router only reads it.
    session: ReadSignal<Session>,
}

impl RouterService {
    fn new(session: ReadSignal<Session>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let initial = resolve(requested.clone(), &session.get_untracked());
        if initial != requested {
            log!("[Router] {} -> {}", requested, initial);
            replace_history_state(&initial.to_path());
        }
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    /// Route that may render right now for the current session.
    pub fn guarded_route(&self) -> AppRoute {
        let route = self.current_route.get();
        self.session.with(|s| resolve(route, s))
    }

    pub fn navigate(&self, path: &str) {
        self.go(AppRoute::from_path(path), true);
    }

    fn go(&self, requested: AppRoute, use_push: bool) {
        let target = resolve(requested.clone(), &self.session.get_untracked());
        if target != requested {
            log!("[Router] {} denied, redirecting to {}", requested, target);
        }

        if use_push {
            push_history_state(&target.to_path());
        } else {
            replace_history_state(&target.to_path());
        }
        self.set_route.set(target);
    }

    /// Back/forward buttons go through the guard as well.
    fn init_popstate_listener(&self) {
        let router = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            router.go(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // The listener lives as long as the page.
        closure.forget();
    }

    /// Re-evaluates the guard whenever the session changes (sign-in,
    /// bootstrap, logout).
    fn setup_session_redirect(&self) {
        let router = *self;
        Effect::new(move |_| {
            let session = router.session.get();
            let route = router.current_route.get_untracked();
            let target = resolve(route.clone(), &session);
            if target != route {
                log!(
                    "[Router] session changed (authenticated: {}), {} -> {}",
                    session.is_authenticated,
                    route,
                    target
                );
                push_history_state(&target.to_path());
                router.set_route.set(target);
            }
        });
    }
}

fn provide_router(session: ReadSignal<Session>) -> RouterService {
    let router = RouterService::new(session);
    router.init_popstate_listener();
    router.setup_session_redirect();
    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// Components
// ============================================================================

#[component]
pub fn Router(session: ReadSignal<Session>, children: Children) -> impl IntoView {
    provide_router(session);
    children()
}

/// Renders the view for the guarded route.
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();
    let route = Memo::new(move |_| router.guarded_route());
    move || matcher(route.get())
}

/// In-app link: History navigation instead of a page load.
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
