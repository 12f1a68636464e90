//! MedScore frontend
//!
//! Context-driven layout, thin over the `medscore` core:
//! - `web::router`: History API routing, guarded by `medscore::guard`
//! - `web::{http, storage, timer, files}`: browser implementations of the
//!   core's transport, storage and timer seams
//! - `auth`: application context (session, tokens, API client)
//! - `components`: pages

mod auth;
mod components {
    pub mod credibility;
    pub mod dashboard;
    pub mod report_view;
    pub mod signin;
    pub mod signup;
}

use crate::auth::{AppContext, init_session};
use crate::components::dashboard::DashboardPage;
use crate::components::report_view::ReportViewPage;
use crate::components::signin::SigninPage;
use crate::components::signup::SignupPage;

use leptos::prelude::*;
use medscore::route::AppRoute;

pub(crate) mod web {
    mod files;
    mod http;
    pub mod router;
    mod storage;
    mod timer;

    pub mod clock {
        use chrono::{FixedOffset, Offset, Utc};
        use medscore_shared::Timestamp;

        pub fn now() -> Timestamp {
            Timestamp::new(Utc::now())
        }

        /// Browser's current UTC offset.
        pub fn local_offset() -> FixedOffset {
            // getTimezoneOffset is minutes *behind* UTC.
            let minutes = js_sys::Date::new_0().get_timezone_offset();
            FixedOffset::west_opt((minutes * 60.0) as i32).unwrap_or_else(|| Utc.fix())
        }
    }

    pub use files::read_picked_file;
    pub use http::FetchHttpClient;
    pub use storage::BrowserStorage;
    pub use timer::BrowserSleeper;
}

use web::router::{Link, Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        // Landing only forwards; the guard never lets it render.
        AppRoute::Landing | AppRoute::Signin => view! { <SigninPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Report(report_id) => view! { <ReportViewPage report_id=report_id /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to="/" class="btn btn-primary mt-6">"Back to MedScore"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. Session restored from storage before the first guarded render
    let ctx = AppContext::new();
    provide_context(ctx);

    // 2. Confirm the stored token in the background
    init_session(&ctx);

    view! {
        // 3. The router reads the session signal, never the store
        <Router session=ctx.session>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
