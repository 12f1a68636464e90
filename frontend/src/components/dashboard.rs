//! Dashboard page: history sidebar plus the upload form or its result.

use crate::auth::{logout, use_app};
use leptos::prelude::*;
use leptos::task::spawn_local;
use medscore::history::ReportHistory;
use medscore::scope::ViewScope;
use medscore::upload::{UploadWorkflow, submit_documents};

mod result_card;
mod sidebar;
mod upload_form;

use result_card::ResultCard;
use sidebar::HistorySidebar;
use upload_form::UploadForm;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_app();

    // Both live exactly as long as this page.
    let workflow = RwSignal::new(UploadWorkflow::new());
    let history = RwSignal::new(ReportHistory::new());

    let view_scope = ViewScope::new("dashboard");
    on_cleanup({
        let view_scope = view_scope.clone();
        move || view_scope.close()
    });
    let scope = StoredValue::new(view_scope);

    // Mount-time history fetch
    if let Some(seq) = history.try_update(|h| h.begin_initial_fetch()).flatten() {
        let scope = scope.get_value();
        spawn_local(async move {
            let api = ctx.api();
            let token = ctx.token();
            if let Ok(result) = scope.run(api.report_history(&token)).await {
                history.update(|h| {
                    h.apply(seq, result);
                });
            }
        });
    }

    let on_submit = Callback::new(move |_: ()| {
        let Some(ticket) = workflow.try_update(|w| w.begin_submit()).flatten() else {
            return;
        };
        // Numbered now so it outranks the mount-time fetch.
        let Some(seq) = history.try_update(|h| h.begin_refresh()) else {
            return;
        };
        let scope = scope.get_value();
        spawn_local(async move {
            let api = ctx.api();
            let token = ctx.token();
            if let Ok(outcome) = scope.run(submit_documents(&api, &token, ticket)).await {
                // The refresh already ran; apply it before the result shows.
                if let Some(refresh) = outcome.history {
                    history.update(|h| {
                        h.apply(seq, refresh);
                    });
                }
                workflow.update(|w| {
                    w.finish(outcome.ticket_id, outcome.result);
                });
            }
        });
    });

    let on_reset = Callback::new(move |_: ()| {
        workflow.update(|w| {
            w.reset();
        });
    });

    let on_logout = Callback::new(move |_: ()| logout(&ctx));

    let has_result = Memo::new(move |_| workflow.with(|w| w.result().is_some()));
    let greeting = move || {
        ctx.session.with(|s| {
            if s.name.is_empty() {
                "Welcome".to_string()
            } else {
                format!("Welcome, {}", s.name)
            }
        })
    };

    view! {
        <div class="flex min-h-screen bg-base-200 font-sans">
            <HistorySidebar history=history on_logout=on_logout />

            <main class="flex-1 p-4 md:p-8">
                <div class="max-w-3xl mx-auto space-y-6">
                    <div>
                        <h1 class="text-3xl font-bold">{greeting}</h1>
                        <p class="text-base-content/70">
                            "Upload a resume and a credential to check them against each other."
                        </p>
                    </div>

                    {move || if has_result.get() {
                        view! { <ResultCard workflow=workflow on_reset=on_reset /> }.into_any()
                    } else {
                        view! {
                            <UploadForm workflow=workflow on_submit=on_submit on_reset=on_reset />
                        }
                        .into_any()
                    }}
                </div>
            </main>
        </div>
    }
}
