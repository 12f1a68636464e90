use crate::auth::{logout, use_app};
use crate::components::credibility::CredibilityDetails;
use crate::web::clock::local_offset;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use medscore::format::report_heading;
use medscore::scope::ViewScope;
use medscore::viewer::{ReportViewState, ReportViewer};

#[component]
pub fn ReportViewPage(report_id: String) -> impl IntoView {
    let ctx = use_app();
    let viewer = RwSignal::new(ReportViewer::new());

    let view_scope = ViewScope::new("report");
    on_cleanup({
        let view_scope = view_scope.clone();
        move || view_scope.close()
    });
    let scope = StoredValue::new(view_scope);

    // The outlet re-mounts this page per id, so entering happens once.
    if viewer.try_update(|v| v.enter(&report_id)).unwrap_or(false) {
        let scope = scope.get_value();
        let id = report_id.clone();
        spawn_local(async move {
            let api = ctx.api();
            let token = ctx.token();
            if let Ok(result) = scope.run(api.report(&token, &id)).await {
                viewer.update(|v| {
                    v.settle(&id, result);
                });
            }
        });
    }

    let heading = report_heading(&report_id);

    let body = move || {
        viewer.with(|v| match v.state() {
            ReportViewState::Loading => view! {
                <div class="flex justify-center py-16">
                    <span class="loading loading-spinner loading-lg"></span>
                </div>
            }
            .into_any(),
            ReportViewState::Error(msg) => view! {
                <div role="alert" class="alert alert-error">
                    <span>{msg.clone()}</span>
                </div>
            }
            .into_any(),
            ReportViewState::Loaded(detail) => {
                let created = detail.created_at.format_long(local_offset());
                view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <p class="text-sm text-base-content/60">{created}</p>
                            <CredibilityDetails
                                label=detail.classifier_label.clone()
                                credibility=detail.credibility.clone()
                            />
                        </div>
                    </div>
                }
                .into_any()
            }
        })
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-sm px-4">
                <div class="flex-1">
                    <Link to="/dashboard" class="btn btn-ghost">"Back to Dashboard"</Link>
                </div>
                <div class="flex-none">
                    <button class="btn btn-ghost text-error" on:click=move |_| logout(&ctx)>
                        "Logout"
                    </button>
                </div>
            </div>
            <main class="p-4 md:p-8">
                <div class="max-w-3xl mx-auto space-y-4">
                    <h1 class="text-2xl font-bold break-all">{heading}</h1>
                    {body}
                </div>
            </main>
        </div>
    }
}
