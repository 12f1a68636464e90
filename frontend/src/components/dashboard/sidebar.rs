use crate::auth::use_app;
use crate::web::clock::now;
use crate::web::router::Link;
use leptos::prelude::*;
use medscore::history::{ReportHistory, StatusIndicator, status_indicator};
use medscore::route::AppRoute;

fn dot_class(indicator: StatusIndicator) -> &'static str {
    match indicator {
        StatusIndicator::Green => "inline-block w-2.5 h-2.5 rounded-full bg-green-500",
        StatusIndicator::Yellow => "inline-block w-2.5 h-2.5 rounded-full bg-yellow-400",
        StatusIndicator::Red => "inline-block w-2.5 h-2.5 rounded-full bg-red-500",
        StatusIndicator::Gray => "inline-block w-2.5 h-2.5 rounded-full bg-gray-400",
    }
}

#[component]
pub fn HistorySidebar(history: RwSignal<ReportHistory>, on_logout: Callback<()>) -> impl IntoView {
    let ctx = use_app();
    let email = move || ctx.session.with(|s| s.email.clone());
    let reports = move || history.with(|h| h.reports().to_vec());
    let notice = move || history.with(|h| h.notice().map(str::to_string));
    let is_empty = move || history.with(|h| h.is_loaded() && h.reports().is_empty());

    view! {
        <aside class="w-72 shrink-0 bg-base-100 shadow-xl flex flex-col">
            <div class="p-4 border-b border-base-200">
                <h2 class="text-xl font-bold text-primary">"MedScore"</h2>
                <p class="text-sm text-base-content/60 truncate">{email}</p>
            </div>

            <div class="p-4 flex-1 overflow-y-auto">
                <h3 class="font-semibold mb-2">"Report History"</h3>

                {move || notice().map(|text| view! {
                    <div role="alert" class="alert alert-warning text-xs py-1 mb-2">
                        <span>{text}</span>
                        <button
                            class="btn btn-ghost btn-xs"
                            aria-label="Dismiss"
                            on:click=move |_| history.update(|h| h.dismiss_notice())
                        >
                            "✕"
                        </button>
                    </div>
                })}

                <Show when=is_empty>
                    <p class="text-sm text-base-content/50">"No reports yet."</p>
                </Show>

                <ul class="menu p-0">
                    <For
                        each=reports
                        key=|r| r.report_id.clone()
                        children=move |report| {
                            let path = AppRoute::Report(report.report_id.clone()).to_path();
                            let when = report.created_at.format_relative(now());
                            view! {
                                <li>
                                    <Link to=path class="flex items-center gap-2">
                                        <span class=dot_class(status_indicator(report.status))></span>
                                        <span class="flex flex-col min-w-0">
                                            <span class="text-sm font-mono truncate">{report.report_id}</span>
                                            <span class="text-xs text-base-content/60">{when}</span>
                                        </span>
                                    </Link>
                                </li>
                            }
                        }
                    />
                </ul>
            </div>

            <div class="p-4 border-t border-base-200">
                <button class="btn btn-outline btn-error w-full" on:click=move |_| on_logout.run(())>
                    "Logout"
                </button>
            </div>
        </aside>
    }
}
