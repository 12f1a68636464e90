use leptos::prelude::*;
use medscore::format::{flag_label, format_classifier_label, format_score};
use medscore_shared::{CredibilityResult, Flag};

fn flag_class(flag: Option<Flag>) -> &'static str {
    match flag {
        Some(Flag::Red) => "badge badge-lg badge-error",
        Some(Flag::Yellow) => "badge badge-lg badge-warning",
        Some(Flag::Green) => "badge badge-lg badge-success",
        None => "badge badge-lg badge-ghost",
    }
}

/// Classification and credibility block, shared by the dashboard result
/// card and the report page.
#[component]
pub fn CredibilityDetails(label: String, credibility: CredibilityResult) -> impl IntoView {
    let CredibilityResult {
        score,
        summary,
        flag,
        discrepancies,
    } = credibility;

    view! {
        <div class="space-y-4">
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"Classifier Result"</div>
                    <div class="stat-value text-xl">{format_classifier_label(&label)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Credibility Score"</div>
                    <div class="stat-value text-primary">{format_score(score)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Flag"</div>
                    <div class="stat-value">
                        <span class=flag_class(flag)>{flag_label(flag)}</span>
                    </div>
                </div>
            </div>

            <div>
                <h4 class="font-semibold mb-1">"Summary"</h4>
                <p class="text-base-content/80 whitespace-pre-line">{summary}</p>
            </div>

            <div>
                <h4 class="font-semibold mb-1">"Discrepancies"</h4>
                {if discrepancies.is_empty() {
                    view! { <p class="text-base-content/50">"No discrepancies found."</p> }.into_any()
                } else {
                    view! {
                        <ul class="list-disc list-inside space-y-1">
                            {discrepancies
                                .into_iter()
                                .map(|d| view! { <li>{d}</li> })
                                .collect_view()}
                        </ul>
                    }
                    .into_any()
                }}
            </div>
        </div>
    }
}
