use crate::components::credibility::CredibilityDetails;
use leptos::prelude::*;
use medscore::upload::UploadWorkflow;

#[component]
pub fn ResultCard(workflow: RwSignal<UploadWorkflow>, on_reset: Callback<()>) -> impl IntoView {
    let result = move || workflow.with(|w| w.result().cloned());
    let message = move || workflow.with(|w| w.message().to_string());

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div role="status" class="alert alert-success text-sm py-2">
                    <span>{message}</span>
                </div>

                {move || result().map(|r| view! {
                    <CredibilityDetails label=r.classifier_label credibility=r.credibility />
                })}

                <div class="card-actions justify-end mt-4">
                    <button class="btn btn-outline" on:click=move |_| on_reset.run(())>
                        "Upload Another"
                    </button>
                </div>
            </div>
        </div>
    }
}
