use crate::web::read_picked_file;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;
use medscore::upload::{SubmissionState, UploadWorkflow};

#[derive(Clone, Copy)]
enum Slot {
    Resume,
    Credential,
}

impl Slot {
    fn label(&self) -> &'static str {
        match self {
            Slot::Resume => "Resume",
            Slot::Credential => "Credential",
        }
    }
}

#[component]
fn FilePicker(slot: Slot, workflow: RwSignal<UploadWorkflow>) -> impl IntoView {
    let on_change = move |ev: leptos::ev::Event| {
        spawn_local(async move {
            match read_picked_file(ev).await {
                // The page may be gone by the time the bytes are in.
                Ok(file) => {
                    workflow.try_update(|w| match slot {
                        Slot::Resume => w.select_resume(file),
                        Slot::Credential => w.select_credential(file),
                    });
                }
                Err(e) => error!("[Upload] {}", e),
            }
        });
    };

    let picked = move || {
        workflow.with(|w| {
            let selection = w.selection();
            let file = match slot {
                Slot::Resume => selection.resume.as_ref(),
                Slot::Credential => selection.credential.as_ref(),
            };
            file.map(|f| f.name.clone())
        })
    };

    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text font-semibold">{slot.label()}</span>
                <span class="label-text-alt">{move || picked().unwrap_or_else(|| "No file selected".to_string())}</span>
            </label>
            <input
                type="file"
                accept=".pdf,.png,.jpg,.jpeg,.doc,.docx"
                class="file-input file-input-bordered w-full"
                disabled=move || workflow.with(|w| !w.can_submit())
                on:change=on_change
            />
        </div>
    }
}

#[component]
pub fn UploadForm(
    workflow: RwSignal<UploadWorkflow>,
    on_submit: Callback<()>,
    on_reset: Callback<()>,
) -> impl IntoView {
    let state = Memo::new(move |_| workflow.with(|w| w.state()));
    let message = move || workflow.with(|w| w.message().to_string());

    let message_class = move || match state.get() {
        SubmissionState::Succeeded => "alert alert-success text-sm py-2",
        _ => "alert alert-error text-sm py-2",
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form
                class="card-body space-y-2"
                on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    on_submit.run(());
                }
            >
                <h3 class="card-title">"Upload documents"</h3>

                <FilePicker slot=Slot::Resume workflow=workflow />
                <FilePicker slot=Slot::Credential workflow=workflow />

                {move || {
                    let text = message();
                    (!text.is_empty()).then(|| view! {
                        <div role="alert" class=message_class>
                            <span>{text}</span>
                        </div>
                    })
                }}

                <div class="card-actions justify-end mt-4">
                    <Show when=move || state.get() == SubmissionState::Failed>
                        <button
                            type="button"
                            class="btn btn-ghost"
                            on:click=move |_| on_reset.run(())
                        >
                            "Try again"
                        </button>
                    </Show>
                    <button
                        type="submit"
                        class="btn btn-primary"
                        disabled=move || state.get() == SubmissionState::Submitting
                    >
                        {move || if state.get() == SubmissionState::Submitting {
                            view! { <span class="loading loading-spinner"></span> "Analyzing..." }.into_any()
                        } else {
                            "Submit".into_any()
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}
