use crate::auth::{sign_in, use_app};
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use medscore::scope::ViewScope;

#[component]
pub fn SigninPage() -> impl IntoView {
    let ctx = use_app();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let view_scope = ViewScope::new("signin");
    on_cleanup({
        let view_scope = view_scope.clone();
        move || view_scope.close()
    });
    let scope = StoredValue::new(view_scope);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let scope = scope.get_value();
        let (email, password) = (email.get_untracked(), password.get_untracked());
        spawn_local(async move {
            // Success flips the session; the router then leaves this page.
            if let Ok(result) = scope.run(sign_in(&ctx, email, password)).await {
                if let Err(msg) = result {
                    set_error_msg.set(Some(msg));
                }
                set_is_submitting.set(false);
            }
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Sign in to MedScore"</h1>
                    <p class="text-base-content/70">"Verify resumes against credentials"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "No account yet? "
                            <Link to="/signup" class="link link-primary">"Create one"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
