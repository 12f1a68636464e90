use crate::auth::{sign_up, use_app};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use medscore::scope::ViewScope;
use medscore::session::validate_signup;
use medscore_shared::SignupRequest;

#[component]
fn Field(
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                on:input=move |ev| set_value.set(event_target_value(&ev))
                prop:value=value
                class="input input-bordered"
                required
            />
        </div>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let ctx = use_app();
    let router = use_router();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let view_scope = ViewScope::new("signup");
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
        let req = SignupRequest {
            name: name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm.get_untracked(),
        };
        // Checked here too so the form answers without a round trip.
        if let Err(e) = validate_signup(&req) {
            set_error_msg.set(Some(e.message().to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);
        let scope = scope.get_value();
        spawn_local(async move {
            if let Ok(result) = scope.run(sign_up(&ctx, req)).await {
                set_is_submitting.set(false);
                match result {
                    Ok(next) => router.navigate(&next),
                    Err(msg) => set_error_msg.set(Some(msg)),
                }
            }
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create your account"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        <Field id="name" label="Name" kind="text" value=name set_value=set_name />
                        <Field id="email" label="Email" kind="email" value=email set_value=set_email />
                        <Field id="password" label="Password" kind="password" value=password set_value=set_password />
                        <Field id="confirm" label="Confirm password" kind="password" value=confirm set_value=set_confirm />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating..." }.into_any()
                                } else {
                                    "Sign up".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Already registered? "
                            <Link to="/signin" class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
