use banana_market_shared::protocol::LoginRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::{apply_login, login};
use crate::api::use_api;
use crate::components::toast::use_toast;
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 必填字段校验，返回提示文本
pub fn required(label: &str, value: &str) -> Option<String> {
    value
        .trim()
        .is_empty()
        .then(|| format!("{} is required", label))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let toast = use_toast();
    let api = use_api();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (email_error, set_email_error) = signal(Option::<String>::None);
    let (password_error, set_password_error) = signal(Option::<String>::None);
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let email_missing = required("Email", &email.get());
        let password_missing = required("Password", &password.get());
        let invalid = email_missing.is_some() || password_missing.is_some();
        set_email_error.set(email_missing);
        set_password_error.set(password_missing);
        if invalid {
            return;
        }

        set_is_submitting.set(true);
        let client = api.client();
        let request = LoginRequest {
            email: email.get(),
            password: password.get(),
        };
        spawn_local(async move {
            match login(&client, request).await {
                Ok(outcome) => {
                    session.set_state.update(|store| apply_login(store, &outcome));
                    router.navigate_to_route(&AppRoute::landing_for(outcome.role.as_deref()));
                }
                Err(e) => {
                    log::warn!("[Auth] login failed: {}", e);
                    toast.error("Invalid email or password!");
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-2xl bg-base-100">
                <form class="card-body" on:submit=on_submit>
                    <h1 class="text-3xl font-bold text-center">"Login"</h1>

                    <div class="form-control">
                        <input
                            type="email"
                            placeholder="Email"
                            class="input input-bordered"
                            prop:value=email
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                        <Show when=move || email_error.get().is_some()>
                            <span class="text-error text-sm">{move || email_error.get().unwrap_or_default()}</span>
                        </Show>
                    </div>
                    <div class="form-control">
                        <input
                            type="password"
                            placeholder="Password"
                            class="input input-bordered"
                            prop:value=password
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                        <Show when=move || password_error.get().is_some()>
                            <span class="text-error text-sm">{move || password_error.get().unwrap_or_default()}</span>
                        </Show>
                    </div>

                    <button class="btn btn-warning mt-4" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                        } else {
                            "Login".into_any()
                        }}
                    </button>

                    <div class="divider"></div>
                    <div class="flex justify-center gap-4">
                        <Link to="/register" class="link link-warning">"Don't have an account? Register"</Link>
                        <Link to="/" class="link link-warning">"Go Back to Home"</Link>
                    </div>
                </form>
            </div>
        </div>
    }
}
