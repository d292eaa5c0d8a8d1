use banana_market_shared::protocol::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::{apply_login, register};
use crate::api::use_api;
use crate::components::login::required;
use crate::components::toast::use_toast;
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let toast = use_toast();
    let api = use_api();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let missing = required("Name", &name.get())
            .or_else(|| required("Email", &email.get()))
            .or_else(|| required("Password", &password.get()));
        if missing.is_some() {
            set_form_error.set(missing);
            return;
        }
        set_form_error.set(None);

        set_is_submitting.set(true);
        let client = api.client();
        let request = RegisterRequest {
            name: name.get(),
            email: email.get(),
            password: password.get(),
        };
        spawn_local(async move {
            match register(&client, request).await {
                Ok(outcome) => {
                    session
                        .set_state
                        .update(|store| apply_login(store, &outcome));
                    router.navigate_to_route(&AppRoute::Home);
                }
                Err(e) => {
                    log::warn!("[Auth] registration failed: {}", e);
                    toast.error("Registration failed. Please try again.");
                }
            }
            set_is_submitting.set(false);
        });
    };

    let field = move |kind: &'static str, placeholder: &'static str, value: RwSignal<String>| {
        view! {
            <input
                type=kind
                placeholder=placeholder
                class="input input-bordered"
                prop:value=value
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-2xl bg-base-100">
                <form class="card-body gap-4" on:submit=on_submit>
                    <h1 class="text-3xl font-bold text-center">"Register"</h1>
                    <Show when=move || form_error.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || form_error.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    {field("text", "Name", name)}
                    {field("email", "Email", email)}
                    {field("password", "Password", password)}
                    <button class="btn btn-warning" disabled=move || is_submitting.get()>
                        "Register"
                    </button>
                    <div class="divider"></div>
                    <div class="flex justify-center gap-4">
                        <Link to="/login" class="link link-warning">"Already have an account? Login"</Link>
                        <Link to="/" class="link link-warning">"Go Back to Home"</Link>
                    </div>
                </form>
            </div>
        </div>
    }
}
