use banana_market_shared::User;
use banana_market_shared::protocol::ListUsers;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::admin::layout::DashboardLayout;
use crate::components::toast::use_toast;
use crate::session::use_session;

/// 用户列表（只读）
#[component]
pub fn AdminUsersPage() -> impl IntoView {
    let session = use_session();
    let toast = use_toast();
    let api = use_api();

    let (users, set_users) = signal(Vec::<User>::new());
    let (loading, set_loading) = signal(false);

    if session.token_untracked().is_none() {
        toast.error("You must be logged in to access users.");
    } else {
        set_loading.set(true);
        let client = api.client();
        spawn_local(async move {
            match client.send(&ListUsers).await {
                Ok(list) => set_users.set(list),
                Err(e) => {
                    log::error!("[Admin] fetch users failed: {}", e);
                    toast.error("Failed to fetch users.");
                }
            }
            set_loading.set(false);
        });
    }

    view! {
        <DashboardLayout>
            <h2 class="text-xl font-semibold mb-6">"Users Dashboard"</h2>
            <div class="overflow-x-auto bg-base-100 rounded-box shadow-lg">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"Name"</th>
                            <th>"Email"</th>
                            <th>"Role"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <Show when=move || loading.get()>
                            <tr>
                                <td colspan="3" class="text-center py-8">
                                    <span class="loading loading-spinner loading-md"></span>
                                </td>
                            </tr>
                        </Show>
                        <Show when=move || !loading.get() && users.with(Vec::is_empty)>
                            <tr>
                                <td colspan="3" class="text-center py-8 text-base-content/50">"No users found."</td>
                            </tr>
                        </Show>
                        <For
                            each=move || users.get()
                            key=|u| u.id.clone()
                            children=|user| view! {
                                <tr>
                                    <td>{user.name}</td>
                                    <td>{user.email}</td>
                                    <td>
                                        <span class="badge badge-outline">{user.role}</span>
                                    </td>
                                </tr>
                            }
                        />
                    </tbody>
                </table>
            </div>
        </DashboardLayout>
    }
}
