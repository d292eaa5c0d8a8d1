use banana_market_shared::Category;
use banana_market_shared::protocol::{AdminListCategories, DeleteCategory};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::admin::forms::CategoryFormState;
use crate::components::admin::layout::DashboardLayout;
use crate::components::toast::use_toast;
use crate::config::AppConfig;
use crate::query::{CATEGORIES_SCOPE, QueryKey, QueryStatus, use_queries};
use crate::session::use_session;

#[component]
pub fn AdminCategoriesPage() -> impl IntoView {
    let session = use_session();
    let toast = use_toast();
    let queries = use_queries();
    let api = use_api();
    let config = use_context::<AppConfig>().expect("AppConfig should be provided");
    let form = CategoryFormState::new();

    let has_token = move || session.token_untracked().is_some();

    let categories = queries.watch_categories({
        let api = api.clone();
        move || {
            if !has_token() {
                toast.error("You must be logged in to fetch categories.");
                return None;
            }
            let client = api.client();
            Some((QueryKey::new(CATEGORIES_SCOPE).with("admin"), async move {
                client.send(&AdminListCategories).await
            }))
        }
    });

    Effect::new(move |_| {
        if matches!(categories.get(), QueryStatus::Failed(_)) {
            toast.error("Failed to fetch categories.");
        }
    });

    let on_submit = {
        let api = api.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            if !has_token() {
                toast.error("You must be logged in to submit a category.");
                return;
            }
            let request = match form.to_request() {
                Ok(request) => request,
                Err(message) => {
                    toast.error(message);
                    return;
                }
            };
            let updating = request.id.is_some();
            let image = form.image();
            let client = api.client();
            spawn_local(async move {
                match client.send_with_file(&request, image).await {
                    Ok(_) => {
                        toast.success(if updating {
                            "Category updated successfully!"
                        } else {
                            "Category created successfully!"
                        });
                        form.reset();
                        queries.invalidate_categories();
                    }
                    Err(e) => {
                        log::error!("[Admin] save category failed: {}", e);
                        toast.error("Failed to submit category.");
                    }
                }
            });
        }
    };

    let on_delete = move |id: String| {
        if !has_token() {
            toast.error("You must be logged in to delete a category.");
            return;
        }
        let client = api.client();
        spawn_local(async move {
            match client.send(&DeleteCategory { id }).await {
                Ok(_) => {
                    toast.success("Category deleted successfully!");
                    queries.invalidate_categories();
                    // 商品列表里带有分类名
                    queries.invalidate_products();
                }
                Err(e) => {
                    log::error!("[Admin] delete category failed: {}", e);
                    toast.error("Failed to delete category.");
                }
            }
        });
    };

    let rows = move || {
        categories.with(|status| {
            status
                .ready()
                .map(|list| list.categories.clone())
                .unwrap_or_default()
        })
    };

    view! {
        <DashboardLayout>
            <form class="grid gap-4 mb-8" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Name"
                    class="input input-bordered"
                    prop:value=form.name
                    on:input=move |ev| form.name.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Description"
                    class="input input-bordered"
                    prop:value=form.description
                    on:input=move |ev| form.description.set(event_target_value(&ev))
                />
                <input type="file" class="file-input file-input-bordered" node_ref=form.image_input />
                <div class="flex gap-2">
                    <button type="submit" class="btn btn-warning">
                        {move || if form.is_editing() { "Update" } else { "Create" }}
                    </button>
                    <Show when=move || form.is_editing()>
                        <button type="button" class="btn btn-ghost" on:click=move |_| form.reset()>"Cancel"</button>
                    </Show>
                </div>
            </form>

            <div class="overflow-x-auto bg-base-100 rounded-box shadow-lg">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"Image"</th>
                            <th>"Name"</th>
                            <th>"Description"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=rows
                            key=|c| c.id.clone()
                            children=move |category: Category| {
                                let id = category.id.clone();
                                let on_delete = on_delete.clone();
                                let editable = category.clone();
                                let image = (!category.image.is_empty())
                                    .then(|| config.image_url(&category.image));
                                view! {
                                    <tr>
                                        <td>
                                            {image.map(|src| view! {
                                                <img src=src alt="" class="w-12 h-12 object-cover rounded" />
                                            })}
                                        </td>
                                        <td>{category.name}</td>
                                        <td>{category.description}</td>
                                        <td class="flex gap-2">
                                            <button class="btn btn-info btn-sm" on:click=move |_| form.load(&editable)>"Edit"</button>
                                            <button class="btn btn-error btn-sm" on:click=move |_| on_delete(id.clone())>"Delete"</button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>
        </DashboardLayout>
    }
}
