use banana_market_shared::Product;
use banana_market_shared::protocol::{AdminListCategories, AdminListProducts, DeleteProduct};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::admin::forms::ProductFormState;
use crate::components::admin::layout::DashboardLayout;
use crate::components::toast::use_toast;
use crate::query::{CATEGORIES_SCOPE, PRODUCTS_SCOPE, QueryKey, QueryStatus, use_queries};
use crate::session::use_session;

#[component]
pub fn AdminProductsPage() -> impl IntoView {
    let session = use_session();
    let toast = use_toast();
    let queries = use_queries();
    let api = use_api();
    let form = ProductFormState::new();

    let has_token = move || session.token_untracked().is_some();

    let products = queries.watch_products({
        let api = api.clone();
        move || {
            if !has_token() {
                toast.error("You must be logged in to fetch products.");
                return None;
            }
            let client = api.client();
            Some((QueryKey::new(PRODUCTS_SCOPE).with("admin"), async move {
                client.send(&AdminListProducts).await
            }))
        }
    });

    let categories = queries.watch_categories({
        let api = api.clone();
        move || {
            let client = api.client();
            Some((QueryKey::new(CATEGORIES_SCOPE).with("admin"), async move {
                client.send(&AdminListCategories).await
            }))
        }
    });

    // 加载失败时提示
    Effect::new(move |_| {
        if matches!(products.get(), QueryStatus::Failed(_)) {
            toast.error("Failed to fetch products.");
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
                toast.error("You must be logged in to submit a product.");
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
                            "Product updated successfully!"
                        } else {
                            "Product created successfully!"
                        });
                        form.reset();
                        queries.invalidate_products();
                    }
                    Err(e) => {
                        log::error!("[Admin] save product failed: {}", e);
                        toast.error("Failed to submit product.");
                    }
                }
            });
        }
    };

    let on_delete = move |id: String| {
        if !has_token() {
            toast.error("You must be logged in to delete a product.");
            return;
        }
        let client = api.client();
        spawn_local(async move {
            match client.send(&DeleteProduct { id }).await {
                Ok(_) => {
                    toast.success("Product deleted successfully!");
                    queries.invalidate_products();
                }
                Err(e) => {
                    log::error!("[Admin] delete product failed: {}", e);
                    toast.error("Failed to delete product.");
                }
            }
        });
    };

    let category_options = move || {
        categories.with(|status| {
            status
                .ready()
                .map(|list| list.categories.clone())
                .unwrap_or_default()
        })
    };

    let rows = move || {
        products.with(|status| {
            status
                .ready()
                .map(|list| list.products.clone())
                .unwrap_or_default()
        })
    };

    let text_input = move |placeholder: &'static str, value: RwSignal<String>| {
        view! {
            <input
                type="text"
                placeholder=placeholder
                class="input input-bordered"
                prop:value=value
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <DashboardLayout>
            <form class="grid gap-4 mb-8" on:submit=on_submit>
                {text_input("Name", form.name)}
                {text_input("Color", form.color)}
                {text_input("Price", form.price)}
                <input
                    type="number"
                    placeholder="Quantity"
                    class="input input-bordered"
                    prop:value=form.quantity
                    on:input=move |ev| form.quantity.set(event_target_value(&ev))
                />
                <select
                    class="select select-bordered"
                    prop:value=form.category
                    on:change=move |ev| form.category.set(event_target_value(&ev))
                >
                    <option value="">"Select Category"</option>
                    <For
                        each=category_options
                        key=|c| c.id.clone()
                        children=|c| view! { <option value=c.id.clone()>{c.name}</option> }
                    />
                </select>
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
                            <th>"Name"</th>
                            <th>"Color"</th>
                            <th>"Price"</th>
                            <th>"Quantity"</th>
                            <th>"Category"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <Show when=move || products.with(QueryStatus::is_loading)>
                            <tr>
                                <td colspan="6" class="text-center py-8">
                                    <span class="loading loading-spinner loading-md"></span>
                                </td>
                            </tr>
                        </Show>
                        <For
                            each=rows
                            key=|p| p.id.clone()
                            children=move |product: Product| {
                                let id = product.id.clone();
                                let on_delete = on_delete.clone();
                                let editable = product.clone();
                                view! {
                                    <tr>
                                        <td>{product.name}</td>
                                        <td>{product.color}</td>
                                        <td>{product.price}</td>
                                        <td>{product.quantity}</td>
                                        <td>{product.category.name}</td>
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
