use banana_market_shared::FavoriteEntry;
use leptos::prelude::*;

use crate::components::product_card::format_price;
use crate::config::AppConfig;
use crate::favorites::use_favorites;

/// 收藏列表页
#[component]
pub fn LikedPage() -> impl IntoView {
    let favorites = use_favorites();
    let is_empty = move || favorites.state.with(|store| store.is_empty());

    view! {
        <main class="container mx-auto py-8">
            <h1 class="text-4xl font-bold text-center mb-8">"Liked Products"</h1>
            <Show
                when=move || !is_empty()
                fallback=|| view! { <p class="text-center">"No products liked yet."</p> }
            >
                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                    <For
                        each=move || favorites.state.with(|store| store.entries().to_vec())
                        key=|entry| entry.id.clone()
                        children=|entry| view! { <LikedCard entry=entry /> }
                    />
                </div>
            </Show>
        </main>
    }
}

#[component]
fn LikedCard(entry: FavoriteEntry) -> impl IntoView {
    let favorites = use_favorites();
    let config = use_context::<AppConfig>().expect("AppConfig should be provided");

    let id = entry.id.clone();
    let on_unlike = move |_| favorites.set_state.update(|store| store.remove(&id));

    view! {
        <div class="card bg-base-100 shadow-lg">
            <figure>
                <img src=config.image_url(&entry.image) alt=entry.name.clone() class="w-full h-48 object-cover" />
            </figure>
            <div class="card-body">
                <h2 class="card-title">{entry.name}</h2>
                <p class="text-sm text-base-content/60">{entry.category_name}</p>
                <p class="text-xl font-bold text-warning">{format_price(entry.price)}</p>
                <p class="text-sm text-base-content/60">"Color: " {entry.color}</p>
                <p class="text-sm text-base-content/60">"Available: " {entry.quantity}</p>
                <button class="btn btn-warning mt-4 w-full" on:click=on_unlike>"Unlike"</button>
            </div>
        </div>
    }
}
