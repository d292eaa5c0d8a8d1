use banana_market_shared::protocol::ListProducts;
use leptos::prelude::*;

use crate::api::use_api;
use crate::components::product_card::ProductCard;
use crate::query::{PRODUCTS_SCOPE, QueryKey, QueryStatus, use_queries};

/// 按分类筛选的商品列表
#[component]
pub fn CategoryPage(category_id: String) -> impl IntoView {
    let api = use_api();
    let queries = use_queries();

    let products = queries.watch_products(move || {
        let key = QueryKey::new(PRODUCTS_SCOPE).with(format!("category={}", category_id));
        let request = ListProducts::in_category(category_id.clone());
        let client = api.client();
        Some((key, async move { client.send(&request).await }))
    });

    view! {
        <main class="container mx-auto py-8">
            <h1 class="text-4xl font-bold text-center mb-8">"Products in Category"</h1>

            {move || match products.get() {
                QueryStatus::Idle | QueryStatus::Loading => view! { <p>"Loading products..."</p> }.into_any(),
                QueryStatus::Failed(_) => view! {
                    <p>"Error fetching products. Please try again later."</p>
                }.into_any(),
                QueryStatus::Ready(data) if data.products.is_empty() => view! {
                    <p class="text-center">"No products in this category."</p>
                }.into_any(),
                QueryStatus::Ready(data) => view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                        <For
                            each=move || data.products.clone()
                            key=|p| p.id.clone()
                            children=|product| view! { <ProductCard product=product /> }
                        />
                    </div>
                }.into_any(),
            }}
        </main>
    }
}
