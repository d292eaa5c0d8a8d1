use banana_market_shared::protocol::ListProducts;
use leptos::prelude::*;

use crate::api::use_api;
use crate::components::product_card::ProductCard;
use crate::config::AppConfig;
use crate::query::{PRODUCTS_SCOPE, QueryKey, QueryStatus, use_queries};

/// 分页控件的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub total_pages: u32,
}

impl Pager {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn previous(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next(&self) -> u32 {
        (self.page + 1).min(self.total_pages.max(1))
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let api = use_api();
    let queries = use_queries();
    let limit = use_context::<AppConfig>()
        .expect("AppConfig should be provided")
        .page_size;

    let (page, set_page) = signal(1u32);

    let products = queries.watch_products(move || {
        let page = page.get();
        let key = QueryKey::new(PRODUCTS_SCOPE)
            .with(format!("page={}", page))
            .with(format!("limit={}", limit));
        let client = api.client();
        Some((key, async move { client.send(&ListProducts::page(page, limit)).await }))
    });

    let pager = move || Pager {
        page: page.get(),
        total_pages: products.with(|s| s.ready().map_or(1, |p| p.total_pages(limit))),
    };

    view! {
        <main class="container mx-auto py-8">
            <h1 class="text-4xl font-bold text-center mb-8">"Our Products"</h1>

            {move || match products.get() {
                QueryStatus::Idle | QueryStatus::Loading => view! { <p>"Loading products..."</p> }.into_any(),
                QueryStatus::Failed(_) => view! {
                    <p>"Error fetching products. Please try again later."</p>
                }.into_any(),
                QueryStatus::Ready(data) => view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                        <For
                            each=move || data.products.clone()
                            key=|p| p.id.clone()
                            children=|product| view! { <ProductCard product=product show_stock=true /> }
                        />
                    </div>
                }.into_any(),
            }}

            <div class="flex justify-center items-center mt-8 gap-4">
                <button
                    class="btn"
                    disabled=move || !pager().has_previous()
                    on:click=move |_| set_page.set(pager().previous())
                >
                    "Previous"
                </button>
                <p>{move || { let p = pager(); format!("Page {} of {}", p.page, p.total_pages) }}</p>
                <button
                    class="btn"
                    disabled=move || !pager().has_next()
                    on:click=move |_| set_page.set(pager().next())
                >
                    "Next"
                </button>
            </div>
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_bounds() {
        let first = Pager { page: 1, total_pages: 3 };
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert_eq!(first.previous(), 1);
        assert_eq!(first.next(), 2);

        let last = Pager { page: 3, total_pages: 3 };
        assert!(!last.has_next());
        assert_eq!(last.next(), 3);
        assert_eq!(last.previous(), 2);
    }

    #[test]
    fn single_page_disables_both_directions() {
        let only = Pager { page: 1, total_pages: 1 };
        assert!(!only.has_previous());
        assert!(!only.has_next());
    }
}
