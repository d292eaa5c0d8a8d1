use banana_market_shared::{Category, Product};
use banana_market_shared::protocol::{ListCategories, ListProducts};
use leptos::prelude::*;

use crate::actions::end_session;
use crate::api::use_api;
use crate::favorites::use_favorites;
use crate::query::{CATEGORIES_SCOPE, PRODUCTS_SCOPE, QueryKey, QueryStatus, use_queries};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 搜索词为空时不发起请求
pub fn search_key(term: &str) -> Option<QueryKey> {
    let term = term.trim();
    (!term.is_empty()).then(|| QueryKey::new(PRODUCTS_SCOPE).with(format!("name={}", term)))
}

/// 搜索结果跳转到所属分类页
///
/// 列表接口只填充分类名，缺少 id 时按名称在已加载的分类中查找；都找不到则不生成链接。
pub fn search_result_target(product: &Product, categories: &[Category]) -> Option<String> {
    let category = &product.category;
    let id = match category.id.trim() {
        "" => categories
            .iter()
            .find(|known| !category.name.is_empty() && known.name == category.name)
            .map(|known| known.id.as_str())
            .filter(|id| !id.is_empty())?,
        id => id,
    };
    Some(AppRoute::Category(id.to_string()).to_path())
}

/// 站点头部：搜索、收藏数、登录/注销、分类导航
#[component]
pub fn SiteHeader() -> impl IntoView {
    let session = use_session();
    let favorites = use_favorites();
    let router = use_router();
    let queries = use_queries();
    let api = use_api();

    let (term, set_term) = signal(String::new());

    let search = queries.watch_products({
        let api = api.clone();
        move || {
            let term = term.get();
            let key = search_key(&term)?;
            let request = ListProducts::search(term.trim());
            let client = api.client();
            Some((key, async move { client.send(&request).await }))
        }
    });

    let categories = queries.watch_categories(move || {
        let client = api.client();
        Some((QueryKey::new(CATEGORIES_SCOPE), async move {
            client.send(&ListCategories).await
        }))
    });

    let liked_count = move || favorites.state.with(|store| store.len());
    let is_authenticated = move || session.state.with(|store| store.is_authenticated());

    let on_logout = move |_| {
        // 注销和清空收藏在同一次交互中完成
        session.set_state.update(|store| {
            favorites.set_state.update(|liked| end_session(store, liked));
        });
        router.navigate("/login");
    };

    view! {
        <header class="container mx-auto">
            <div class="navbar h-24">
                <div class="flex-1">
                    <Link to="/" class="btn btn-ghost text-2xl font-bold text-warning">"Banana Market"</Link>
                </div>

                <div class="relative w-full max-w-sm">
                    <input
                        type="text"
                        placeholder="Search"
                        class="input input-bordered input-warning w-full"
                        prop:value=term
                        on:input=move |ev| set_term.set(event_target_value(&ev))
                    />
                    {move || match search.get() {
                        QueryStatus::Loading => view! {
                            <div class="absolute z-10 w-full bg-base-100 shadow-lg rounded-box mt-2 p-2">
                                <p class="text-base-content/60">"Loading..."</p>
                            </div>
                        }.into_any(),
                        QueryStatus::Ready(data) if !data.products.is_empty() => {
                            let known = categories.with(|status| {
                                status
                                    .ready()
                                    .map(|list| list.categories.clone())
                                    .unwrap_or_default()
                            });
                            view! {
                                <ul class="menu absolute z-10 w-full bg-base-100 shadow-lg rounded-box mt-2 max-h-60 overflow-y-auto flex-nowrap">
                                    {data.products.into_iter().map(|product| {
                                        match search_result_target(&product, &known) {
                                            Some(to) => view! {
                                                <li><Link to=to class="truncate">{product.name}</Link></li>
                                            }.into_any(),
                                            None => view! {
                                                <li class="disabled"><span class="truncate">{product.name}</span></li>
                                            }.into_any(),
                                        }
                                    }).collect_view()}
                                </ul>
                            }.into_any()
                        }
                        _ => ().into_any(),
                    }}
                </div>

                <div class="flex-none gap-5 ml-4">
                    <Link to="/liked" class="btn btn-ghost flex-col gap-1">
                        {move || format!("Liked ({})", liked_count())}
                    </Link>
                    <Show
                        when=is_authenticated
                        fallback=|| view! { <Link to="/login" class="btn btn-ghost">"Login"</Link> }
                    >
                        <button class="btn btn-ghost" on:click=on_logout>"Logout"</button>
                    </Show>
                </div>
            </div>

            <nav class="flex gap-4 mt-4">
                {move || match categories.get() {
                    QueryStatus::Idle | QueryStatus::Loading => view! { <p>"Loading categories..."</p> }.into_any(),
                    QueryStatus::Failed(_) => view! { <p>"Error fetching categories."</p> }.into_any(),
                    QueryStatus::Ready(list) => list.categories.into_iter().map(|category| view! {
                        <Link to=format!("/category/{}", category.id) class="font-medium capitalize hover:text-warning">
                            {category.name}
                        </Link>
                    }).collect_view().into_any(),
                }}
            </nav>
        </header>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_is_disabled() {
        assert_eq!(search_key(""), None);
        assert_eq!(search_key("   "), None);
        assert_eq!(
            search_key(" ripe ").map(|k| k.as_str().to_string()),
            Some("products:name=ripe".to_string())
        );
    }

    fn decode(json: &str) -> Product {
        serde_json::from_str(json).expect("product json")
    }

    fn categories() -> Vec<Category> {
        serde_json::from_str(r#"[{"_id":"c7","name":"cavendish"},{"_id":"c8","name":"plantain"}]"#)
            .expect("category json")
    }

    #[test]
    fn search_result_links_to_category_id() {
        let product = decode(r#"{"_id":"p1","name":"Banana","category":{"_id":"c8","name":"x"}}"#);
        let target = search_result_target(&product, &[]).expect("category link");
        assert_eq!(target, "/category/c8");
        assert_eq!(AppRoute::from_path(&target), AppRoute::Category("c8".to_string()));
    }

    #[test]
    fn search_result_resolves_category_by_name() {
        let product = decode(r#"{"_id":"p1","name":"Banana","category":{"name":"cavendish"}}"#);
        assert_eq!(
            search_result_target(&product, &categories()).as_deref(),
            Some("/category/c7")
        );
    }

    #[test]
    fn unresolvable_search_result_is_not_a_link() {
        for json in [
            r#"{"_id":"p1","name":"Banana"}"#,
            r#"{"_id":"p1","name":"Banana","category":{"_id":"","name":"unknown"}}"#,
        ] {
            assert_eq!(search_result_target(&decode(json), &categories()), None, "{json}");
        }
        let named = decode(r#"{"_id":"p1","name":"Banana","category":{"name":"cavendish"}}"#);
        assert_eq!(search_result_target(&named, &[]), None);
    }
}
