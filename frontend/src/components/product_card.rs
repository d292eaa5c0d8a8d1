use banana_market_shared::Product;
use leptos::prelude::*;

use crate::actions::{LikeChange, toggle_like};
use crate::components::toast::use_toast;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::favorites::use_favorites;
use crate::session::use_session;

pub const LOGIN_TO_LIKE: &str = "You must be logged in to like a product.";

/// 商品价格显示
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{:.0} so'm", price)
    } else {
        format!("{:.2} so'm", price)
    }
}

/// 商品卡片，带收藏按钮
#[component]
pub fn ProductCard(product: Product, #[prop(optional)] show_stock: bool) -> impl IntoView {
    let session = use_session();
    let favorites = use_favorites();
    let toast = use_toast();
    let config = use_context::<AppConfig>().expect("AppConfig should be provided");

    let id = product.id.clone();
    let is_liked = move || favorites.state.with(|store| store.contains(&id));

    let image = config.image_url(&product.image);
    let price = format_price(product.price);
    let name = product.name.clone();
    let category_name = product.category.name.clone();
    let color = product.color.clone();
    let quantity = product.quantity;

    let on_like = move |_| {
        let current = session.state.with_untracked(|store| store.session().clone());
        let outcome = favorites
            .set_state
            .try_update(|store| toggle_like(&current, store, &product));
        match outcome {
            Some(Ok(LikeChange::Liked)) => log::debug!("[Favorites] liked"),
            Some(Ok(LikeChange::Unliked)) => log::debug!("[Favorites] unliked"),
            Some(Err(AppError::Unauthenticated)) => toast.error(LOGIN_TO_LIKE),
            Some(Err(e)) => log::error!("[Favorites] toggle failed: {}", e),
            None => {}
        }
    };

    view! {
        <div class="card bg-base-100 shadow-lg">
            <figure>
                <img src=image alt=name.clone() class="w-full h-48 object-cover" />
            </figure>
            <div class="card-body">
                <h2 class="card-title">{name}</h2>
                <p class="text-sm text-base-content/60">{category_name}</p>
                <p class="text-xl font-bold text-warning">{price}</p>
                <Show when=move || show_stock>
                    <p class="text-sm text-base-content/60">"Color: " {color.clone()}</p>
                    <p class="text-sm text-base-content/60">"Available: " {quantity}</p>
                </Show>
                <button class="btn btn-warning mt-4 w-full" on:click=on_like>
                    {move || if is_liked() { "Unlike" } else { "Like" }}
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_prices_have_no_decimals() {
        assert_eq!(format_price(12000.0), "12000 so'm");
        assert_eq!(format_price(2.5), "2.50 so'm");
    }
}
