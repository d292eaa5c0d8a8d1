//! Banana Market 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫判定（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `session` / `favorites`: 持久化的状态存储
//! - `query`: 请求缓存
//! - `actions`: 跨 store 的用例
//! - `components`: UI 组件层

pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod favorites;
pub mod query;
pub mod session;
pub mod token;
pub mod web;

mod components {
    pub mod admin {
        pub mod categories;
        pub mod forms;
        pub mod layout;
        pub mod products;
        pub mod users;
    }
    pub mod category;
    pub mod header;
    pub mod home;
    pub mod liked;
    pub mod login;
    pub mod product_card;
    pub mod register;
    pub mod toast;
}

use std::sync::Arc;
use std::time::Duration;

use leptos::prelude::*;

use crate::components::admin::categories::AdminCategoriesPage;
use crate::components::admin::layout::DashboardHome;
use crate::components::admin::products::AdminProductsPage;
use crate::components::admin::users::AdminUsersPage;
use crate::components::category::CategoryPage;
use crate::components::header::SiteHeader;
use crate::components::home::HomePage;
use crate::components::liked::LikedPage;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::components::toast::{ToastContext, ToastHost};
use crate::config::AppConfig;
use crate::favorites::FavoritesContext;
use crate::query::QueryContext;
use crate::session::SessionContext;
use crate::web::route::AppRoute;
use crate::web::router::{Link, Router, RouterOutlet, use_router};
use crate::web::{LocalStorage, SharedStorage};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Liked => view! { <LikedPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Category(id) => view! { <CategoryPage category_id=id /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardHome /> }.into_any(),
        AppRoute::DashboardProducts => view! { <AdminProductsPage /> }.into_any(),
        AppRoute::DashboardCategories => view! { <AdminCategoriesPage /> }.into_any(),
        AppRoute::DashboardUsers => view! { <AdminUsersPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to="/" class="btn btn-warning mt-6">"Back to Home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 登录、注册和后台页面不显示站点头部
#[component]
fn HeaderSlot() -> impl IntoView {
    let route = use_router().guarded_route();
    let hidden = Memo::new(move |_| route.get().hides_header());
    move || (!hidden.get()).then(|| view! { <SiteHeader /> })
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    // 1. 配置与持久化存储
    let storage: SharedStorage = Arc::new(LocalStorage);
    let toast_duration = Duration::from_millis(config.toast_millis);
    provide_context(config);

    // 2. 状态存储：创建时立即从 LocalStorage 恢复
    let session_ctx = SessionContext::new(storage.clone());
    provide_context(session_ctx);
    provide_context(FavoritesContext::new(storage));

    provide_context(ToastContext::new(toast_duration));
    provide_context(QueryContext::new());

    // 3. 会话信号注入路由服务，实现守卫
    let session = session_ctx.session_signal();

    view! {
        <Router session=session>
            <HeaderSlot />
            <RouterOutlet matcher=route_matcher />
            <ToastHost />
        </Router>
    }
}
