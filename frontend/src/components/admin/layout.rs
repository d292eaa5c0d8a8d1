use leptos::prelude::*;

use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

const MENU: [(&str, AppRoute); 4] = [
    ("Home", AppRoute::Home),
    ("Products", AppRoute::DashboardProducts),
    ("Categories", AppRoute::DashboardCategories),
    ("Users", AppRoute::DashboardUsers),
];

/// 后台布局：左侧菜单 + 内容区
#[component]
pub fn DashboardLayout(children: Children) -> impl IntoView {
    let current = use_router().current_route();

    let menu = MENU
        .iter()
        .map(|(label, route)| {
            // 每次路由切换都会重新渲染整个布局
            let class = if current.with_untracked(|c| c == route) {
                "active"
            } else {
                ""
            };
            view! {
                <li>
                    <Link to=route.to_path() class=class>{*label}</Link>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="flex min-h-screen">
            <aside class="w-64 bg-neutral text-warning p-4 flex flex-col">
                <h1 class="text-2xl font-bold text-center mb-6">"Admin Dashboard"</h1>
                <ul class="menu flex-1 gap-2">{menu}</ul>
            </aside>
            <main class="flex-1 p-6 bg-base-200 overflow-auto">{children()}</main>
        </div>
    }
}

/// 后台首页
#[component]
pub fn DashboardHome() -> impl IntoView {
    view! {
        <DashboardLayout>
            <h1 class="text-xl font-bold">"Welcome to the Dashboard!"</h1>
        </DashboardLayout>
    }
}
