//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 每次导航、浏览器前进后退以及会话变化时都会重新执行守卫判定。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardDecision, guard};
use crate::session::Session;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window()
        && let Ok(history) = window.history()
    {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window()
        && let Ok(history) = window.history()
    {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 路由器服务
///
/// 会话信号由外部注入，路由模块不依赖会话的存储方式。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    session: Signal<Session>,
}

impl RouterService {
    fn new(session: Signal<Session>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 当前路由经过守卫后的结果，渲染时使用
    ///
    /// 受保护的视图不会在重定向生效前被渲染出来。
    /// 以 Memo 缓存，守卫结果不变时不会重新渲染。
    pub fn guarded_route(&self) -> Memo<AppRoute> {
        let current_route = self.current_route;
        let session = self.session;
        Memo::new(move |_| {
            let route = current_route.get();
            session.with(|s| guard(route, s).route().clone())
        })
    }

    /// 导航到路径并推入 History
    pub fn navigate(&self, path: &str) {
        self.apply(path, true);
    }

    pub fn navigate_to_route(&self, route: &AppRoute) {
        self.apply(&route.to_path(), true);
    }

    /// 守卫判定后更新 History 和当前路由
    ///
    /// `use_push` 为 false 时使用 replaceState。被拒绝时写入重定向目标的路径。
    fn apply(&self, path: &str, use_push: bool) {
        let target_route = AppRoute::from_path(path);
        let decision = self.session.with_untracked(|s| guard(target_route, s));
        let (route, path) = match decision {
            GuardDecision::Allow(route) => (route, path.to_string()),
            GuardDecision::Redirect(redirect) => {
                log::info!("[Router] Access denied to {}. Redirecting to {}.", path, redirect);
                let redirect_path = redirect.to_path();
                (redirect, redirect_path)
            }
        };

        if use_push {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        self.set_route.set(route);
    }

    /// 初始加载时执行一次守卫
    fn guard_initial_route(&self) {
        if self.current_route.get_untracked().requires_admin() {
            self.apply(&current_path(), false);
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            router.apply(&current_path(), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化时，若停留在已无权访问的页面则重定向
    fn setup_session_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let decision = router
                .session
                .with(|s| guard(router.current_route.get_untracked(), s));
            if let GuardDecision::Redirect(redirect) = decision {
                log::info!(
                    "[Router] Session changed, access revoked. Redirecting to {}.",
                    redirect
                );
                replace_history_state(&redirect.to_path());
                router.set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Session>) -> RouterService {
    let router = RouterService::new(session);

    router.guard_initial_route();
    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 会话信号，用于守卫判定
    session: Signal<Session>,
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 按守卫后的路由渲染对应视图。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let route = use_router().guarded_route();

    move || matcher(route.get())
}

/// 站内链接，点击时走路由服务而不是整页刷新
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
