//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、它们的访问规则以及守卫判定。

use std::fmt::Display;

use crate::session::Session;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页：分页商品列表
    #[default]
    Home,
    /// 收藏商品
    Liked,
    Login,
    Register,
    /// 按分类筛选的商品列表
    Category(String),
    /// 管理后台首页 (需要管理员)
    Dashboard,
    DashboardProducts,
    DashboardCategories,
    DashboardUsers,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["liked"] => Self::Liked,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["category", id] => Self::Category((*id).to_string()),
            ["dashboard"] => Self::Dashboard,
            ["dashboard", "products"] => Self::DashboardProducts,
            ["dashboard", "categories"] => Self::DashboardCategories,
            ["dashboard", "users"] => Self::DashboardUsers,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Liked => "/liked".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Category(id) => format!("/category/{}", id),
            Self::Dashboard => "/dashboard".to_string(),
            Self::DashboardProducts => "/dashboard/products".to_string(),
            Self::DashboardCategories => "/dashboard/categories".to_string(),
            Self::DashboardUsers => "/dashboard/users".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要管理员身份**
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::DashboardProducts
                | Self::DashboardCategories
                | Self::DashboardUsers
        )
    }

    /// 登录、注册和后台页面不显示站点头部
    pub fn hides_header(&self) -> bool {
        matches!(self, Self::Login | Self::Register) || self.requires_admin()
    }

    /// 获取守卫拒绝时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 登录成功后的落地页：管理员进入商品管理，其他人回到首页
    pub fn landing_for(role: Option<&str>) -> Self {
        if role == Some(banana_market_shared::ROLE_ADMIN) {
            Self::DashboardProducts
        } else {
            Self::Home
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 允许进入目标路由
    Allow(AppRoute),
    /// 拒绝，替换历史记录并跳转到给定路由
    Redirect(AppRoute),
}

impl GuardDecision {
    /// 最终应当渲染的路由
    pub fn route(&self) -> &AppRoute {
        match self {
            Self::Allow(route) | Self::Redirect(route) => route,
        }
    }
}

/// 会话是否可以访问管理页面
///
/// 角色来自未验证的 token 声明，仅用于界面体验；真正的权限校验在服务端。
pub fn is_allowed(session: &Session) -> bool {
    session.is_admin()
}

/// 对目标路由执行守卫
///
/// 每次导航、popstate 与会话变化时都会重新计算，不做缓存。
pub fn guard(target: AppRoute, session: &Session) -> GuardDecision {
    if target.requires_admin() && !is_allowed(session) {
        GuardDecision::Redirect(AppRoute::auth_failure_redirect())
    } else {
        GuardDecision::Allow(target)
    }
}
