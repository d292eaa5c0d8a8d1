//! 跨 store 的用例编排
//!
//! 网络请求与状态写入分两步：请求函数是异步的，只返回结果；
//! `apply_*` 是同步的，由调用方在信号更新中执行。

use banana_market_shared::protocol::{LoginRequest, RegisterRequest};
use banana_market_shared::{FavoriteEntry, Product};

use crate::api::StoreApi;
use crate::error::{AppError, AppResult};
use crate::favorites::FavoritesStore;
use crate::session::{Session, SessionStore};
use crate::token::decode_role;
use crate::web::Transport;

/// 登录成功后需要写入会话的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Option<String>,
}

/// 登录并解析角色
///
/// token 无法解析时整个登录失败，会话保持不变。
pub async fn login<T: Transport>(
    api: &StoreApi<T>,
    request: LoginRequest,
) -> AppResult<LoginOutcome> {
    let response = api.send(&request).await?;
    let outcome = LoginOutcome::from_token(response.token)?;
    log::info!("[Auth] login succeeded, role={:?}", outcome.role);
    Ok(outcome)
}

impl LoginOutcome {
    /// 角色总是从 token 声明中解析，不沿用旧会话的角色
    fn from_token(token: String) -> AppResult<Self> {
        let role = decode_role(&token)?;
        Ok(Self { token, role })
    }
}

/// 写入登录或注册结果：先 token，再认证标记，最后角色
pub fn apply_login(store: &mut SessionStore, outcome: &LoginOutcome) {
    store.set_token(Some(outcome.token.clone()));
    store.set_authenticated(true);
    store.set_role(outcome.role.clone());
}

/// 注册并解析新 token 的角色
///
/// 结果与登录一样通过 `apply_login` 写入。
pub async fn register<T: Transport>(
    api: &StoreApi<T>,
    request: RegisterRequest,
) -> AppResult<LoginOutcome> {
    let response = api.send(&request).await?;
    let outcome = LoginOutcome::from_token(response.token)?;
    log::info!("[Auth] registration succeeded, role={:?}", outcome.role);
    Ok(outcome)
}

/// 收藏切换的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeChange {
    Liked,
    Unliked,
}

/// 切换商品的收藏状态
///
/// 未登录时不做任何修改。先检查 `contains` 再添加，保证同一个 id 只出现一次。
pub fn toggle_like(
    session: &Session,
    favorites: &mut FavoritesStore,
    product: &Product,
) -> AppResult<LikeChange> {
    if !session.is_authenticated {
        return Err(AppError::Unauthenticated);
    }
    if favorites.contains(&product.id) {
        favorites.remove(&product.id);
        Ok(LikeChange::Unliked)
    } else {
        favorites.add(FavoriteEntry::from(product));
        Ok(LikeChange::Liked)
    }
}

/// 注销并清空收藏
pub fn end_session(session: &mut SessionStore, favorites: &mut FavoritesStore) {
    session.logout();
    favorites.clear();
    log::info!("[Auth] session ended");
}
