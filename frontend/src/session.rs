//! 会话模块
//!
//! 管理认证状态（认证标记、Bearer token、角色），并同步写入持久化存储。
//! 路由服务通过注入的会话信号来做守卫判定，与本模块解耦。

use banana_market_shared::{
    ROLE_ADMIN, STORAGE_KEY_AUTHENTICATED, STORAGE_KEY_ROLE, STORAGE_KEY_TOKEN,
};
use leptos::prelude::*;

use crate::web::{KeyValueStore, SharedStorage};

/// 会话状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// 是否已认证
    pub is_authenticated: bool,
    /// Bearer token
    pub token: Option<String>,
    /// 从 token 声明中解析出的角色，未经验证
    pub role: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.role.as_deref() == Some(ROLE_ADMIN)
    }
}

/// 会话存储
///
/// 内存状态是唯一的真实来源，每次修改都会同步写入 `storage`。
/// 写入失败只记录日志，不回滚。
#[derive(Clone)]
pub struct SessionStore {
    session: Session,
    storage: SharedStorage,
}

impl SessionStore {
    /// 从持久化存储恢复会话
    ///
    /// `isAuthenticated` 由 token 是否存在推导，不读取持久化的标记。
    pub fn initialize(storage: SharedStorage) -> Self {
        let token = storage.get(STORAGE_KEY_TOKEN);
        let role = storage.get(STORAGE_KEY_ROLE);
        let session = Session {
            is_authenticated: token.is_some(),
            token,
            role,
        };
        // 持久化的标记与推导结果不一致时以内存为准写回
        let derived = persisted_flag(session.is_authenticated);
        if let Some(flag) = storage.get(STORAGE_KEY_AUTHENTICATED)
            && flag != derived
            && !storage.set(STORAGE_KEY_AUTHENTICATED, derived)
        {
            log::warn!("[Session] failed to persist {}", STORAGE_KEY_AUTHENTICATED);
        }
        log::debug!(
            "[Session] restored: authenticated={}, role={:?}",
            session.is_authenticated,
            session.role
        );
        Self { session, storage }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.session.role.as_deref()
    }

    /// 设置 token，`None` 时删除持久化的值。不会改变认证标记。
    pub fn set_token(&mut self, token: Option<String>) {
        write_optional(self.storage.as_ref(), STORAGE_KEY_TOKEN, token.as_deref());
        self.session.token = token;
    }

    pub fn set_authenticated(&mut self, flag: bool) {
        self.session.is_authenticated = flag;
        if !self.storage.set(STORAGE_KEY_AUTHENTICATED, persisted_flag(flag)) {
            log::warn!("[Session] failed to persist {}", STORAGE_KEY_AUTHENTICATED);
        }
    }

    pub fn set_role(&mut self, role: Option<String>) {
        write_optional(self.storage.as_ref(), STORAGE_KEY_ROLE, role.as_deref());
        self.session.role = role;
    }

    /// 注销：同时清空三个字段及其持久化键
    ///
    /// 收藏列表不归本模块管理，见 `actions::end_session`。
    pub fn logout(&mut self) {
        self.session = Session::default();
        for key in [STORAGE_KEY_TOKEN, STORAGE_KEY_ROLE, STORAGE_KEY_AUTHENTICATED] {
            if !self.storage.delete(key) {
                log::warn!("[Session] failed to remove {}", key);
            }
        }
    }
}

fn persisted_flag(flag: bool) -> &'static str {
    if flag { "true" } else { "false" }
}

fn write_optional(storage: &dyn KeyValueStore, key: &str, value: Option<&str>) {
    let ok = match value {
        Some(value) => storage.set(key, value),
        None => storage.delete(key),
    };
    if !ok {
        log::warn!("[Session] failed to persist {}", key);
    }
}

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// 会话存储（只读）
    pub state: ReadSignal<SessionStore>,
    /// 修改会话存储（写入）
    pub set_state: WriteSignal<SessionStore>,
}

impl SessionContext {
    /// 创建会话上下文，并立即从存储中恢复状态
    pub fn new(storage: SharedStorage) -> Self {
        let (state, set_state) = signal(SessionStore::initialize(storage));
        Self { state, set_state }
    }

    /// 获取会话快照信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Session> {
        let state = self.state;
        Signal::derive(move || state.with(|store| store.session().clone()))
    }

    /// 当前 token，不建立响应式依赖
    pub fn token_untracked(&self) -> Option<String> {
        self.state.with_untracked(|store| store.token().map(str::to_string))
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

#[cfg(test)]
mod tests;
