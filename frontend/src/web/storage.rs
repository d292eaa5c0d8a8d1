//! 键值存储模块
//!
//! `KeyValueStore` 是持久化状态的唯一出口：
//! - `LocalStorage`: 浏览器 `window.localStorage` 封装
//! - `MemoryStorage`: 进程内实现，用于测试和无浏览器环境

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// 字符串键值存储
///
/// 所有写操作都是同步、尽力而为的：返回 `false` 表示写入失败，
/// 调用方只记录日志，不回滚内存状态。
pub trait KeyValueStore: Send + Sync {
    /// 获取存储的字符串值，键不存在或读取失败时返回 `None`
    fn get(&self, key: &str) -> Option<String>;

    /// 设置存储值
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除存储的键值对
    fn delete(&self, key: &str) -> bool;
}

/// 在多个 store 之间共享的存储句柄
pub type SharedStorage = Arc<dyn KeyValueStore>;

/// 本地存储操作封装
///
/// 使用 `web_sys::Storage` 访问浏览器 LocalStorage API。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定的键值对初始化
    pub fn seeded<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(entries),
            read_only: false,
        }
    }

    /// 所有写操作都失败的存储（模拟配额耗尽或隐私模式）
    pub fn read_only<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            read_only: true,
            ..Self::seeded(pairs)
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        if self.read_only {
            return false;
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        if self.read_only {
            return false;
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        true
    }
}
