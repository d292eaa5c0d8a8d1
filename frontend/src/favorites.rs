//! 收藏模块
//!
//! 保存用户点赞的商品快照，按插入顺序排列，并完整写入持久化存储。

use banana_market_shared::{FavoriteEntry, STORAGE_KEY_LIKED_PRODUCTS};
use leptos::prelude::*;

use crate::web::SharedStorage;

/// 收藏存储
///
/// `add` 不去重：调用方需要先用 `contains` 检查（见 `actions::toggle_like`）。
#[derive(Clone)]
pub struct FavoritesStore {
    entries: Vec<FavoriteEntry>,
    storage: SharedStorage,
}

impl FavoritesStore {
    /// 从持久化存储恢复，数据缺失或损坏时视为空列表
    ///
    /// 损坏的值会被删除，存储与内存保持一致。
    pub fn initialize(storage: SharedStorage) -> Self {
        let entries = match storage.get(STORAGE_KEY_LIKED_PRODUCTS) {
            None => Vec::new(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!(
                    "[Favorites] discarding malformed {}: {}",
                    STORAGE_KEY_LIKED_PRODUCTS,
                    e
                );
                if !storage.delete(STORAGE_KEY_LIKED_PRODUCTS) {
                    log::warn!(
                        "[Favorites] failed to remove {}",
                        STORAGE_KEY_LIKED_PRODUCTS
                    );
                }
                Vec::new()
            }),
        };
        Self { entries, storage }
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.entries.iter().any(|e| e.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 追加一条收藏
    pub fn add(&mut self, entry: FavoriteEntry) {
        self.entries.push(entry);
        self.persist();
    }

    /// 删除指定商品，不存在时什么也不做
    pub fn remove(&mut self, product_id: &str) {
        self.entries.retain(|e| e.id != product_id);
        self.persist();
    }

    /// 清空收藏并删除持久化的键
    pub fn clear(&mut self) {
        self.entries.clear();
        if !self.storage.delete(STORAGE_KEY_LIKED_PRODUCTS) {
            log::warn!(
                "[Favorites] failed to remove {}",
                STORAGE_KEY_LIKED_PRODUCTS
            );
        }
    }

    fn persist(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(raw) => {
                if !self.storage.set(STORAGE_KEY_LIKED_PRODUCTS, &raw) {
                    log::warn!(
                        "[Favorites] failed to persist {}",
                        STORAGE_KEY_LIKED_PRODUCTS
                    );
                }
            }
            Err(e) => log::error!("[Favorites] serialization failed: {}", e),
        }
    }
}

/// 收藏上下文
#[derive(Clone, Copy)]
pub struct FavoritesContext {
    pub state: ReadSignal<FavoritesStore>,
    pub set_state: WriteSignal<FavoritesStore>,
}

impl FavoritesContext {
    pub fn new(storage: SharedStorage) -> Self {
        let (state, set_state) = signal(FavoritesStore::initialize(storage));
        Self { state, set_state }
    }
}

pub fn use_favorites() -> FavoritesContext {
    use_context::<FavoritesContext>().expect("FavoritesContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::{KeyValueStore, MemoryStorage};
    use std::sync::Arc;

    fn entry(id: &str) -> FavoriteEntry {
        FavoriteEntry {
            id: id.to_string(),
            name: format!("Product {}", id),
            category_name: "Fruit".to_string(),
            image: format!("{}.png", id),
            price: 10.0,
            color: "yellow".to_string(),
            quantity: 3,
        }
    }

    fn persisted(storage: &MemoryStorage) -> Vec<FavoriteEntry> {
        let raw = storage.get(STORAGE_KEY_LIKED_PRODUCTS).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn missing_key_starts_empty() {
        let store = FavoritesStore::initialize(Arc::new(MemoryStorage::new()));
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_storage_degrades_to_empty() {
        for raw in ["not json", "{\"id\":1}", "[{\"id\":\"1\"}]", ""] {
            let storage = Arc::new(MemoryStorage::seeded([(STORAGE_KEY_LIKED_PRODUCTS, raw)]));
            let store = FavoritesStore::initialize(storage);
            assert!(store.is_empty(), "{raw:?} should be treated as absent");
        }
    }

    #[test]
    fn malformed_value_is_removed_from_storage() {
        let storage = Arc::new(MemoryStorage::seeded([(
            STORAGE_KEY_LIKED_PRODUCTS,
            "not json",
        )]));
        let store = FavoritesStore::initialize(storage.clone());
        assert!(store.is_empty());
        assert_eq!(storage.get(STORAGE_KEY_LIKED_PRODUCTS), None);
    }

    #[test]
    fn valid_value_is_left_untouched() {
        let raw = serde_json::to_string(&vec![entry("1")]).unwrap();
        let storage = Arc::new(MemoryStorage::seeded([(STORAGE_KEY_LIKED_PRODUCTS, raw.as_str())]));
        FavoritesStore::initialize(storage.clone());
        assert_eq!(storage.get(STORAGE_KEY_LIKED_PRODUCTS), Some(raw));
    }

    #[test]
    fn restores_persisted_entries_in_order() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut store = FavoritesStore::initialize(storage.clone());
            store.add(entry("1"));
            store.add(entry("2"));
        }
        let restored = FavoritesStore::initialize(storage);
        let ids: Vec<_> = restored.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn add_persists_full_collection() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = FavoritesStore::initialize(storage.clone());
        store.add(entry("1"));
        store.add(entry("2"));
        assert_eq!(persisted(&storage), vec![entry("1"), entry("2")]);
    }

    #[test]
    fn add_then_remove_restores_prior_collection() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = FavoritesStore::initialize(storage.clone());
        store.add(entry("1"));
        store.add(entry("2"));
        let before = store.entries().to_vec();

        store.add(entry("3"));
        store.remove("3");

        assert_eq!(store.entries(), before.as_slice());
        assert_eq!(persisted(&storage), before);
    }

    #[test]
    fn removing_absent_id_is_a_no_op() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = FavoritesStore::initialize(storage.clone());
        store.add(entry("1"));

        store.remove("2");
        assert_eq!(store.entries(), &[entry("1")]);
        assert_eq!(persisted(&storage), vec![entry("1")]);
    }

    #[test]
    fn add_without_membership_check_allows_duplicates() {
        let mut store = FavoritesStore::initialize(Arc::new(MemoryStorage::new()));
        store.add(entry("1"));
        store.add(entry("1"));
        assert_eq!(store.len(), 2);
        assert!(store.entries().iter().all(|e| e.id == "1"));
    }

    #[test]
    fn remove_drops_every_duplicate() {
        let mut store = FavoritesStore::initialize(Arc::new(MemoryStorage::new()));
        store.add(entry("1"));
        store.add(entry("1"));
        store.remove("1");
        assert!(store.is_empty());
    }

    #[test]
    fn clear_empties_and_removes_key() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = FavoritesStore::initialize(storage.clone());
        store.add(entry("1"));
        store.clear();
        assert!(store.is_empty());
        assert!(!storage.contains_key(STORAGE_KEY_LIKED_PRODUCTS));
    }

    #[test]
    fn entries_are_snapshots_independent_of_later_product_edits() {
        let mut product = banana_market_shared::Product {
            id: "1".into(),
            name: "Banana".into(),
            color: "yellow".into(),
            price: 5.0,
            quantity: 1,
            category: Default::default(),
            image: String::new(),
        };
        let mut store = FavoritesStore::initialize(Arc::new(MemoryStorage::new()));
        store.add(FavoriteEntry::from(&product));

        product.price = 99.0;
        assert_eq!(store.entries()[0].price, 5.0);
    }
}
