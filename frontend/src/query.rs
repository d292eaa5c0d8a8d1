//! 数据请求缓存
//!
//! 以请求为键缓存结果：同一个键的并发请求共享同一个 future，
//! 结果就绪后一直有效，直到被显式失效。失败的结果不会被复用，
//! 下一次请求会重新加载。

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::rc::Rc;

use banana_market_shared::protocol::{CategoryList, ProductPage};
use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::error::{AppError, AppResult};

/// 缓存键，形如 `products:page=1:limit=3`
///
/// 第一段是作用域，写操作按作用域整体失效。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(scope: &str) -> Self {
        Self(scope.to_string())
    }

    pub fn with(self, part: impl Display) -> Self {
        Self(format!("{}:{}", self.0, part))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn in_scope(&self, scope: &str) -> bool {
        self.0
            .strip_prefix(scope)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(':'))
    }
}

/// 查询状态
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus<V> {
    Idle,
    Loading,
    Ready(V),
    Failed(AppError),
}

impl<V> QueryStatus<V> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryStatus::Loading)
    }

    pub fn ready(&self) -> Option<&V> {
        match self {
            QueryStatus::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<V> From<AppResult<V>> for QueryStatus<V> {
    fn from(result: AppResult<V>) -> Self {
        match result {
            Ok(value) => QueryStatus::Ready(value),
            Err(e) => QueryStatus::Failed(e),
        }
    }
}

type SharedLoad<V> = Shared<LocalBoxFuture<'static, AppResult<V>>>;

enum Entry<V> {
    InFlight { generation: u64, load: SharedLoad<V> },
    Ready(V),
    Failed(AppError),
}

struct Inner<V> {
    entries: HashMap<QueryKey, Entry<V>>,
    generation: u64,
}

/// 单线程请求缓存
pub struct QueryCache<V> {
    inner: Rc<RefCell<Inner<V>>>,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: Clone + 'static> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

enum Lookup<V> {
    Hit(V),
    Pending(u64, SharedLoad<V>),
    Miss,
}

impl<V: Clone + 'static> QueryCache<V> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                entries: HashMap::new(),
                generation: 0,
            })),
        }
    }

    /// 获取键对应的结果
    ///
    /// 已就绪直接返回；正在加载则等待同一个请求；否则调用 `loader`。
    pub async fn fetch<F, Fut>(&self, key: QueryKey, loader: F) -> AppResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>> + 'static,
    {
        let (generation, load) = match self.lookup(&key) {
            Lookup::Hit(value) => return Ok(value),
            Lookup::Pending(generation, load) => {
                log::debug!("[Query] joining in-flight request {}", key.as_str());
                (generation, load)
            }
            Lookup::Miss => self.start(key.clone(), loader),
        };

        let result = load.await;
        self.settle(&key, generation, &result);
        result
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.inner.borrow_mut().entries.remove(key);
    }

    /// 失效作用域下的所有键
    pub fn invalidate_scope(&self, scope: &str) {
        self.inner
            .borrow_mut()
            .entries
            .retain(|key, _| !key.in_scope(scope));
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus<V> {
        match self.inner.borrow().entries.get(key) {
            None => QueryStatus::Idle,
            Some(Entry::InFlight { .. }) => QueryStatus::Loading,
            Some(Entry::Ready(value)) => QueryStatus::Ready(value.clone()),
            Some(Entry::Failed(e)) => QueryStatus::Failed(e.clone()),
        }
    }

    fn lookup(&self, key: &QueryKey) -> Lookup<V> {
        match self.inner.borrow().entries.get(key) {
            Some(Entry::Ready(value)) => Lookup::Hit(value.clone()),
            Some(Entry::InFlight { generation, load }) => {
                Lookup::Pending(*generation, load.clone())
            }
            Some(Entry::Failed(_)) | None => Lookup::Miss,
        }
    }

    // loader 在借用之外调用，允许它同步访问缓存
    fn start<F, Fut>(&self, key: QueryKey, loader: F) -> (u64, SharedLoad<V>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>> + 'static,
    {
        let load = loader().boxed_local().shared();
        let mut inner = self.inner.borrow_mut();
        inner.generation += 1;
        let generation = inner.generation;
        inner.entries.insert(
            key,
            Entry::InFlight {
                generation,
                load: load.clone(),
            },
        );
        (generation, load)
    }

    // 只有仍然是同一次加载时才写回，失效后到达的结果被丢弃
    fn settle(&self, key: &QueryKey, generation: u64, result: &AppResult<V>) {
        let mut inner = self.inner.borrow_mut();
        let current = matches!(
            inner.entries.get(key),
            Some(Entry::InFlight { generation: g, .. }) if *g == generation
        );
        if !current {
            return;
        }
        let entry = match result {
            Ok(value) => Entry::Ready(value.clone()),
            Err(e) => {
                log::warn!("[Query] {} failed: {}", key.as_str(), e);
                Entry::Failed(e.clone())
            }
        };
        inner.entries.insert(key.clone(), entry);
    }
}

/// 应用级缓存上下文
///
/// 缓存本身不是 `Send`，存放在本地 StoredValue 中。
/// `revision` 在每次失效后递增，正在显示的查询据此重新加载。
#[derive(Clone, Copy)]
pub struct QueryContext {
    products: StoredValue<QueryCache<ProductPage>, LocalStorage>,
    categories: StoredValue<QueryCache<CategoryList>, LocalStorage>,
    revision: RwSignal<u64>,
}

pub const PRODUCTS_SCOPE: &str = "products";
pub const CATEGORIES_SCOPE: &str = "categories";

impl QueryContext {
    pub fn new() -> Self {
        Self {
            products: StoredValue::new_local(QueryCache::new()),
            categories: StoredValue::new_local(QueryCache::new()),
            revision: RwSignal::new(0),
        }
    }

    pub fn invalidate_products(&self) {
        self.products
            .with_value(|cache| cache.invalidate_scope(PRODUCTS_SCOPE));
        self.revision.update(|r| *r += 1);
    }

    pub fn invalidate_categories(&self) {
        self.categories
            .with_value(|cache| cache.invalidate_scope(CATEGORIES_SCOPE));
        self.revision.update(|r| *r += 1);
    }

    /// 订阅商品查询，`source` 返回 `None` 时保持空闲
    pub fn watch_products<S, Fut>(&self, source: S) -> ReadSignal<QueryStatus<ProductPage>>
    where
        S: Fn() -> Option<(QueryKey, Fut)> + 'static,
        Fut: Future<Output = AppResult<ProductPage>> + 'static,
    {
        watch(self.products, self.revision, source)
    }

    pub fn watch_categories<S, Fut>(&self, source: S) -> ReadSignal<QueryStatus<CategoryList>>
    where
        S: Fn() -> Option<(QueryKey, Fut)> + 'static,
        Fut: Future<Output = AppResult<CategoryList>> + 'static,
    {
        watch(self.categories, self.revision, source)
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new()
    }
}

fn watch<V, S, Fut>(
    cache: StoredValue<QueryCache<V>, LocalStorage>,
    revision: RwSignal<u64>,
    source: S,
) -> ReadSignal<QueryStatus<V>>
where
    V: Clone + Send + Sync + 'static,
    S: Fn() -> Option<(QueryKey, Fut)> + 'static,
    Fut: Future<Output = AppResult<V>> + 'static,
{
    let (status, set_status) = signal(QueryStatus::Idle);
    // 只接受最近一次请求的结果
    let ticket = Rc::new(std::cell::Cell::new(0u64));

    Effect::new(move |_| {
        revision.track();
        ticket.set(ticket.get() + 1);

        let Some((key, load)) = source() else {
            set_status.set(QueryStatus::Idle);
            return;
        };
        let cache = cache.get_value();
        if let QueryStatus::Ready(value) = cache.status(&key) {
            set_status.set(QueryStatus::Ready(value));
            return;
        }

        set_status.set(QueryStatus::Loading);
        let ticket = Rc::clone(&ticket);
        let issued = ticket.get();
        spawn_local(async move {
            let result = cache.fetch(key, move || load).await;
            if ticket.get() == issued {
                set_status.set(result.into());
            }
        });
    });

    status
}

pub fn use_queries() -> QueryContext {
    use_context::<QueryContext>().expect("QueryContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use std::cell::Cell;

    fn key(name: &str) -> QueryKey {
        QueryKey::new(PRODUCTS_SCOPE).with(name)
    }

    fn counting(
        calls: &Rc<Cell<u32>>,
        value: u32,
    ) -> impl FnOnce() -> futures::future::Ready<AppResult<u32>> {
        let calls = Rc::clone(calls);
        move || {
            calls.set(calls.get() + 1);
            futures::future::ready(Ok(value))
        }
    }

    #[test]
    fn key_scopes() {
        let k = QueryKey::new("products").with("page=1").with("limit=3");
        assert_eq!(k.as_str(), "products:page=1:limit=3");
        assert!(k.in_scope("products"));
        assert!(!k.in_scope("product"));
        assert!(QueryKey::new("products").in_scope("products"));
        assert!(!QueryKey::new("categories").in_scope("products"));
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_load() {
        let cache = QueryCache::<u32>::new();
        let calls = Rc::new(Cell::new(0));
        let (tx, rx) = oneshot::channel::<u32>();

        let first = cache.fetch(key("a"), {
            let calls = Rc::clone(&calls);
            move || {
                calls.set(calls.get() + 1);
                async move { rx.await.map_err(|_| AppError::Network("dropped".into())) }
            }
        });
        let second = cache.fetch(key("a"), counting(&calls, 99));
        let release = async move {
            tx.send(5).unwrap();
        };

        let (a, b, ()) = futures::join!(first, second, release);
        assert_eq!(a, Ok(5));
        assert_eq!(b, Ok(5));
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.status(&key("a")), QueryStatus::Ready(5));
    }

    #[tokio::test]
    async fn loading_status_while_in_flight() {
        let cache = QueryCache::<u32>::new();
        let (tx, rx) = oneshot::channel::<u32>();
        assert_eq!(cache.status(&key("a")), QueryStatus::Idle);

        let mut pending = Box::pin(cache.fetch(key("a"), move || async move {
            rx.await.map_err(|_| AppError::Network("dropped".into()))
        }));
        assert!(futures::poll!(pending.as_mut()).is_pending());
        assert!(cache.status(&key("a")).is_loading());

        tx.send(1).unwrap();
        assert_eq!(pending.await, Ok(1));
    }

    #[tokio::test]
    async fn ready_value_is_reused_until_invalidated() {
        let cache = QueryCache::<u32>::new();
        let calls = Rc::new(Cell::new(0));

        assert_eq!(cache.fetch(key("a"), counting(&calls, 1)).await, Ok(1));
        assert_eq!(cache.fetch(key("a"), counting(&calls, 2)).await, Ok(1));
        assert_eq!(calls.get(), 1);

        cache.invalidate(&key("a"));
        assert_eq!(cache.fetch(key("a"), counting(&calls, 3)).await, Ok(3));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn failures_are_reported_but_not_reused() {
        let cache = QueryCache::<u32>::new();
        let failed = cache
            .fetch(key("a"), || async { Err::<u32, _>(AppError::status(500, "")) })
            .await;
        assert_eq!(failed, Err(AppError::status(500, "")));
        assert_eq!(
            cache.status(&key("a")),
            QueryStatus::Failed(AppError::status(500, ""))
        );

        let calls = Rc::new(Cell::new(0));
        assert_eq!(cache.fetch(key("a"), counting(&calls, 7)).await, Ok(7));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn result_settling_after_invalidate_is_dropped() {
        let cache = QueryCache::<u32>::new();
        let (tx, rx) = oneshot::channel::<u32>();
        let mut pending = Box::pin(cache.fetch(key("a"), move || async move {
            rx.await.map_err(|_| AppError::Network("dropped".into()))
        }));
        assert!(futures::poll!(pending.as_mut()).is_pending());

        cache.invalidate(&key("a"));
        tx.send(4).unwrap();
        assert_eq!(pending.await, Ok(4));
        assert_eq!(cache.status(&key("a")), QueryStatus::Idle);
    }

    #[tokio::test]
    async fn scope_invalidation_keeps_other_scopes() {
        let cache = QueryCache::<u32>::new();
        let calls = Rc::new(Cell::new(0));
        let other = QueryKey::new(CATEGORIES_SCOPE);
        cache.fetch(key("a"), counting(&calls, 1)).await.unwrap();
        cache.fetch(key("b"), counting(&calls, 2)).await.unwrap();
        cache.fetch(other.clone(), counting(&calls, 3)).await.unwrap();

        cache.invalidate_scope(PRODUCTS_SCOPE);
        assert_eq!(cache.status(&key("a")), QueryStatus::Idle);
        assert_eq!(cache.status(&key("b")), QueryStatus::Idle);
        assert_eq!(cache.status(&other), QueryStatus::Ready(3));
    }
}
