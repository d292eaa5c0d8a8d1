use super::*;
use crate::web::MemoryStorage;
use std::sync::Arc;

// =========================================================
// Helpers
// =========================================================

fn store_with(storage: &Arc<MemoryStorage>) -> SessionStore {
    SessionStore::initialize(storage.clone())
}

fn assert_logged_out(store: &SessionStore, storage: &MemoryStorage) {
    assert_eq!(store.session(), &Session::default());
    assert!(!storage.contains_key(STORAGE_KEY_TOKEN));
    assert!(!storage.contains_key(STORAGE_KEY_ROLE));
    assert!(!storage.contains_key(STORAGE_KEY_AUTHENTICATED));
}

/// One step of an arbitrary mutation script.
#[derive(Debug, Clone)]
enum Op {
    Token(Option<&'static str>),
    Authenticated(bool),
    Role(Option<&'static str>),
    Logout,
}

fn apply(store: &mut SessionStore, op: &Op) {
    match op {
        Op::Token(t) => store.set_token(t.map(str::to_string)),
        Op::Authenticated(flag) => store.set_authenticated(*flag),
        Op::Role(r) => store.set_role(r.map(str::to_string)),
        Op::Logout => store.logout(),
    }
}

// =========================================================
// Initialization
// =========================================================

#[test]
fn empty_storage_starts_unauthenticated() {
    let storage = Arc::new(MemoryStorage::new());
    let store = store_with(&storage);
    assert!(!store.is_authenticated());
    assert!(store.token().is_none());
    assert!(store.role().is_none());
}

#[test]
fn persisted_token_implies_authenticated() {
    let storage = Arc::new(MemoryStorage::seeded([
        (STORAGE_KEY_TOKEN, "abc.def.ghi"),
        (STORAGE_KEY_ROLE, "admin"),
    ]));
    let store = store_with(&storage);
    assert!(store.is_authenticated());
    assert_eq!(store.token(), Some("abc.def.ghi"));
    assert!(store.session().is_admin());
}

#[test]
fn persisted_flag_without_token_is_ignored() {
    let storage = Arc::new(MemoryStorage::seeded([
        (STORAGE_KEY_AUTHENTICATED, "true"),
        (STORAGE_KEY_ROLE, "admin"),
    ]));
    let store = store_with(&storage);
    assert!(!store.is_authenticated());
    assert!(!store.session().is_admin());
    assert_eq!(
        storage.get(STORAGE_KEY_AUTHENTICATED).as_deref(),
        Some("false")
    );
}

#[test]
fn stale_false_flag_is_rewritten_when_token_present() {
    let storage = Arc::new(MemoryStorage::seeded([
        (STORAGE_KEY_TOKEN, "abc.def.ghi"),
        (STORAGE_KEY_AUTHENTICATED, "false"),
    ]));
    let store = store_with(&storage);
    assert!(store.is_authenticated());
    assert_eq!(
        storage.get(STORAGE_KEY_AUTHENTICATED).as_deref(),
        Some("true")
    );
}

#[test]
fn missing_flag_is_not_created_on_restore() {
    let storage = Arc::new(MemoryStorage::new());
    store_with(&storage);
    assert!(!storage.contains_key(STORAGE_KEY_AUTHENTICATED));
}

// =========================================================
// Mutators
// =========================================================

#[test]
fn set_token_writes_through_and_none_removes() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = store_with(&storage);

    store.set_token(Some("t1".into()));
    assert_eq!(storage.get(STORAGE_KEY_TOKEN).as_deref(), Some("t1"));
    assert!(!store.is_authenticated(), "set_token must not touch the flag");

    store.set_token(None);
    assert!(store.token().is_none());
    assert!(!storage.contains_key(STORAGE_KEY_TOKEN));
}

#[test]
fn set_authenticated_persists_flag_as_text() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = store_with(&storage);

    store.set_authenticated(true);
    assert_eq!(storage.get(STORAGE_KEY_AUTHENTICATED).as_deref(), Some("true"));
    store.set_authenticated(false);
    assert_eq!(storage.get(STORAGE_KEY_AUTHENTICATED).as_deref(), Some("false"));
}

#[test]
fn set_role_persists_or_removes() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = store_with(&storage);

    store.set_role(Some("user".into()));
    assert_eq!(storage.get(STORAGE_KEY_ROLE).as_deref(), Some("user"));
    store.set_role(None);
    assert!(!storage.contains_key(STORAGE_KEY_ROLE));
}

#[test]
fn admin_scenario_allows_dashboard() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = store_with(&storage);

    store.set_token(Some("abc.def.ghi".into()));
    store.set_authenticated(true);
    store.set_role(Some("admin".into()));

    let decision = crate::web::route::guard(
        crate::web::route::AppRoute::from_path("/dashboard/products"),
        store.session(),
    );
    assert_eq!(
        decision,
        crate::web::route::GuardDecision::Allow(crate::web::route::AppRoute::DashboardProducts)
    );
}

#[test]
fn failed_writes_keep_in_memory_state() {
    let storage = Arc::new(MemoryStorage::read_only([]));
    let mut store = store_with(&storage);

    store.set_token(Some("t".into()));
    store.set_authenticated(true);
    assert_eq!(store.token(), Some("t"));
    assert!(store.is_authenticated());
    assert!(storage.is_empty());
}

// =========================================================
// Logout
// =========================================================

#[test]
fn logout_clears_state_and_every_key() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = store_with(&storage);
    store.set_token(Some("t".into()));
    store.set_authenticated(true);
    store.set_role(Some("admin".into()));

    store.logout();
    assert_logged_out(&store, &storage);
}

#[test]
fn logout_after_any_mutation_script_leaves_no_trace() {
    let alphabet = [
        Op::Token(Some("a.b.c")),
        Op::Token(None),
        Op::Authenticated(true),
        Op::Authenticated(false),
        Op::Role(Some("admin")),
        Op::Role(Some("user")),
        Op::Role(None),
        Op::Logout,
    ];

    // every script of length three over the alphabet
    for a in &alphabet {
        for b in &alphabet {
            for c in &alphabet {
                let storage = Arc::new(MemoryStorage::new());
                let mut store = store_with(&storage);
                for op in [a, b, c] {
                    apply(&mut store, op);
                }
                store.logout();
                assert_logged_out(&store, &storage);
            }
        }
    }
}

#[test]
fn logout_does_not_touch_unrelated_keys() {
    let storage = Arc::new(MemoryStorage::seeded([("likedProducts", "[]")]));
    let mut store = store_with(&storage);
    store.logout();
    assert!(storage.contains_key("likedProducts"));
}

#[test]
fn restart_restores_last_written_state() {
    let storage = Arc::new(MemoryStorage::new());
    {
        let mut store = store_with(&storage);
        store.set_token(Some("t".into()));
        store.set_authenticated(true);
        store.set_role(Some("user".into()));
    }
    let restored = store_with(&storage);
    assert!(restored.is_authenticated());
    assert_eq!(restored.role(), Some("user"));
}
