use super::*;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{
    DisplayOrderPatch, EntityStore, ListOrder, Orderable, Searchable, StoreError, StoreResult,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: String,
    name: String,
    tag: String,
    display_order: u32,
}

impl Orderable for Item {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn display_order(&self) -> u32 {
        self.display_order
    }

    fn set_display_order(&mut self, order: u32) {
        self.display_order = order;
    }
}

impl Searchable for Item {
    fn search_name(&self) -> &str {
        &self.name
    }

    fn search_secondary(&self) -> &str {
        &self.tag
    }
}

#[derive(Default)]
struct MockStore {
    rows: Mutex<Vec<Item>>,
    fail_ids: Mutex<HashSet<String>>,
    fail_list: AtomicBool,
    writes: Mutex<Vec<(String, u32)>>,
    lists: AtomicUsize,
}

impl MockStore {
    fn with_rows(rows: Vec<Item>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    fn stored_ids(&self) -> Vec<String> {
        let mut rows = self.rows.lock().clone();
        rows.sort_by_key(|r| r.display_order);
        rows.into_iter().map(|r| r.id).collect()
    }
}

#[async_trait]
impl EntityStore<Item> for MockStore {
    async fn list(&self, _order: &ListOrder) -> StoreResult<Vec<Item>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("connection refused".into()));
        }
        let mut rows = self.rows.lock().clone();
        rows.sort_by_key(|r| r.display_order);
        Ok(rows)
    }

    async fn update_display_order(&self, id: &String, patch: DisplayOrderPatch) -> StoreResult<()> {
        self.writes.lock().push((id.clone(), patch.display_order));
        if self.fail_ids.lock().contains(id) {
            return Err(StoreError::Rejected {
                status: 500,
                message: "write rejected".into(),
            });
        }
        let mut rows = self.rows.lock();
        let row = rows
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        row.display_order = patch.display_order;
        Ok(())
    }
}

/// Holds the first write until released
struct GatedStore {
    inner: Arc<MockStore>,
    started: tokio::sync::Notify,
    release: tokio::sync::Notify,
    gate_open: AtomicBool,
}

impl GatedStore {
    fn new(inner: Arc<MockStore>) -> Self {
        Self {
            inner,
            started: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
            gate_open: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EntityStore<Item> for GatedStore {
    async fn list(&self, order: &ListOrder) -> StoreResult<Vec<Item>> {
        self.inner.list(order).await
    }

    async fn update_display_order(&self, id: &String, patch: DisplayOrderPatch) -> StoreResult<()> {
        if !self.gate_open.swap(true, Ordering::SeqCst) {
            self.started.notify_one();
            self.release.notified().await;
        }
        self.inner.update_display_order(id, patch).await
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

fn item(id: &str, name: &str, tag: &str, order: u32) -> Item {
    Item {
        id: id.into(),
        name: name.into(),
        tag: tag.into(),
        display_order: order,
    }
}

fn sample_rows() -> Vec<Item> {
    vec![
        item("p1", "Taza de cerámica", "ceramica", 0),
        item("p2", "Collar de plata", "joyeria", 1),
        item("p3", "Plato de cerámica", "ceramica", 2),
        item("p4", "Manta tejida", "textil", 3),
    ]
}

async fn setup(
    rows: Vec<Item>,
) -> (Arc<MockStore>, Arc<RecordingNotifier>, OrderManager<Item>) {
    let store = Arc::new(MockStore::with_rows(rows));
    let notifier = Arc::new(RecordingNotifier::default());
    let mut manager = OrderManager::new("products", store.clone(), notifier.clone());
    manager.reload().await.unwrap();
    (store, notifier, manager)
}

fn ids(manager: &OrderManager<Item>) -> Vec<&str> {
    manager.items().iter().map(|i| i.id.as_str()).collect()
}

fn ranks(manager: &OrderManager<Item>) -> Vec<u32> {
    manager.items().iter().map(|i| i.display_order).collect()
}

fn id(s: &str) -> String {
    s.to_string()
}

// ========== reorder ==========

#[tokio::test]
async fn test_reorder_backward_inserts_before_target() {
    let (_, _, mut manager) = setup(sample_rows()).await;

    assert!(manager.reorder(&id("p4"), &id("p2")));

    assert_eq!(ids(&manager), vec!["p1", "p4", "p2", "p3"]);
    assert_eq!(ranks(&manager), vec![0, 1, 2, 3]);
    assert!(manager.is_dirty());
}

#[tokio::test]
async fn test_reorder_forward_lands_on_target_index() {
    let (_, _, mut manager) = setup(sample_rows()).await;

    assert!(manager.reorder(&id("p1"), &id("p3")));

    assert_eq!(ids(&manager), vec!["p2", "p3", "p1", "p4"]);
    assert_eq!(ranks(&manager), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_reorder_onto_self_is_noop() {
    let (_, _, mut manager) = setup(sample_rows()).await;

    assert!(!manager.reorder(&id("p2"), &id("p2")));
    assert!(!manager.reorder(&id("p2"), &id("missing")));
    assert!(!manager.reorder(&id("missing"), &id("p2")));

    assert_eq!(ids(&manager), vec!["p1", "p2", "p3", "p4"]);
    assert!(!manager.is_dirty());
}

#[tokio::test]
async fn test_reorder_back_to_loaded_order_is_clean() {
    let (_, _, mut manager) = setup(sample_rows()).await;

    manager.reorder(&id("p4"), &id("p2"));
    assert!(manager.is_dirty());

    // [p1, p4, p2, p3] -> move p4 forward to p3's slot
    manager.reorder(&id("p4"), &id("p3"));
    assert_eq!(ids(&manager), vec!["p1", "p2", "p3", "p4"]);
    assert!(!manager.is_dirty());
}

#[tokio::test]
async fn test_reorder_densifies_sparse_ranks() {
    let rows = vec![
        item("a", "A", "", 0),
        item("b", "B", "", 0),
        item("c", "C", "", 7),
    ];
    let (_, _, mut manager) = setup(rows).await;

    manager.reorder(&id("c"), &id("a"));

    assert_eq!(ids(&manager), vec!["c", "a", "b"]);
    assert_eq!(ranks(&manager), vec![0, 1, 2]);
    assert!(manager.is_dirty());
}

#[tokio::test]
async fn test_random_reorders_keep_a_dense_permutation() {
    let (_, _, mut manager) = setup(sample_rows()).await;
    let original: HashSet<String> = manager.items().iter().map(|i| i.id.clone()).collect();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let n = manager.len();
        let from = manager.items()[rng.gen_range(0..n)].id.clone();
        let to = manager.items()[rng.gen_range(0..n)].id.clone();
        manager.reorder(&from, &to);

        let now: HashSet<String> = manager.items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(now, original);
        assert_eq!(manager.len(), original.len());
        if manager.is_dirty() {
            assert_eq!(ranks(&manager), (0..n as u32).collect::<Vec<_>>());
        }
    }
}

// ========== search projection ==========

#[tokio::test]
async fn test_search_filters_by_name_and_secondary() {
    let (_, _, mut manager) = setup(sample_rows()).await;

    manager.set_search("CERÁMICA");
    let visible: Vec<&str> = manager.visible().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(visible, vec!["p1", "p3"]);

    // surrounding whitespace is matched verbatim
    manager.set_search(" cerámica");
    let visible: Vec<&str> = manager.visible().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(visible, vec!["p1", "p3"]);
    manager.set_search("cerámica ");
    assert!(manager.visible().is_empty());

    manager.set_search("textil");
    let visible: Vec<&str> = manager.visible().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(visible, vec!["p4"]);

    manager.set_search("");
    assert_eq!(manager.visible().len(), 4);
}

#[tokio::test]
async fn test_filtered_reorder_moves_within_full_list() {
    let (_, _, mut manager) = setup(sample_rows()).await;
    manager.set_search("cerámica");

    // hidden item cannot be dragged or targeted
    assert!(!manager.reorder(&id("p2"), &id("p1")));
    assert!(!manager.reorder(&id("p3"), &id("p4")));
    assert!(!manager.is_dirty());

    assert!(manager.reorder(&id("p3"), &id("p1")));
    assert_eq!(ids(&manager), vec!["p3", "p1", "p2", "p4"]);
    assert_eq!(ranks(&manager), vec![0, 1, 2, 3]);

    let visible: Vec<&str> = manager.visible().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(visible, vec!["p3", "p1"]);
}

#[tokio::test]
async fn test_filtered_forward_reorder_passes_hidden_items() {
    let (_, _, mut manager) = setup(sample_rows()).await;
    manager.set_search("cerámica");

    // p2 is hidden but still sits between p1 and p3 in the full list
    assert!(manager.reorder(&id("p1"), &id("p3")));

    assert_eq!(ids(&manager), vec!["p2", "p3", "p1", "p4"]);
    assert_eq!(ranks(&manager), vec![0, 1, 2, 3]);
    assert!(manager.is_dirty());

    let visible: Vec<&str> = manager.visible().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(visible, vec!["p3", "p1"]);
}

#[tokio::test]
async fn test_search_never_touches_items() {
    let (_, _, mut manager) = setup(sample_rows()).await;
    manager.reorder(&id("p3"), &id("p1"));
    let before = manager.items().to_vec();

    manager.set_search("plata");
    assert_eq!(manager.visible().len(), 1);
    manager.set_search("zzz");
    assert!(manager.visible().is_empty());
    manager.set_search("");

    assert_eq!(manager.items(), before.as_slice());
    assert!(manager.is_dirty());
}

// ========== loading ==========

#[tokio::test]
async fn test_load_items_replaces_and_cleans() {
    let (_, _, mut manager) = setup(sample_rows()).await;
    manager.reorder(&id("p4"), &id("p1"));
    assert!(manager.is_dirty());

    manager.load_items(vec![item("x", "X", "", 0)]);

    assert_eq!(ids(&manager), vec!["x"]);
    assert!(!manager.is_dirty());
}

#[tokio::test]
async fn test_reload_failure_keeps_items() {
    let (store, _, mut manager) = setup(sample_rows()).await;
    manager.reorder(&id("p4"), &id("p1"));
    store.fail_list.store(true, Ordering::SeqCst);

    let err = manager.reload().await.unwrap_err();

    assert!(matches!(err, OrderingError::Load(StoreError::Transport(_))));
    assert_eq!(ids(&manager), vec!["p4", "p1", "p2", "p3"]);
    assert!(manager.is_dirty());
}

// ========== save ==========

#[tokio::test]
async fn test_save_writes_every_entity_and_reloads() {
    let (store, notifier, mut manager) = setup(sample_rows()).await;
    manager.reorder(&id("p4"), &id("p2"));

    let report = manager.save_order().await.unwrap();

    assert_eq!(
        report,
        SaveReport {
            written: 4,
            reloaded: true
        }
    );
    let mut written: Vec<(String, u32)> = store.writes.lock().clone();
    written.sort();
    assert_eq!(
        written,
        vec![
            (id("p1"), 0),
            (id("p2"), 2),
            (id("p3"), 3),
            (id("p4"), 1),
        ]
    );
    assert_eq!(store.lists.load(Ordering::SeqCst), 2);
    assert_eq!(store.stored_ids(), vec!["p1", "p4", "p2", "p3"]);
    assert_eq!(ids(&manager), vec!["p1", "p4", "p2", "p3"]);
    assert!(!manager.is_dirty());
    assert!(!manager.is_saving());

    let notices = notifier.notices.lock();
    assert_eq!(notices.len(), 1);
    assert!(!notices[0].is_error);
}

#[tokio::test]
async fn test_save_normalizes_default_ranks() {
    let rows = vec![item("a", "A", "", 0), item("b", "B", "", 0), item("c", "C", "", 0)];
    let (store, _, mut manager) = setup(rows).await;

    manager.reorder(&id("a"), &id("b"));
    manager.reorder(&id("b"), &id("a"));
    assert_eq!(ids(&manager), vec!["a", "b", "c"]);
    assert!(manager.is_dirty());

    manager.save_order().await.unwrap();

    let mut written = store.writes.lock().clone();
    written.sort();
    assert_eq!(written, vec![(id("a"), 0), (id("b"), 1), (id("c"), 2)]);
    assert_eq!(store.lists.load(Ordering::SeqCst), 2);
    assert!(!manager.is_dirty());
}

#[tokio::test]
async fn test_save_when_clean_writes_nothing() {
    let (store, notifier, mut manager) = setup(sample_rows()).await;

    let report = manager.save_order().await.unwrap();

    assert_eq!(report.written, 0);
    assert!(store.writes.lock().is_empty());
    assert!(notifier.notices.lock().is_empty());
}

#[tokio::test]
async fn test_partial_failure_keeps_dirty_without_rollback() {
    let (store, notifier, mut manager) = setup(sample_rows()).await;
    manager.reorder(&id("p4"), &id("p1"));
    store.fail_ids.lock().insert(id("p2"));

    let err = manager.save_order().await.unwrap_err();

    assert!(matches!(
        err,
        OrderingError::PartialSave {
            failed: 1,
            total: 4
        }
    ));
    assert!(manager.is_dirty());
    assert!(!manager.is_saving());
    assert_eq!(store.writes.lock().len(), 4);
    assert_eq!(store.lists.load(Ordering::SeqCst), 1);

    // accepted writes stay applied
    let p4 = store.rows.lock().iter().find(|r| r.id == "p4").cloned().unwrap();
    assert_eq!(p4.display_order, 0);

    let notices = notifier.notices.lock();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].is_error);
}

#[tokio::test]
async fn test_partial_failure_then_drag_back_stays_dirty() {
    let (store, _, mut manager) = setup(sample_rows()).await;
    manager.reorder(&id("p4"), &id("p1"));
    store.fail_ids.lock().insert(id("p2"));
    assert!(manager.save_order().await.is_err());
    store.fail_ids.lock().clear();

    // back to the loaded order, but the store now holds p4=0 p1=1 p2=1 p3=3
    manager.reorder(&id("p4"), &id("p3"));
    assert_eq!(ids(&manager), vec!["p1", "p2", "p3", "p4"]);
    assert!(manager.is_dirty());

    let report = manager.save_order().await.unwrap();

    assert_eq!(report.written, 4);
    assert!(!manager.is_dirty());
    assert_eq!(store.stored_ids(), vec!["p1", "p2", "p3", "p4"]);
    let ranks: Vec<u32> = {
        let mut rows = store.rows.lock().clone();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        rows.iter().map(|r| r.display_order).collect()
    };
    assert_eq!(ranks, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_retry_after_failure_succeeds() {
    let (store, _, mut manager) = setup(sample_rows()).await;
    manager.reorder(&id("p3"), &id("p1"));
    store.fail_ids.lock().insert(id("p1"));
    assert!(manager.save_order().await.is_err());

    store.fail_ids.lock().clear();
    let report = manager.save_order().await.unwrap();

    assert_eq!(report.written, 4);
    assert!(!manager.is_dirty());
    assert_eq!(store.stored_ids(), vec!["p3", "p1", "p2", "p4"]);
}

#[tokio::test]
async fn test_save_refused_while_saving() {
    let (store, _, mut manager) = setup(sample_rows()).await;
    manager.reorder(&id("p2"), &id("p1"));

    let flag = manager.saving_flag();
    let guard = flag.try_engage().unwrap();
    assert!(manager.is_saving());

    let err = manager.save_order().await.unwrap_err();
    assert!(matches!(err, OrderingError::SaveInProgress));
    assert!(store.writes.lock().is_empty());
    assert!(manager.is_dirty());

    drop(guard);
    assert!(!manager.is_saving());
    assert!(manager.save_order().await.is_ok());
}

#[tokio::test]
async fn test_saving_flag_set_while_writes_in_flight() {
    let store = Arc::new(MockStore::with_rows(sample_rows()));
    let gated = Arc::new(GatedStore::new(store.clone()));
    let mut manager =
        OrderManager::new("products", gated.clone(), Arc::new(RecordingNotifier::default()));
    manager.reload().await.unwrap();
    manager.reorder(&id("p2"), &id("p1"));

    let flag = manager.saving_flag();
    assert!(!flag.is_set());

    let (report, ()) = tokio::join!(manager.save_order(), async {
        gated.started.notified().await;
        assert!(flag.is_set());
        gated.release.notify_one();
    });

    assert_eq!(report.unwrap().written, 4);
    assert!(!flag.is_set());
    assert!(!manager.is_saving());
    assert_eq!(store.stored_ids(), vec!["p2", "p1", "p3", "p4"]);
}

#[tokio::test]
async fn test_reload_failure_after_save_still_cleans() {
    let (store, notifier, mut manager) = setup(sample_rows()).await;
    manager.reorder(&id("p4"), &id("p1"));
    store.fail_list.store(true, Ordering::SeqCst);

    let report = manager.save_order().await.unwrap();

    assert_eq!(
        report,
        SaveReport {
            written: 4,
            reloaded: false
        }
    );
    assert!(!manager.is_dirty());
    assert_eq!(ids(&manager), vec!["p4", "p1", "p2", "p3"]);
    assert!(!notifier.notices.lock()[0].is_error);
}

#[test]
fn test_ordering_error_maps_to_app_error() {
    use shared::{AppError, ErrorCode};

    let err: AppError = OrderingError::PartialSave {
        failed: 2,
        total: 5,
    }
    .into();
    assert_eq!(err.code, ErrorCode::ReorderSaveFailed);
    assert_eq!(err.details.unwrap()["failed"], 2);

    let err: AppError = OrderingError::SaveInProgress.into();
    assert_eq!(err.code, ErrorCode::ReorderInProgress);
}
