//! End-to-end admin flows against the in-memory backend

use std::sync::Arc;

use parking_lot::Mutex;
use shared::models::{Collection, CollectionCreate, Product};
use storefront::catalog;
use storefront::utils::validation::ProductForm;
use storefront::{AdminService, MemoryBackend, Notice, Notifier, OrderManager, OrderingError};

#[derive(Default)]
struct Inbox(Mutex<Vec<Notice>>);

impl Notifier for Inbox {
    fn notify(&self, notice: Notice) {
        self.0.lock().push(notice);
    }
}

fn form(name: &str, category: &str, price: &str) -> ProductForm {
    ProductForm {
        name: name.to_string(),
        description: format!("{name} hecho a mano"),
        price: price.to_string(),
        category: category.to_string(),
        stock: "4".to_string(),
        images: vec![],
        featured: false,
    }
}

fn seeded() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    for (name, category, price) in [
        ("Taza Alba", "tazas", "12.50"),
        ("Plato Tierra", "platos", "24"),
        ("Taza Luna", "tazas", "13.00"),
        ("Cuenco Mar", "cuencos", "18.90"),
    ] {
        let create = form(name, category, price).validate().unwrap();
        backend.insert_product(create);
    }
    backend
}

fn names(items: &[Product]) -> Vec<&str> {
    items.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn reorder_save_and_storefront_agree() {
    let backend = seeded();
    let inbox = Arc::new(Inbox::default());
    let mut manager: OrderManager<Product> =
        OrderManager::new("products", backend.clone(), inbox.clone());
    manager.reload().await.unwrap();

    let cuenco = manager.items()[3].id.clone();
    let alba = manager.items()[0].id.clone();
    assert!(manager.reorder(&cuenco, &alba));
    manager.save_order().await.unwrap();

    assert!(!manager.is_dirty());
    assert_eq!(
        names(manager.items()),
        vec!["Cuenco Mar", "Taza Alba", "Plato Tierra", "Taza Luna"]
    );

    // Public listing reads the same ranks
    let tazas = catalog::by_category(&backend.products(), "tazas", 10);
    assert_eq!(names(&tazas), vec!["Taza Alba", "Taza Luna"]);
    assert_eq!(inbox.0.lock().len(), 1);
}

#[tokio::test]
async fn filtered_reorder_then_partial_failure_keeps_local_order() {
    let backend = seeded();
    let inbox = Arc::new(Inbox::default());
    let mut manager: OrderManager<Product> =
        OrderManager::new("products", backend.clone(), inbox.clone());
    manager.reload().await.unwrap();

    manager.set_search("taza");
    let visible: Vec<String> = manager.visible().iter().map(|p| p.id.clone()).collect();
    assert_eq!(visible.len(), 2);
    assert!(manager.reorder(&visible[1], &visible[0]));
    manager.set_search("");

    let local = names(manager.items())
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    assert_eq!(local, vec!["Taza Luna", "Taza Alba", "Plato Tierra", "Cuenco Mar"]);

    backend.fail_updates_for(manager.items()[2].id.clone());
    let err = manager.save_order().await.unwrap_err();
    assert!(matches!(err, OrderingError::PartialSave { failed: 1, total: 4 }));
    assert!(manager.is_dirty());
    assert_eq!(names(manager.items()), local.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(inbox.0.lock()[0].is_error);

    backend.clear_failures();
    let report = manager.save_order().await.unwrap();
    assert_eq!(report.written, 4);
    assert!(report.reloaded);
    assert!(!manager.is_dirty());
}

#[tokio::test]
async fn collections_share_the_same_manager() {
    let backend = Arc::new(MemoryBackend::new());
    for name in ["Verano", "Invierno", "Regalos"] {
        backend.insert_collection(CollectionCreate {
            name: name.to_string(),
            description: String::new(),
            image: String::new(),
            product_ids: vec![],
            display_order: None,
        });
    }
    let mut manager: OrderManager<Collection> =
        OrderManager::new("collections", backend.clone(), Arc::new(Inbox::default()));
    manager.reload().await.unwrap();

    let regalos = manager.items()[2].id.clone();
    let verano = manager.items()[0].id.clone();
    manager.reorder(&regalos, &verano);
    manager.save_order().await.unwrap();

    let mut stored = backend.collections();
    stored.sort_by_key(|c| c.display_order);
    let order: Vec<&str> = stored.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(order, vec!["Regalos", "Verano", "Invierno"]);
}

#[tokio::test]
async fn admin_edits_and_forward_filtered_drag() {
    let backend = seeded();
    let admin = AdminService::new(
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
    );
    let jarron = admin
        .create_product(&form("Jarrón Niebla", "jarrones", "48"))
        .await
        .unwrap();

    let mut manager: OrderManager<Product> =
        OrderManager::new("products", backend.clone(), Arc::new(Inbox::default()));
    manager.reload().await.unwrap();
    assert_eq!(manager.len(), 5);

    // Taza Alba passes the hidden Plato Tierra on its way to Taza Luna
    manager.set_search("taza");
    let visible: Vec<String> = manager.visible().iter().map(|p| p.id.clone()).collect();
    assert!(manager.reorder(&visible[0], &visible[1]));
    assert_eq!(
        names(manager.items()),
        vec!["Plato Tierra", "Taza Luna", "Taza Alba", "Cuenco Mar", "Jarrón Niebla"]
    );
    let visible: Vec<&str> = manager.visible().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(visible, vec!["Taza Luna", "Taza Alba"]);
    manager.save_order().await.unwrap();

    admin.delete_product(&jarron.id).await.unwrap();
    manager.reload().await.unwrap();
    assert_eq!(
        names(manager.items()),
        vec!["Plato Tierra", "Taza Luna", "Taza Alba", "Cuenco Mar"]
    );
}
