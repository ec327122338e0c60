//! Orderable collection manager

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use shared::{DisplayOrderPatch, EntityStore, ListOrder, Orderable, Searchable};

use super::OrderingError;
use super::filter::{normalize_search, visible};
use super::notify::{Notice, Notifier};

/// Outcome of a successful `save_order`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    /// Number of `display_order` writes sent
    pub written: usize,
    /// Whether the post-save reload succeeded
    pub reloaded: bool,
}

/// Shared "save in flight" flag
///
/// Clones observe the same flag, so a UI can disable its save button while
/// the manager owns the writer side.
#[derive(Debug, Clone, Default)]
pub struct SavingFlag(Arc<AtomicBool>);

impl SavingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag unless already set. The guard clears it on drop.
    pub(crate) fn try_engage(&self) -> Option<SavingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SavingGuard(self.clone()))
    }
}

pub(crate) struct SavingGuard(SavingFlag);

impl Drop for SavingGuard {
    fn drop(&mut self) {
        (self.0).0.store(false, Ordering::Release);
    }
}

/// Ordered, filterable, persistable list of one entity kind
///
/// Invariants after every public call:
/// - `display_order` equals list position once any reorder has happened
/// - `is_dirty()` is true when the list differs from what the store holds,
///   including after a save that was only partly applied
pub struct OrderManager<T>
where
    T: Orderable + Searchable + 'static,
{
    label: &'static str,
    store: Arc<dyn EntityStore<T>>,
    notifier: Arc<dyn Notifier>,
    order: ListOrder,
    items: Vec<T>,
    /// Rank the store holds for each id, as far as this manager knows
    persisted: HashMap<T::Id, u32>,
    dirty: bool,
    saving: SavingFlag,
    search: String,
    needle: String,
}

impl<T> OrderManager<T>
where
    T: Orderable + Searchable + 'static,
{
    /// Empty manager; call [`reload`](Self::reload) to populate
    pub fn new(
        label: &'static str,
        store: Arc<dyn EntityStore<T>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            label,
            store,
            notifier,
            order: ListOrder::by_display_order(),
            items: Vec::new(),
            persisted: HashMap::new(),
            dirty: false,
            saving: SavingFlag::default(),
            search: String::new(),
            needle: String::new(),
        }
    }

    /// Override the listing order used by `reload`
    pub fn with_list_order(mut self, order: ListOrder) -> Self {
        self.order = order;
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_set()
    }

    pub fn saving_flag(&self) -> SavingFlag {
        self.saving.clone()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    // ========== Loading ==========

    /// Replace the list with freshly loaded items and mark it clean
    pub fn load_items(&mut self, items: Vec<T>) {
        if self.dirty {
            tracing::warn!(
                label = self.label,
                "Discarding unsaved order changes on load"
            );
        }
        self.items = items;
        self.mark_persisted();
    }

    /// Fetch the full list from the store
    ///
    /// On failure the current items are left as they were.
    pub async fn reload(&mut self) -> Result<(), OrderingError> {
        match self.store.list(&self.order).await {
            Ok(items) => {
                tracing::debug!(label = self.label, count = items.len(), "Loaded items");
                self.load_items(items);
                Ok(())
            }
            Err(e) => {
                tracing::error!(label = self.label, error = %e, "Failed to load items");
                Err(e.into())
            }
        }
    }

    // ========== Search ==========

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.needle = normalize_search(&self.search);
    }

    /// Items matching the current search, in list order
    pub fn visible(&self) -> Vec<&T> {
        visible(&self.items, &self.needle)
    }

    // ========== Reordering ==========

    /// Move `dragged` to the position held by `target`
    ///
    /// Array-move semantics over the full list: dragging forward places the
    /// item after the items it passed, dragging backward places it before
    /// `target`. Every item is then renumbered `0..n-1`.
    ///
    /// Both ids must be in the current search projection. Returns `false`
    /// and leaves state untouched otherwise, or when `dragged == target`.
    pub fn reorder(&mut self, dragged: &T::Id, target: &T::Id) -> bool {
        if dragged == target {
            return false;
        }

        let (Some(from), Some(to)) = (self.visible_index(dragged), self.visible_index(target))
        else {
            tracing::debug!(
                label = self.label,
                dragged = %dragged,
                target = %target,
                "Reorder ignored: id not visible"
            );
            return false;
        };

        let moved = self.items.remove(from);
        self.items.insert(to, moved);
        self.renumber();
        self.dirty = self.diverges();

        tracing::debug!(
            label = self.label,
            dragged = %dragged,
            from,
            to,
            dirty = self.dirty,
            "Reordered"
        );
        true
    }

    fn visible_index(&self, id: &T::Id) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .filter(|&idx| self.items[idx].matches_search(&self.needle))
    }

    fn renumber(&mut self) {
        for (idx, item) in self.items.iter_mut().enumerate() {
            item.set_display_order(idx as u32);
        }
    }

    /// Ranks are dense after any reorder, so matching every rank also means
    /// matching the stored order.
    fn diverges(&self) -> bool {
        self.items.len() != self.persisted.len()
            || self
                .items
                .iter()
                .any(|item| self.persisted.get(item.id()) != Some(&item.display_order()))
    }

    fn mark_persisted(&mut self) {
        self.persisted = self
            .items
            .iter()
            .map(|item| (item.id().clone(), item.display_order()))
            .collect();
        self.dirty = false;
    }

    // ========== Persistence ==========

    /// Write every item's `display_order` to the store
    ///
    /// Writes are issued concurrently, one per entity. All must succeed for
    /// the list to become clean; otherwise the list stays dirty and no
    /// accepted write is rolled back. A clean list saves nothing.
    pub async fn save_order(&mut self) -> Result<SaveReport, OrderingError> {
        let Some(_guard) = self.saving.try_engage() else {
            tracing::warn!(label = self.label, "Save requested while another is running");
            return Err(OrderingError::SaveInProgress);
        };

        if !self.dirty {
            return Ok(SaveReport {
                written: 0,
                reloaded: false,
            });
        }

        let writes: Vec<(T::Id, DisplayOrderPatch)> = self
            .items
            .iter()
            .map(|item| {
                (
                    item.id().clone(),
                    DisplayOrderPatch {
                        display_order: item.display_order(),
                    },
                )
            })
            .collect();
        let total = writes.len();

        tracing::info!(label = self.label, count = total, "Saving display order");

        let store = Arc::clone(&self.store);
        let results = join_all(
            writes
                .iter()
                .map(|(id, patch)| store.update_display_order(id, *patch)),
        )
        .await;

        let mut failed = 0usize;
        for ((id, patch), result) in writes.iter().zip(results) {
            match result {
                Ok(()) => {
                    tracing::debug!(
                        id = %id,
                        display_order = patch.display_order,
                        "Display order updated"
                    );
                    // Accepted writes stay applied, the snapshot follows the store
                    self.persisted.insert(id.clone(), patch.display_order);
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(id = %id, error = %e, "Failed to update display order");
                }
            }
        }

        if failed > 0 {
            tracing::error!(
                label = self.label,
                failed,
                total,
                "Display order save incomplete"
            );
            self.notifier.notify(Notice::error(
                "Error",
                format!("Could not save the {} order. Please try again.", self.label),
            ));
            self.dirty = true;
            return Err(OrderingError::PartialSave { failed, total });
        }

        self.mark_persisted();
        let reloaded = match self.reload().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(label = self.label, error = %e, "Order saved but reload failed");
                false
            }
        };

        tracing::info!(label = self.label, count = total, reloaded, "Display order saved");
        self.notifier.notify(Notice::success(
            "Order saved",
            format!("The {} order has been updated.", self.label),
        ));

        Ok(SaveReport {
            written: total,
            reloaded,
        })
    }
}
