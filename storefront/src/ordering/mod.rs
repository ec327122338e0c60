//! 手动排序 - drag-and-drop ordering of products and collections
//!
//! # 流程
//!
//! ```text
//! store.list() ──▶ load_items() ──▶ items (clean)
//!                                     │  reorder(dragged, target)   (in memory, sync)
//!                                     ▼
//!                                   items (dirty)
//!                                     │  save_order()
//!                                     ▼
//!                  join_all(update_display_order × N)
//!                     │ all ok                     │ any failed
//!                     ▼                            ▼
//!               reload + clean              dirty kept, error notice
//! ```
//!
//! The in-memory list is the source of truth while edits are in flight:
//! `display_order` is always derived from list position, never the reverse.

mod filter;
mod manager;
mod notify;

#[cfg(test)]
mod tests;

pub use filter::{normalize_search, visible};
pub use manager::{OrderManager, SaveReport, SavingFlag};
pub use notify::{Notice, Notifier, TracingNotifier};

use shared::StoreError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Ordering errors
#[derive(Debug, Clone, Error)]
pub enum OrderingError {
    /// Listing from the store failed, local items untouched
    #[error("Failed to load items: {0}")]
    Load(#[from] StoreError),

    /// Another save is still in flight
    #[error("Display order save already in progress")]
    SaveInProgress,

    /// Some writes were rejected; accepted writes are not rolled back
    #[error("{failed} of {total} display order writes failed")]
    PartialSave { failed: usize, total: usize },
}

impl From<OrderingError> for AppError {
    fn from(err: OrderingError) -> Self {
        match err {
            OrderingError::Load(e) => e.into(),
            OrderingError::SaveInProgress => AppError::new(ErrorCode::ReorderInProgress),
            OrderingError::PartialSave { failed, total } => AppError::with_message(
                ErrorCode::ReorderSaveFailed,
                format!("{failed} of {total} display order writes failed"),
            )
            .with_detail("failed", failed)
            .with_detail("total", total),
        }
    }
}
