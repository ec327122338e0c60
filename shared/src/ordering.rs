//! Ordering capabilities
//!
//! Anything that participates in manual drag ordering implements
//! [`Orderable`]: a stable id plus a mutable rank. The reorder logic touches
//! nothing else on the entity.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Entity with a stable identity and a mutable display rank
pub trait Orderable: Clone + Send + Sync {
    /// Opaque identifier, never reused and unchanged by reordering
    type Id: Clone + Eq + Hash + Display + Debug + Serialize + Send + Sync;

    fn id(&self) -> &Self::Id;

    /// Rank in default listings, lower sorts first
    fn display_order(&self) -> u32;

    fn set_display_order(&mut self, order: u32);
}

/// Text fields matched by the admin list search box
pub trait Searchable {
    fn search_name(&self) -> &str;

    /// Secondary text (product category, collection description)
    fn search_secondary(&self) -> &str;

    /// Case-insensitive substring match over both fields.
    ///
    /// `needle` must already be lowercased.
    fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.search_name().to_lowercase().contains(needle)
            || self.search_secondary().to_lowercase().contains(needle)
    }
}

/// Single sort key for a store listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

/// Ordered sequence of sort keys passed to `EntityStore::list`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOrder(pub Vec<SortKey>);

impl ListOrder {
    /// `display_order` ascending, newest first among equal ranks
    pub fn by_display_order() -> Self {
        Self(vec![SortKey::asc("display_order"), SortKey::desc("created_at")])
    }

    pub fn then(mut self, key: SortKey) -> Self {
        self.0.push(key);
        self
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    /// PostgREST `order` parameter, e.g. `display_order.asc,created_at.desc`
    pub fn to_query_param(&self) -> String {
        self.0
            .iter()
            .map(|k| format!("{}.{}", k.field, if k.ascending { "asc" } else { "desc" }))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Payload of a single reorder write: the new rank and nothing else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOrderPatch {
    pub display_order: u32,
}
