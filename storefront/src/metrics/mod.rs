//! 统计 - daily counters and dashboard aggregation

mod service;

pub use service::{DEFAULT_TOP_LIMIT, MetricsService, rank};
