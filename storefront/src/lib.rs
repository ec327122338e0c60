//! Storefront - 手工艺品店铺后台核心
//!
//! # 架构概述
//!
//! - **排序** (`ordering`): drag-and-drop ordering of products and collections
//! - **后台** (`admin`): validated create/edit/delete, site config, images
//! - **目录** (`catalog`): public listings, search, price formatting
//! - **购物车** (`cart`): cart state and WhatsApp checkout message
//! - **统计** (`metrics`): daily counters and dashboard summary
//! - **存储** (`db`): in-memory backend for tests and demo runs
//!
//! The hosted backend is reached through `storefront-client`, which
//! implements the same store contracts as [`db::MemoryBackend`].
//!
//! # 模块结构
//!
//! ```text
//! storefront/src/
//! ├── core/          # 配置
//! ├── admin/         # 后台编辑
//! ├── ordering/      # 排序管理器
//! ├── catalog/       # 目录视图
//! ├── cart/          # 购物车, 结账
//! ├── metrics/       # 统计
//! ├── db/            # 内存后端
//! └── utils/         # 日志, 校验
//! ```

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod core;
pub mod db;
pub mod metrics;
pub mod ordering;
pub mod utils;

// Re-export 公共类型
pub use admin::AdminService;
pub use cart::{Cart, CartItem, CheckoutMessage, checkout};
pub use crate::core::Config;
pub use db::MemoryBackend;
pub use metrics::MetricsService;
pub use ordering::{
    Notice, Notifier, OrderManager, OrderingError, SaveReport, SavingFlag, TracingNotifier,
};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, read [`Config`] and start logging
pub fn setup_environment() -> Result<Config, AppError> {
    // .env is optional
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.is_production()),
        config.log_dir.as_deref(),
    )?;
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
  _   _ _
 | | | | |__   __ _ _ __ __ _
 | | | | '_ \ / _` | '__/ _` |
 | |_| | |_) | (_| | | | (_| |
  \___/|_.__/ \__,_|_|  \__,_|
    "#
    );
}
