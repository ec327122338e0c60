//! 后台管理 - product, collection, site config and image editing

mod service;


pub use service::AdminService;
