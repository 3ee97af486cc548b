//! Catalog Adapters - 音色目录来源实现
//!
//! 六边形架构的适配器实现

mod http;
mod json_file;
mod static_source;

pub use http::{HttpCatalogSource, HttpCatalogSourceConfig};
pub use json_file::JsonFileCatalogSource;
pub use static_source::StaticCatalogSource;
