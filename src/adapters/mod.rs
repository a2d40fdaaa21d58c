// Adapters layer: concrete implementations for external systems.

pub mod http_catalog;

pub use http_catalog::HttpCatalog;
