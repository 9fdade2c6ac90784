//! Catalog domain: pricing resolution, variant matching, multipart form
//! decoding, and the product/variant write/read service.

pub mod form;
pub mod matcher;
pub mod pricing;
pub mod service;

pub use form::{ProductForm, UploadSet};
pub use service::{CatalogService, ProductWithVariants};
