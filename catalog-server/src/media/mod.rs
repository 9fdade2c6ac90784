//! Media Storage
//!
//! Stores uploaded product/variant files on the local filesystem and maps
//! them to public URLs. Writes are fatal; deletes are best-effort.

mod store;

pub use store::{MediaStore, UploadedFile};
