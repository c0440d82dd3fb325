#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod loader;
pub mod manifest;
pub mod part;
pub mod store;

pub use loader::load_parts;
pub use manifest::{Manifest, PartEntry};
pub use part::PartFormat;
pub use store::EmbeddingStore;
