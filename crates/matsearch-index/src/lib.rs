#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod backend;
pub mod flat;
pub mod persist;

pub use backend::SearchBackend;
pub use flat::{FlatIndex, NO_MATCH};
pub use persist::{build_from_store, load_index, save_index};
