#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

mod cache;
mod engine;

pub use cache::BackendCache;
pub use engine::HybridSearchEngine;
