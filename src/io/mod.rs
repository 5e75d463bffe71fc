//! Input helpers.
//!
//! - CSV ingest + salary cleaning (`ingest`)
//! - content-keyed load memoization (`cache`)

pub mod cache;
pub mod ingest;

pub use cache::*;
pub use ingest::*;
