pub mod models;
pub mod store;
pub mod memory;
pub mod error;
pub mod dbs;

pub use models::{normalize_key, SourcePost, SummaryDetail, SummaryFields, SummaryRecord};
pub use store::CacheStore;
pub use memory::InMemoryCacheStore;
pub use error::{PersistError, Result};

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoCacheStore;
