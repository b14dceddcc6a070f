pub mod post;
pub mod summary;

pub use post::MongoPostRepository;
pub use summary::MongoSummaryRepository;
