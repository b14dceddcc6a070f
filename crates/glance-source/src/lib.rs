//! Post source for Glance.
//!
//! [`PostSource`] resolves a handle to an author and fetches their most recent
//! original posts; [`XClient`] implements it against the X API v2. Text
//! cleaning lives in [`clean`] so every source applies the same rules.

pub mod clean;
pub mod error;
pub mod models;
pub mod traits;
pub mod x;

pub use clean::{clean_posts, clean_text, MIN_POST_LENGTH};
pub use error::{Result, SourceError};
pub use models::{Author, CleanPost, FetchedPosts, PostMetrics, RawPost, ReferencedPost};
pub use traits::PostSource;
pub use x::{XClient, XConfig};
