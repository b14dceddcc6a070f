//! Glance core: cache-first post summaries and follow-up answers.
//!
//! [`SummaryService`] serves a stored summary while it is fresh and otherwise
//! fetches recent posts, summarizes them and stores the result.
//! [`FollowUpAnswerer`] answers questions from the posts stored with a summary.

pub mod answerer;
pub mod clock;
pub mod error;
pub mod handle;
pub mod orchestrator;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use answerer::FollowUpAnswerer;
pub use clock::{Clock, SystemClock};
pub use error::{GlanceError, Result};
pub use handle::{normalize_handle, validate_handle, MAX_HANDLE_LEN};
pub use orchestrator::{
    Integrations, SummaryMode, SummaryService, SummaryServiceBuilder, QUIET_SUMMARY, QUIET_TAG,
    SUMMARY_POST_LIMIT,
};
