use std::sync::LazyLock;

use regex::Regex;

use crate::models::{CleanPost, RawPost};

/// Posts shorter than this (in characters, after cleaning) are dropped
pub const MIN_POST_LENGTH: usize = 10;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid URL regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip links and collapse whitespace. Returns `None` when too little text
/// is left to be worth summarizing.
pub fn clean_text(text: &str) -> Option<String> {
    let without_links = URL_RE.replace_all(text, "");
    let collapsed = WHITESPACE_RE.replace_all(&without_links, " ");
    let cleaned = collapsed.trim();

    if cleaned.chars().count() < MIN_POST_LENGTH {
        return None;
    }
    Some(cleaned.to_string())
}

/// Keep original posts with enough text, in upstream order.
pub fn clean_posts(posts: &[RawPost]) -> Vec<CleanPost> {
    posts
        .iter()
        .filter(|post| !post.is_repost_or_reply())
        .filter_map(|post| {
            let text = clean_text(&post.text)?;
            Some(CleanPost {
                post_id: post.id.clone(),
                text,
                posted_at: post.created_at,
                like_count: post.public_metrics.like_count,
                repost_count: post.public_metrics.retweet_count,
            })
        })
        .collect()
}
