//! Prompt templates for post summarization.

/// Posts included in a summarization prompt
pub const MAX_PROMPT_POSTS: usize = 5;

/// Number the posts `1. ...`, `2. ...`, keeping at most [`MAX_PROMPT_POSTS`].
pub fn numbered_posts(posts: &[String]) -> String {
    posts
        .iter()
        .take(MAX_PROMPT_POSTS)
        .enumerate()
        .map(|(index, post)| format!("{}. {}", index + 1, post))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn brief_prompt(posts: &[String], author: &str) -> String {
    format!(
        r#"Analyze the following recent posts and provide a JSON response with 3 topic tags and summary focused on what they've been up to.

Recent posts from {author}:
{posts}

Focus on their recent activities like:
- What they're building or working on
- Places they're traveling to
- Life updates or personal news
- Projects they're excited about
- Current interests or hobbies

Please provide a JSON response with this exact structure (no markdown formatting):
{{
  "tags": ["tag1", "tag2", "tag3"],
  "summary": "2-3 sentences about what they've been up to recently - their activities, projects, or life updates"
}}

The tags should be 3 topic-related words that describe their interests, work, or focus areas (e.g., "AI", "Design", "UX", "Travel", "Startups", "Tech", "Photography", "Fitness", etc.).

Return only the JSON object, no additional text or markdown formatting:"#,
        author = author,
        posts = numbered_posts(posts),
    )
}

pub fn detailed_prompt(posts: &[String], author: &str) -> String {
    format!(
        r#"Analyze the following recent posts and provide a detailed analysis with JSON structure:

Recent posts from {author}:
{posts}

Please provide a JSON response with this exact structure (no markdown formatting):
{{
  "summary": "2-3 sentences about their recent activity and interests",
  "topics": ["topic1", "topic2", "topic3"],
  "sentiment": "positive/negative/neutral",
  "engagement": "high/medium/low"
}}

Return only the JSON object, no additional text or markdown formatting:"#,
        author = author,
        posts = numbered_posts(posts),
    )
}
