use serde::Serialize;

/// A fully rendered post, as handed to the `post` template.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub title: String,
    pub date: String,
    pub content: String,
}

impl Post {
    /// Placeholder rendered when a slug does not resolve to a post.
    pub fn not_found() -> Self {
        Self {
            title: "Page not found".to_string(),
            date: String::new(),
            content: String::new(),
        }
    }
}

/// Summary representation of a post used on the index page.
#[derive(Debug, Clone, Serialize)]
pub struct PostListing {
    pub title: String,
    pub url: String,
    pub date: String,
    pub blurb: String,
}
