//! Post enumeration and parsing from the content root.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::frontmatter::{parse_front_matter, split_post};
use crate::markdown::MarkdownRenderer;
use crate::models::{Post, PostListing};

#[derive(Debug, Error)]
pub enum PostError {
    #[error("malformed post `{slug}`: expected front-matter delimited by `---`")]
    MalformedPost { slug: String },
    #[error("invalid date `{value}` in post `{slug}`")]
    InvalidDate { slug: String, value: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Accepted `date:` formats. Anything else is an `InvalidDate` hard failure.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%d %B %Y"];

pub struct PostService {
    content_root: PathBuf,
    markdown: Box<dyn MarkdownRenderer>,
}

impl PostService {
    pub fn new(content_root: impl Into<PathBuf>, markdown: Box<dyn MarkdownRenderer>) -> Self {
        Self {
            content_root: content_root.into(),
            markdown,
        }
    }

    /// Look up a single post by slug. `Ok(None)` when no `index.md` exists
    /// for it; parse failures propagate so callers can tell them apart.
    pub fn find_post_by_path(&self, slug: &str) -> Result<Option<Post>, PostError> {
        let path = self.content_root.join(slug).join("index.md");
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        let (meta, body) = split_post(&raw).ok_or_else(|| malformed(slug))?;
        let meta = parse_front_matter(meta);

        let title = required(&meta, "title", slug)?;
        let date = parse_date(required(&meta, "date", slug)?, slug)?;

        Ok(Some(Post {
            title: title.to_string(),
            date: format_date(date),
            content: self.markdown.render(body),
        }))
    }

    /// All post listings, newest first. Unparseable posts are logged and
    /// skipped; only a failure to read the content root itself aborts.
    pub fn all_listings(&self) -> Result<Vec<PostListing>, PostError> {
        let mut dated: Vec<(NaiveDate, PostListing)> = Vec::new();

        for entry in fs::read_dir(&self.content_root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let slug = entry.file_name().to_string_lossy().into_owned();
            if !entry.path().join("index.md").exists() {
                debug!(%slug, "no index.md, not a post directory");
                continue;
            }
            match self.listing_for(&slug) {
                Ok(pair) => dated.push(pair),
                Err(err) => warn!(%slug, error = %err, "skipping unparseable post"),
            }
        }

        // Stable sort: posts sharing a date keep directory enumeration order.
        dated.sort_by(|(a, _), (b, _)| b.cmp(a));
        Ok(dated.into_iter().map(|(_, listing)| listing).collect())
    }

    fn listing_for(&self, slug: &str) -> Result<(NaiveDate, PostListing), PostError> {
        let path = self.content_root.join(slug).join("index.md");
        let raw = fs::read_to_string(&path)?;
        let (meta, body) = split_post(&raw).ok_or_else(|| malformed(slug))?;
        let meta = parse_front_matter(meta);

        let date = parse_date(required(&meta, "date", slug)?, slug)?;
        let blurb_source = body.lines().find(|line| !line.trim().is_empty()).unwrap_or("");

        let listing = PostListing {
            title: slug.replace('-', " "),
            url: format!("/{slug}"),
            date: format_date(date),
            blurb: self.markdown.render(blurb_source),
        };
        Ok((date, listing))
    }
}

fn malformed(slug: &str) -> PostError {
    PostError::MalformedPost {
        slug: slug.to_string(),
    }
}

fn required<'a>(
    meta: &'a HashMap<String, String>,
    key: &str,
    slug: &str,
) -> Result<&'a str, PostError> {
    meta.get(key).map(String::as_str).ok_or_else(|| malformed(slug))
}

fn parse_date(value: &str, slug: &str) -> Result<NaiveDate, PostError> {
    let value = value.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    Err(PostError::InvalidDate {
        slug: slug.to_string(),
        value: value.to_string(),
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}
