//! Core domain types shared across the lattice pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::slug::slugify;

/// Domain slug assigned to posts whose title carries no separator.
pub const UNCATEGORIZED_SLUG: &str = "uncategorized";

// ---------------------------------------------------------------------------
// RawPost
// ---------------------------------------------------------------------------

/// A single feed entry, exactly as the feed reader extracted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    /// Entry title (trimmed, never empty).
    pub title: String,
    /// Absolute URL of the post.
    pub link: String,
    /// Plain-text description; empty when the feed omits it.
    #[serde(default)]
    pub description: String,
    /// Publish timestamp; Unix epoch when missing or unparseable.
    pub published_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// ClassifiedPost
// ---------------------------------------------------------------------------

/// A [`RawPost`] split into model name and domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPost {
    #[serde(flatten)]
    pub raw: RawPost,
    /// Left side of the title separator (or the whole title).
    pub model_name: String,
    /// Human-readable domain, e.g. `Economics`.
    pub domain_label: String,
    /// Normalized domain id, e.g. `economics`.
    pub domain_slug: String,
}

impl ClassifiedPost {
    /// Node id of this post: the slug of its model name.
    pub fn slug(&self) -> String {
        slugify(&self.model_name)
    }
}

// ---------------------------------------------------------------------------
// Cross-link declarations
// ---------------------------------------------------------------------------

/// One user-declared cross-link, as written in the cross-link file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossLinkEntry {
    /// Slug of the source post.
    pub source: String,
    /// Slug of the target post.
    pub target: String,
    /// Optional free-form explanation shown in the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Root structure of a cross-link file (`crosslinks.json` / `crosslinks.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossLinkFile {
    #[serde(default)]
    pub crosslinks: Vec<CrossLinkEntry>,
}
