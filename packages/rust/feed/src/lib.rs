//! Feed reader: turns already-fetched RSS or Atom text into [`RawPost`]s.
//!
//! Fetching is the caller's job; this crate never touches the network.
//! Entries without a title or a usable link are skipped and reported, while
//! a document that cannot be parsed at all fails the whole read.

mod parser;
pub mod text;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use url::Url;

use lattice_shared::{LatticeError, RawPost, Result};

pub use parser::FeedFormat;

/// Outcome of reading a feed document.
#[derive(Debug)]
pub struct FeedRead {
    /// Detected syndication format.
    pub format: FeedFormat,
    /// Accepted entries, in feed order.
    pub posts: Vec<RawPost>,
    /// One [`LatticeError::MissingRequiredField`] per skipped entry.
    pub skipped: Vec<LatticeError>,
}

impl FeedRead {
    /// Number of entries that were dropped.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Parse feed markup into raw posts, preserving feed order.
///
/// Missing descriptions become empty strings and missing or unparseable
/// dates become the Unix epoch.
#[instrument(skip_all, fields(bytes = xml.len()))]
pub fn read_feed(xml: &str) -> Result<FeedRead> {
    let (format, entries) = parser::parse_document(xml)?;
    debug!(%format, entries = entries.len(), "feed document parsed");

    let mut posts = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for (index, fields) in entries.into_iter().enumerate() {
        let title = fields
            .title
            .as_deref()
            .map(|t| {
                if fields.title_is_html {
                    text::plain_text(t)
                } else {
                    text::collapse_whitespace(t)
                }
            })
            .filter(|t| !t.is_empty());
        let Some(title) = title else {
            warn!(index, "skipping entry without title");
            skipped.push(LatticeError::MissingRequiredField {
                index,
                field: "title",
            });
            continue;
        };

        let link = fields
            .link
            .as_deref()
            .map(str::trim)
            .and_then(|l| Url::parse(l).ok())
            .filter(|u| matches!(u.scheme(), "http" | "https"));
        let Some(link) = link else {
            warn!(index, %title, raw = ?fields.link, "skipping entry without a valid link");
            skipped.push(LatticeError::MissingRequiredField {
                index,
                field: "link",
            });
            continue;
        };

        let published_at = match fields.date.as_deref() {
            Some(raw) => text::parse_date(raw).unwrap_or_else(|| {
                debug!(index, raw, "unparseable date, defaulting to epoch");
                DateTime::<Utc>::UNIX_EPOCH
            }),
            None => DateTime::<Utc>::UNIX_EPOCH,
        };

        posts.push(RawPost {
            title,
            link: link.to_string(),
            description: fields
                .description
                .as_deref()
                .map(text::plain_text)
                .unwrap_or_default(),
            published_at,
        });
    }

    info!(
        %format,
        posts = posts.len(),
        skipped = skipped.len(),
        "feed read"
    );

    Ok(FeedRead {
        format,
        posts,
        skipped,
    })
}
