//! Feed document parser.
//!
//! Understands the two syndication formats blogs actually publish:
//! - RSS 2.0 / RSS 1.0 (RDF): `<item>` with `title`, `link`, `description`, `pubDate`
//! - Atom: `<entry>` with `title`, `link href`, `summary`/`content`, `published`/`updated`

use roxmltree::{Document, Node, ParsingOptions};

use lattice_shared::{LatticeError, Result};

/// Namespace URI of Atom elements.
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Syndication format of the parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Atom,
}

impl std::fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rss => f.write_str("rss"),
            Self::Atom => f.write_str("atom"),
        }
    }
}

/// Raw field values of one entry, before validation.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryFields {
    pub title: Option<String>,
    /// Atom `type="html"` title: the text is escaped markup, not plain text.
    pub title_is_html: bool,
    pub link: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a feed document into its format and per-entry raw fields, in document order.
pub(crate) fn parse_document(xml: &str) -> Result<(FeedFormat, Vec<EntryFields>)> {
    // RSS 0.91 feeds still ship a Netscape DOCTYPE; entity expansion stays capped.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| LatticeError::feed_parse(format!("malformed XML: {e}")))?;

    let root = doc.root_element();
    let format = match root.tag_name().name() {
        "rss" | "RDF" => FeedFormat::Rss,
        "feed" => FeedFormat::Atom,
        other => {
            return Err(LatticeError::feed_parse(format!(
                "unrecognised root element <{other}>, expected <rss>, <rdf:RDF> or <feed>"
            )));
        }
    };

    let entries = match format {
        FeedFormat::Rss => root
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "item")
            .map(rss_item)
            .collect(),
        FeedFormat::Atom => root
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "entry")
            .map(atom_entry)
            .collect(),
    };

    Ok((format, entries))
}

fn rss_item(item: Node<'_, '_>) -> EntryFields {
    // Only un-namespaced (RSS 2.0) or RSS 1.0 children; skips `atom:link` and friends.
    let child = |name: &str| {
        item.children().find(|c| {
            c.is_element()
                && c.tag_name().name() == name
                && c.tag_name().namespace().is_none_or(|ns| ns.contains("purl.org/rss"))
        })
    };

    let link = child("link").map(text_of).filter(|s| !s.trim().is_empty()).or_else(|| {
        child("guid")
            .filter(|g| g.attribute("isPermaLink") != Some("false"))
            .map(text_of)
    });

    let date = child("pubDate").map(text_of).or_else(|| {
        item.children()
            .find(|c| c.is_element() && c.tag_name().name() == "date")
            .map(text_of)
    });

    EntryFields {
        title: child("title").map(text_of),
        title_is_html: false,
        link,
        description: child("description").map(text_of),
        date,
    }
}

fn atom_entry(entry: Node<'_, '_>) -> EntryFields {
    let child = |name: &str| {
        entry.children().find(|c| {
            c.is_element()
                && c.tag_name().name() == name
                && c.tag_name().namespace().is_none_or(|ns| ns == ATOM_NS)
        })
    };

    let links: Vec<Node<'_, '_>> = entry
        .children()
        .filter(|c| c.is_element() && c.tag_name().name() == "link")
        .collect();
    let link = links
        .iter()
        .find(|l| matches!(l.attribute("rel"), None | Some("alternate")))
        .or_else(|| links.first())
        .and_then(|l| l.attribute("href"))
        .map(str::to_string);

    let title = child("title");

    EntryFields {
        title: title.map(text_of),
        title_is_html: title.is_some_and(|t| t.attribute("type") == Some("html")),
        link,
        description: child("summary").or_else(|| child("content")).map(text_of),
        date: child("published").or_else(|| child("updated")).map(text_of),
    }
}

/// Concatenated text content of an element (text and CDATA, any depth).
fn text_of(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
