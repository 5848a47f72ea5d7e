//! The immutable graph handed to rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// One topical domain, aggregating every post classified into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubNode {
    /// Domain slug, e.g. `economics`.
    pub id: String,
    /// Display label, e.g. `Economics` (first spelling seen in the feed).
    pub label: String,
}

/// One blog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostNode {
    /// Slug of the model name; unique across the graph.
    pub id: String,
    /// Model name shown on the node.
    pub label: String,
    pub url: String,
    /// Plain-text description, truncated for display.
    pub summary: String,
    pub date: DateTime<Utc>,
    /// Id of the owning [`HubNode`].
    pub domain: String,
}

/// A borrowed view over either node type, tagged by `kind` when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node<'a> {
    Hub(&'a HubNode),
    Post(&'a PostNode),
}

impl Node<'_> {
    pub fn id(&self) -> &str {
        match self {
            Node::Hub(h) => &h.id,
            Node::Post(p) => &p.id,
        }
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

/// The mandatory post → hub edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralEdge {
    pub from: String,
    pub to: String,
}

/// Where a cross-link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkOrigin {
    /// Declared in the cross-link file.
    Manual,
    /// Suggested by the keyword-overlap heuristic.
    Auto,
}

/// A post → post edge outside the hub hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossLinkEdge {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub origin: LinkOrigin,
}

/// A borrowed view over either edge type, tagged by `kind` when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Edge<'a> {
    Structural(&'a StructuralEdge),
    Crosslink(&'a CrossLinkEdge),
}

impl Edge<'_> {
    pub fn endpoints(&self) -> (&str, &str) {
        match self {
            Edge::Structural(e) => (&e.from, &e.to),
            Edge::Crosslink(e) => (&e.from, &e.to),
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Hubs, posts and both edge sets. Only the builder can construct one, and
/// it exposes no mutation afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    hubs: Vec<HubNode>,
    posts: Vec<PostNode>,
    structural: Vec<StructuralEdge>,
    crosslinks: Vec<CrossLinkEdge>,
}

impl Graph {
    pub(crate) fn new(
        hubs: Vec<HubNode>,
        posts: Vec<PostNode>,
        structural: Vec<StructuralEdge>,
        crosslinks: Vec<CrossLinkEdge>,
    ) -> Self {
        Self {
            hubs,
            posts,
            structural,
            crosslinks,
        }
    }

    /// Hubs in first-seen order.
    pub fn hubs(&self) -> &[HubNode] {
        &self.hubs
    }

    /// Posts in feed order.
    pub fn posts(&self) -> &[PostNode] {
        &self.posts
    }

    pub fn structural_edges(&self) -> &[StructuralEdge] {
        &self.structural
    }

    pub fn cross_links(&self) -> &[CrossLinkEdge] {
        &self.crosslinks
    }

    pub fn hub(&self, id: &str) -> Option<&HubNode> {
        self.hubs.iter().find(|h| h.id == id)
    }

    pub fn post(&self, id: &str) -> Option<&PostNode> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// All nodes: hubs first, then posts.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        self.hubs
            .iter()
            .map(Node::Hub)
            .chain(self.posts.iter().map(Node::Post))
    }

    /// All edges: structural first, then cross-links.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.structural
            .iter()
            .map(Edge::Structural)
            .chain(self.crosslinks.iter().map(Edge::Crosslink))
    }

    /// Number of posts attached to the given hub.
    pub fn hub_size(&self, hub_id: &str) -> usize {
        self.posts.iter().filter(|p| p.domain == hub_id).count()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
