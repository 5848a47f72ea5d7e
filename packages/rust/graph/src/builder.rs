//! Graph builder: classified posts + resolved cross-links → [`Graph`].

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use lattice_shared::{ClassifiedPost, LatticeError, Result};

use crate::model::{CrossLinkEdge, Graph, HubNode, PostNode, StructuralEdge};

/// Knobs that shape node content without affecting graph identity.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Longest summary kept on a post node, ellipsis included.
    pub summary_max_chars: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            summary_max_chars: 150,
        }
    }
}

/// Build the graph.
///
/// One hub per distinct domain slug in first-seen order, one post node and
/// one structural edge per post. Fails with [`LatticeError::DuplicateSlug`]
/// when two posts map to the same node id.
#[instrument(skip_all, fields(posts = posts.len(), cross_links = cross_links.len()))]
pub fn build_graph(
    posts: &[ClassifiedPost],
    cross_links: Vec<CrossLinkEdge>,
    options: &BuildOptions,
) -> Result<Graph> {
    let mut hubs: Vec<HubNode> = Vec::new();
    let mut hub_index: HashMap<String, usize> = HashMap::new();
    let mut post_nodes: Vec<PostNode> = Vec::with_capacity(posts.len());
    let mut structural: Vec<StructuralEdge> = Vec::with_capacity(posts.len());
    let mut titles_by_id: HashMap<String, &str> = HashMap::with_capacity(posts.len());

    for post in posts {
        let id = post.slug();

        if let Some(first) = titles_by_id.get(&id) {
            return Err(LatticeError::DuplicateSlug {
                slug: id,
                first: (*first).to_string(),
                second: post.raw.title.clone(),
            });
        }
        titles_by_id.insert(id.clone(), &post.raw.title);

        if !hub_index.contains_key(&post.domain_slug) {
            hub_index.insert(post.domain_slug.clone(), hubs.len());
            hubs.push(HubNode {
                id: post.domain_slug.clone(),
                label: post.domain_label.clone(),
            });
        } else {
            let hub = &hubs[hub_index[&post.domain_slug]];
            if hub.label != post.domain_label {
                debug!(
                    hub = %hub.id,
                    kept = %hub.label,
                    ignored = %post.domain_label,
                    "domain spelled differently; keeping first label"
                );
            }
        }

        structural.push(StructuralEdge {
            from: id.clone(),
            to: post.domain_slug.clone(),
        });
        post_nodes.push(PostNode {
            id,
            label: post.model_name.clone(),
            url: post.raw.link.clone(),
            summary: truncate_summary(&post.raw.description, options.summary_max_chars),
            date: post.raw.published_at,
            domain: post.domain_slug.clone(),
        });
    }

    // Resolved cross-links are already validated; anything else is a caller bug.
    let total = cross_links.len();
    let crosslinks: Vec<CrossLinkEdge> = cross_links
        .into_iter()
        .filter(|e| {
            let ok = titles_by_id.contains_key(&e.from) && titles_by_id.contains_key(&e.to);
            if !ok {
                warn!(from = %e.from, to = %e.to, "dropping cross-link to unknown post");
            }
            ok
        })
        .collect();
    if crosslinks.len() != total {
        debug!(dropped = total - crosslinks.len(), "unvalidated cross-links dropped");
    }

    info!(
        hubs = hubs.len(),
        posts = post_nodes.len(),
        structural = structural.len(),
        cross_links = crosslinks.len(),
        "graph built"
    );

    Ok(Graph::new(hubs, post_nodes, structural, crosslinks))
}

/// Shorten `text` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate_summary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let head: String = text.chars().take(keep).collect();
    format!("{}...", head.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinkOrigin;
    use chrono::{DateTime, Utc};
    use lattice_shared::{RawPost, UNCATEGORIZED_SLUG};

    fn post(model: &str, domain_label: &str, domain_slug: &str) -> ClassifiedPost {
        ClassifiedPost {
            raw: RawPost {
                title: format!("{model} - {domain_label}"),
                link: format!("https://x.test/{model}"),
                description: format!("About {model}."),
                published_at: DateTime::<Utc>::UNIX_EPOCH,
            },
            model_name: model.into(),
            domain_label: domain_label.into(),
            domain_slug: domain_slug.into(),
        }
    }

    fn link(from: &str, to: &str) -> CrossLinkEdge {
        CrossLinkEdge {
            from: from.into(),
            to: to.into(),
            reason: None,
            origin: LinkOrigin::Manual,
        }
    }

    #[test]
    fn one_hub_per_domain_in_first_seen_order() {
        let posts = [
            post("Kelly Criterion", "Economics", "economics"),
            post("Bayes Theorem", "Mathematics", "mathematics"),
            post("Opportunity Cost", "economics", "economics"),
            post("Untitled Musings", "Uncategorized", UNCATEGORIZED_SLUG),
        ];
        let graph = build_graph(&posts, vec![], &BuildOptions::default()).unwrap();

        let hub_ids: Vec<_> = graph.hubs().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(hub_ids, ["economics", "mathematics", UNCATEGORIZED_SLUG]);
        // First spelling wins.
        assert_eq!(graph.hub("economics").unwrap().label, "Economics");
        assert_eq!(graph.hub_size("economics"), 2);
    }

    #[test]
    fn one_structural_edge_per_post_to_its_hub() {
        let posts = [
            post("A", "X", "x"),
            post("B", "Y", "y"),
            post("C", "X", "x"),
        ];
        let graph = build_graph(&posts, vec![], &BuildOptions::default()).unwrap();

        assert_eq!(graph.posts().len(), 3);
        assert_eq!(graph.structural_edges().len(), 3);
        for p in graph.posts() {
            let edges: Vec<_> = graph
                .structural_edges()
                .iter()
                .filter(|e| e.from == p.id)
                .collect();
            assert_eq!(edges.len(), 1);
            assert_eq!(edges[0].to, p.domain);
            assert!(graph.hub(&edges[0].to).is_some());
        }
    }

    #[test]
    fn duplicate_slug_fails() {
        let posts = [
            post("Kelly Criterion", "Economics", "economics"),
            post("Kelly  Criterion!", "Finance", "finance"),
        ];
        let err = build_graph(&posts, vec![], &BuildOptions::default()).unwrap_err();
        match err {
            LatticeError::DuplicateSlug { slug, first, second } => {
                assert_eq!(slug, "kelly-criterion");
                assert_eq!(first, "Kelly Criterion - Economics");
                assert_eq!(second, "Kelly  Criterion! - Finance");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn cross_links_are_kept() {
        let posts = [post("A", "X", "x"), post("B", "Y", "y")];
        let graph = build_graph(&posts, vec![link("a", "b")], &BuildOptions::default()).unwrap();
        assert_eq!(graph.cross_links().len(), 1);
        assert_eq!(graph.edges().count(), 3);
        assert_eq!(graph.nodes().count(), 4);
    }

    #[test]
    fn unvalidated_cross_links_never_dangle() {
        let posts = [post("A", "X", "x")];
        let graph = build_graph(&posts, vec![link("a", "ghost")], &BuildOptions::default()).unwrap();
        assert!(graph.cross_links().is_empty());
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let graph = build_graph(&[], vec![], &BuildOptions::default()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.nodes().count(), 0);
    }

    #[test]
    fn summaries_are_truncated() {
        let mut p = post("A", "X", "x");
        p.raw.description = "word ".repeat(50);
        let graph = build_graph(&[p], vec![], &BuildOptions { summary_max_chars: 20 }).unwrap();
        let summary = &graph.posts()[0].summary;
        assert!(summary.chars().count() <= 20);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn truncate_summary_edges() {
        assert_eq!(truncate_summary("short", 10), "short");
        assert_eq!(truncate_summary("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_summary("abcdefghijk", 10), "abcdefg...");
        // Multi-byte characters are counted, not bytes.
        assert_eq!(truncate_summary("ééééééé", 6), "ééé...");
    }

    #[test]
    fn serialized_nodes_carry_kind() {
        let posts = [post("A", "X", "x")];
        let graph = build_graph(&posts, vec![], &BuildOptions::default()).unwrap();
        let nodes: Vec<_> = graph.nodes().collect();
        let json = serde_json::to_value(&nodes).unwrap();
        assert_eq!(json[0]["kind"], "hub");
        assert_eq!(json[1]["kind"], "post");
        assert_eq!(json[1]["label"], "A");

        let edges: Vec<_> = graph.edges().collect();
        let json = serde_json::to_value(&edges).unwrap();
        assert_eq!(json[0]["kind"], "structural");
        assert_eq!(json[0]["to"], "x");
    }
}
