//! Cross-link resolution.
//!
//! Two mutually exclusive modes per run:
//! - **Manual**: validate the declared entries against known post ids.
//! - **Auto**: suggest edges from keyword overlap between descriptions.
//!
//! Problems with individual entries never fail the run; each is returned as
//! a [`LatticeError::CrossLinkValidation`] warning and the entry is dropped.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, instrument, warn};

use lattice_shared::{ClassifiedPost, CrossLinkConfig, CrossLinkEntry, LatticeError, slugify};

use crate::model::{CrossLinkEdge, LinkOrigin};
use crate::similarity::{KeywordExtractor, jaccard};

/// Maximum keywords quoted in an auto cross-link's reason.
const REASON_KEYWORDS: usize = 5;

/// How cross-links were produced for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossLinkMode {
    Manual,
    Auto,
}

impl std::fmt::Display for CrossLinkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => f.write_str("manual"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

/// Validated cross-links plus everything that was dropped along the way.
#[derive(Debug)]
pub struct Resolution {
    pub mode: CrossLinkMode,
    pub edges: Vec<CrossLinkEdge>,
    /// One [`LatticeError::CrossLinkValidation`] per dropped entry.
    pub warnings: Vec<LatticeError>,
}

/// Pick the mode: declared entries always win; auto only fills the gap.
pub fn select_mode(declared: &[CrossLinkEntry], auto_requested: bool) -> CrossLinkMode {
    if declared.is_empty() && auto_requested {
        CrossLinkMode::Auto
    } else {
        CrossLinkMode::Manual
    }
}

/// Resolve cross-links for a classified post set.
///
/// `declared` is `None` when no cross-link file exists, which is the same
/// as an empty declaration.
#[instrument(skip_all, fields(posts = posts.len(), auto_requested = auto_requested))]
pub fn resolve(
    declared: Option<&[CrossLinkEntry]>,
    posts: &[ClassifiedPost],
    config: &CrossLinkConfig,
    auto_requested: bool,
) -> Resolution {
    let declared = declared.unwrap_or_default();

    match select_mode(declared, auto_requested) {
        CrossLinkMode::Auto => resolve_auto(posts, config),
        CrossLinkMode::Manual => {
            if declared.is_empty() {
                info!("no cross-links declared; pass --auto-crosslinks to suggest some");
            }
            let known: Vec<String> = posts.iter().map(ClassifiedPost::slug).collect();
            resolve_manual(declared, &known)
        }
    }
}

// ---------------------------------------------------------------------------
// Manual mode
// ---------------------------------------------------------------------------

/// Validate declared entries against the known post ids.
///
/// Entry slugs are passed through [`slugify`] first, which leaves valid
/// slugs untouched. Dropped, with exactly one warning each: entries naming an
/// unknown source or target, self-links, and repeats of an earlier pair.
pub fn resolve_manual(declared: &[CrossLinkEntry], known_ids: &[String]) -> Resolution {
    let known: HashSet<&str> = known_ids.iter().map(String::as_str).collect();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut edges = Vec::new();
    let mut warnings = Vec::new();

    for entry in declared {
        let source = slugify(&entry.source);
        let target = slugify(&entry.target);
        if source != entry.source || target != entry.target {
            debug!(
                declared_source = %entry.source,
                declared_target = %entry.target,
                %source,
                %target,
                "normalized cross-link slugs"
            );
        }

        let problem = match (known.contains(source.as_str()), known.contains(target.as_str())) {
            (false, false) => Some("unknown source and target slugs"),
            (false, true) => Some("unknown source slug"),
            (true, false) => Some("unknown target slug"),
            (true, true) if source == target => Some("source and target are the same post"),
            (true, true) if seen.contains(&(source.clone(), target.clone())) => {
                Some("duplicate of an earlier cross-link")
            }
            (true, true) => None,
        };

        if let Some(message) = problem {
            let err = LatticeError::cross_link(&entry.source, &entry.target, message);
            warn!("{err}; skipping");
            warnings.push(err);
            continue;
        }

        seen.insert((source.clone(), target.clone()));
        edges.push(CrossLinkEdge {
            from: source,
            to: target,
            reason: entry
                .reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            origin: LinkOrigin::Manual,
        });
    }

    info!(
        declared = declared.len(),
        accepted = edges.len(),
        skipped = warnings.len(),
        "manual cross-links resolved"
    );

    Resolution {
        mode: CrossLinkMode::Manual,
        edges,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Auto mode
// ---------------------------------------------------------------------------

/// A scored pair of posts, by feed index (`earlier < later`).
#[derive(Debug, Clone)]
struct Candidate {
    earlier: usize,
    later: usize,
    score: f64,
    shared: Vec<String>,
}

/// Suggest cross-links from description keyword overlap.
///
/// Pairs scoring strictly above the threshold are taken best-first (ties go
/// to the earlier post in feed order) while both endpoints stay under the
/// per-node cap.
pub fn resolve_auto(posts: &[ClassifiedPost], config: &CrossLinkConfig) -> Resolution {
    let extractor = KeywordExtractor::new(config);
    let ids: Vec<String> = posts.iter().map(ClassifiedPost::slug).collect();
    let keywords: Vec<BTreeSet<String>> = posts
        .iter()
        .map(|p| extractor.keywords(&p.raw.description))
        .collect();

    let mut candidates = Vec::new();
    for earlier in 0..posts.len() {
        for later in earlier + 1..posts.len() {
            if ids[earlier] == ids[later] {
                continue;
            }
            let score = jaccard(&keywords[earlier], &keywords[later]);
            if score > config.similarity_threshold {
                candidates.push(Candidate {
                    earlier,
                    later,
                    score,
                    shared: keywords[earlier]
                        .intersection(&keywords[later])
                        .cloned()
                        .collect(),
                });
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.earlier.cmp(&b.earlier))
            .then(a.later.cmp(&b.later))
    });

    let mut degree = vec![0usize; posts.len()];
    let mut edges = Vec::new();
    for c in &candidates {
        if degree[c.earlier] >= config.max_edges_per_node
            || degree[c.later] >= config.max_edges_per_node
        {
            continue;
        }
        degree[c.earlier] += 1;
        degree[c.later] += 1;

        let quoted: Vec<&str> = c.shared.iter().take(REASON_KEYWORDS).map(String::as_str).collect();
        edges.push(CrossLinkEdge {
            from: ids[c.earlier].clone(),
            to: ids[c.later].clone(),
            reason: Some(format!("shared keywords: {}", quoted.join(", "))),
            origin: LinkOrigin::Auto,
        });
    }

    info!(
        posts = posts.len(),
        candidates = candidates.len(),
        accepted = edges.len(),
        threshold = config.similarity_threshold,
        "auto cross-links generated"
    );

    Resolution {
        mode: CrossLinkMode::Auto,
        edges,
        warnings: Vec::new(),
    }
}
