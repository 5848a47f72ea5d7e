//! Graph construction for lattice.
//!
//! Turns raw posts into the two-level knowledge graph:
//! - [`classify`] splits `"Model - Domain"` titles
//! - [`crosslinks`] validates declared cross-links or suggests them
//! - [`builder`] assembles hubs, posts and edges into an immutable [`Graph`]

pub mod builder;
pub mod classify;
pub mod crosslinks;
pub mod model;
pub mod similarity;

pub use builder::{BuildOptions, build_graph, truncate_summary};
pub use classify::{TitleParts, classify, classify_all, split_title};
pub use crosslinks::{CrossLinkMode, Resolution, resolve, resolve_auto, resolve_manual, select_mode};
pub use model::{
    CrossLinkEdge, Edge, Graph, HubNode, LinkOrigin, Node, PostNode, StructuralEdge,
};
pub use similarity::{KeywordExtractor, jaccard, similarity};
