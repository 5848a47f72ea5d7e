//! Pipeline orchestration for lattice.
//!
//! Ties the feed reader, graph builder and renderer together into the two
//! end-to-end runs exposed by the CLI: [`pipeline::generate`] and
//! [`pipeline::check`].

pub mod artifact;
pub mod inputs;
pub mod pipeline;

pub use artifact::ArtifactMeta;
pub use pipeline::{
    CheckReport, GenerateConfig, GenerateReport, GraphSummary, ProgressReporter, SilentProgress,
    check, generate,
};
