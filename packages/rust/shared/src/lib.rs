//! Shared types, error model, and configuration for lattice.
//!
//! This crate is the foundation depended on by all other lattice crates.
//! It provides:
//! - [`LatticeError`], the unified error type
//! - Domain types ([`RawPost`], [`ClassifiedPost`], [`CrossLinkEntry`])
//! - The [`slugify`] contract used for every node id
//! - Configuration ([`LatticeConfig`], config loading)

pub mod config;
pub mod error;
pub mod slug;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    CanvasConfig, ClassifyConfig, CrossLinkConfig, FeedConfig, LatticeConfig, PathsConfig,
    PhysicsConfig, RenderConfig, ThemeConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{LatticeError, Result};
pub use slug::{EMPTY_SLUG, slugify};
pub use types::{ClassifiedPost, CrossLinkEntry, CrossLinkFile, RawPost, UNCATEGORIZED_SLUG};
