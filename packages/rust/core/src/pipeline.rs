//! End-to-end pipelines: feed file → graph → page.
//!
//! `generate` runs every phase and writes the page; `check` stops after the
//! graph is built, for validating a feed and cross-link file together.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use lattice_feed::{FeedFormat, read_feed};
use lattice_graph::{BuildOptions, CrossLinkMode, Graph, build_graph, classify_all, resolve};
use lattice_render::render_page;
use lattice_shared::{LatticeConfig, LatticeError, Result};

use crate::artifact::{ArtifactMeta, write_artifact};
use crate::inputs::{load_crosslinks, read_feed_file};

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub feed_path: PathBuf,
    pub output_path: PathBuf,
    pub crosslinks_path: PathBuf,
    /// Suggest cross-links when none are declared.
    pub auto_crosslinks: bool,
    /// Classification, heuristic and rendering settings.
    pub settings: LatticeConfig,
}

impl GenerateConfig {
    /// Take paths and the auto flag from the loaded configuration.
    pub fn from_config(settings: LatticeConfig) -> Self {
        Self {
            feed_path: settings.paths.feed.clone(),
            output_path: settings.paths.output.clone(),
            crosslinks_path: settings.paths.crosslinks.clone(),
            auto_crosslinks: settings.crosslinks.auto,
            settings,
        }
    }
}

/// Shape of the built graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphSummary {
    pub posts: usize,
    pub hubs: usize,
    pub structural_edges: usize,
    pub cross_links: usize,
}

impl GraphSummary {
    fn of(graph: &Graph) -> Self {
        Self {
            posts: graph.posts().len(),
            hubs: graph.hubs().len(),
            structural_edges: graph.structural_edges().len(),
            cross_links: graph.cross_links().len(),
        }
    }
}

/// Result of [`check`].
#[derive(Debug)]
pub struct CheckReport {
    pub feed_format: FeedFormat,
    pub mode: CrossLinkMode,
    pub summary: GraphSummary,
    /// Feed entries dropped for a missing title or link.
    pub skipped: Vec<LatticeError>,
    /// Cross-links dropped during validation.
    pub warnings: Vec<LatticeError>,
    pub elapsed: Duration,
}

/// Result of [`generate`].
#[derive(Debug)]
pub struct GenerateReport {
    pub feed_format: FeedFormat,
    pub mode: CrossLinkMode,
    pub summary: GraphSummary,
    pub skipped: Vec<LatticeError>,
    pub warnings: Vec<LatticeError>,
    pub artifact: ArtifactMeta,
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called for every feed entry or cross-link that was dropped.
    fn dropped(&self, reason: &LatticeError);
    /// Called when `generate` completes.
    fn done(&self, report: &GenerateReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn dropped(&self, _reason: &LatticeError) {}
    fn done(&self, _report: &GenerateReport) {}
}

struct Built {
    graph: Graph,
    feed_format: FeedFormat,
    mode: CrossLinkMode,
    skipped: Vec<LatticeError>,
    warnings: Vec<LatticeError>,
}

/// Read, classify, resolve and build. Shared by both entry points.
fn build(config: &GenerateConfig, progress: &dyn ProgressReporter) -> Result<Built> {
    let settings = &config.settings;

    progress.phase("Reading feed");
    let xml = read_feed_file(&config.feed_path)?;
    let feed = read_feed(&xml)?;
    for skipped in &feed.skipped {
        progress.dropped(skipped);
    }
    if feed.posts.is_empty() {
        warn!(feed = %config.feed_path.display(), "feed has no usable entries");
    }

    progress.phase("Classifying titles");
    let posts = classify_all(feed.posts, &settings.classify);

    progress.phase("Resolving cross-links");
    let declared = load_crosslinks(&config.crosslinks_path)?;
    let resolution = resolve(
        declared.as_deref(),
        &posts,
        &settings.crosslinks,
        config.auto_crosslinks,
    );
    for warning in &resolution.warnings {
        progress.dropped(warning);
    }

    progress.phase("Building graph");
    let options = BuildOptions {
        summary_max_chars: settings.feed.summary_max_chars,
    };
    let graph = build_graph(&posts, resolution.edges, &options)?;

    Ok(Built {
        graph,
        feed_format: feed.format,
        mode: resolution.mode,
        skipped: feed.skipped,
        warnings: resolution.warnings,
    })
}

/// Validate the inputs without rendering or writing anything.
#[instrument(skip_all, fields(feed = %config.feed_path.display()))]
pub fn check(config: &GenerateConfig, progress: &dyn ProgressReporter) -> Result<CheckReport> {
    let start = Instant::now();
    let built = build(config, progress)?;
    let summary = GraphSummary::of(&built.graph);

    info!(
        posts = summary.posts,
        hubs = summary.hubs,
        cross_links = summary.cross_links,
        skipped = built.skipped.len(),
        warnings = built.warnings.len(),
        "check complete"
    );

    Ok(CheckReport {
        feed_format: built.feed_format,
        mode: built.mode,
        summary,
        skipped: built.skipped,
        warnings: built.warnings,
        elapsed: start.elapsed(),
    })
}

/// Run the full pipeline and write the page.
///
/// 1. Read and parse the feed
/// 2. Classify titles into model and domain
/// 3. Resolve cross-links (manual or auto)
/// 4. Build the graph
/// 5. Render and write the page atomically
///
/// Nothing is written unless every earlier phase succeeds.
#[instrument(skip_all, fields(feed = %config.feed_path.display(), output = %config.output_path.display()))]
pub fn generate(
    config: &GenerateConfig,
    progress: &dyn ProgressReporter,
) -> Result<GenerateReport> {
    let start = Instant::now();
    info!("starting generate pipeline");

    let built = build(config, progress)?;

    progress.phase("Rendering page");
    let page = render_page(&built.graph, &config.settings.render)?;

    progress.phase("Writing output");
    let artifact = write_artifact(&config.output_path, &page)?;

    let report = GenerateReport {
        feed_format: built.feed_format,
        mode: built.mode,
        summary: GraphSummary::of(&built.graph),
        skipped: built.skipped,
        warnings: built.warnings,
        artifact,
        elapsed: start.elapsed(),
    };

    info!(
        posts = report.summary.posts,
        hubs = report.summary.hubs,
        cross_links = report.summary.cross_links,
        bytes = report.artifact.size_bytes,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "generate pipeline complete"
    );

    progress.done(&report);
    Ok(report)
}
