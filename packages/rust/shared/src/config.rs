//! Application configuration for lattice.
//!
//! Lookup order: an explicit `--config` path, then `./lattice.toml`, then
//! `~/.lattice/lattice.toml`, then built-in defaults.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "lattice.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".lattice";

// ---------------------------------------------------------------------------
// Config structs (matching lattice.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// Default input/output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Title classification.
    #[serde(default)]
    pub classify: ClassifyConfig,

    /// Feed reading.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Cross-link resolution.
    #[serde(default)]
    pub crosslinks: CrossLinkConfig,

    /// Page rendering.
    #[serde(default)]
    pub render: RenderConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Feed document to read.
    #[serde(default = "default_feed_path")]
    pub feed: PathBuf,

    /// Page artifact to write.
    #[serde(default = "default_output_path")]
    pub output: PathBuf,

    /// Cross-link declarations (JSON or TOML).
    #[serde(default = "default_crosslinks_path")]
    pub crosslinks: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            feed: default_feed_path(),
            output: default_output_path(),
            crosslinks: default_crosslinks_path(),
        }
    }
}

fn default_feed_path() -> PathBuf {
    "feed.xml".into()
}
fn default_output_path() -> PathBuf {
    "lattice-graph.html".into()
}
fn default_crosslinks_path() -> PathBuf {
    "crosslinks.json".into()
}

/// `[classify]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// Tokens separating model name from domain in a title.
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,

    /// Display label of the fallback domain.
    #[serde(default = "default_uncategorized_label")]
    pub uncategorized_label: String,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            separators: default_separators(),
            uncategorized_label: default_uncategorized_label(),
        }
    }
}

fn default_separators() -> Vec<String> {
    vec![" - ".into(), " – ".into(), " — ".into()]
}
fn default_uncategorized_label() -> String {
    "Uncategorized".into()
}

/// `[feed]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Maximum characters of description shown per post.
    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            summary_max_chars: default_summary_max_chars(),
        }
    }
}

fn default_summary_max_chars() -> usize {
    150
}

/// `[crosslinks]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossLinkConfig {
    /// Derive cross-links from post text when none are declared.
    #[serde(default)]
    pub auto: bool,

    /// Pairs must score strictly above this to be linked.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Upper bound on auto cross-links touching any single post.
    #[serde(default = "default_max_edges_per_node")]
    pub max_edges_per_node: usize,

    /// Words shorter than this never count as keywords.
    #[serde(default = "default_min_word_len")]
    pub min_word_len: usize,

    /// Extra words ignored by the similarity heuristic.
    #[serde(default)]
    pub stopwords: Vec<String>,
}

impl Default for CrossLinkConfig {
    fn default() -> Self {
        Self {
            auto: false,
            similarity_threshold: default_similarity_threshold(),
            max_edges_per_node: default_max_edges_per_node(),
            min_word_len: default_min_word_len(),
            stopwords: Vec::new(),
        }
    }
}

fn default_similarity_threshold() -> f64 {
    0.2
}
fn default_max_edges_per_node() -> usize {
    3
}
fn default_min_word_len() -> usize {
    4
}

/// `[render]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Page heading and `<title>`.
    #[serde(default = "default_title")]
    pub title: String,

    /// Line under the heading.
    #[serde(default = "default_subtitle")]
    pub subtitle: String,

    /// Where the page loads d3 from.
    #[serde(default = "default_d3_url")]
    pub d3_url: String,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub physics: PhysicsConfig,

    #[serde(default)]
    pub canvas: CanvasConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            d3_url: default_d3_url(),
            theme: ThemeConfig::default(),
            physics: PhysicsConfig::default(),
            canvas: CanvasConfig::default(),
        }
    }
}

fn default_title() -> String {
    "Latticework of Mental Models".into()
}
fn default_subtitle() -> String {
    "An interconnected knowledge graph".into()
}
fn default_d3_url() -> String {
    "https://d3js.org/d3.v7.min.js".into()
}

/// `[render.theme]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_panel")]
    pub panel: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_muted_text")]
    pub muted_text: String,
    #[serde(default = "default_hub_color")]
    pub hub_color: String,
    /// Domain colours, assigned to hubs in first-seen order and reused cyclically.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            panel: default_panel(),
            text: default_text(),
            muted_text: default_muted_text(),
            hub_color: default_hub_color(),
            palette: default_palette(),
        }
    }
}

fn default_background() -> String {
    "#0d1117".into()
}
fn default_panel() -> String {
    "#161b22".into()
}
fn default_text() -> String {
    "#e6edf3".into()
}
fn default_muted_text() -> String {
    "#8b949e".into()
}
fn default_hub_color() -> String {
    "#bc8cff".into()
}
fn default_palette() -> Vec<String> {
    [
        "#58a6ff", "#3fb950", "#d29922", "#39d1d1", "#f778ba", "#f85149", "#a371f7", "#7ee787",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// `[render.physics]` section: force simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    #[serde(default = "default_hub_link_distance")]
    pub hub_link_distance: f64,
    #[serde(default = "default_hub_link_strength")]
    pub hub_link_strength: f64,
    #[serde(default = "default_cross_link_distance")]
    pub cross_link_distance: f64,
    #[serde(default = "default_cross_link_strength")]
    pub cross_link_strength: f64,
    #[serde(default = "default_hub_charge")]
    pub hub_charge: f64,
    #[serde(default = "default_post_charge")]
    pub post_charge: f64,
    #[serde(default = "default_collision_padding")]
    pub collision_padding: f64,
    #[serde(default = "default_velocity_decay")]
    pub velocity_decay: f64,
    #[serde(default = "default_alpha_decay")]
    pub alpha_decay: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            hub_link_distance: default_hub_link_distance(),
            hub_link_strength: default_hub_link_strength(),
            cross_link_distance: default_cross_link_distance(),
            cross_link_strength: default_cross_link_strength(),
            hub_charge: default_hub_charge(),
            post_charge: default_post_charge(),
            collision_padding: default_collision_padding(),
            velocity_decay: default_velocity_decay(),
            alpha_decay: default_alpha_decay(),
        }
    }
}

fn default_hub_link_distance() -> f64 {
    120.0
}
fn default_hub_link_strength() -> f64 {
    0.8
}
fn default_cross_link_distance() -> f64 {
    180.0
}
fn default_cross_link_strength() -> f64 {
    0.2
}
fn default_hub_charge() -> f64 {
    -600.0
}
fn default_post_charge() -> f64 {
    -300.0
}
fn default_collision_padding() -> f64 {
    40.0
}
fn default_velocity_decay() -> f64 {
    0.4
}
fn default_alpha_decay() -> f64 {
    0.02
}

/// `[render.canvas]` section. Unset dimensions fill the browser viewport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl LatticeConfig {
    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.classify.separators.is_empty() {
            return Err(LatticeError::config("classify.separators must not be empty"));
        }
        if self.classify.separators.iter().any(|s| s.trim().is_empty()) {
            return Err(LatticeError::config(
                "classify.separators must not contain blank entries",
            ));
        }
        if self.classify.uncategorized_label.trim().is_empty() {
            return Err(LatticeError::config("classify.uncategorized_label must not be blank"));
        }
        if self.feed.summary_max_chars < 4 {
            return Err(LatticeError::config("feed.summary_max_chars must be at least 4"));
        }

        let threshold = self.crosslinks.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(LatticeError::config(format!(
                "crosslinks.similarity_threshold must be within 0.0..=1.0, got {threshold}"
            )));
        }
        if self.crosslinks.max_edges_per_node == 0 {
            return Err(LatticeError::config("crosslinks.max_edges_per_node must be at least 1"));
        }

        if self.render.theme.palette.is_empty() {
            return Err(LatticeError::config("render.theme.palette must not be empty"));
        }
        let physics = &self.render.physics;
        let values = [
            physics.hub_link_distance,
            physics.hub_link_strength,
            physics.cross_link_distance,
            physics.cross_link_strength,
            physics.hub_charge,
            physics.post_charge,
            physics.collision_padding,
            physics.velocity_decay,
            physics.alpha_decay,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LatticeError::config("render.physics values must be finite numbers"));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.lattice/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LatticeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.lattice/lattice.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config.
///
/// An explicit path must exist. Without one, `./lattice.toml` and then the
/// user config file are tried; if neither exists the defaults are returned.
pub fn load_config(explicit: Option<&Path>) -> Result<LatticeConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    match config_file_path() {
        Ok(path) if path.exists() => load_config_from(&path),
        _ => {
            tracing::debug!("no config file found, using defaults");
            Ok(LatticeConfig::default())
        }
    }
}

/// Load and validate the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<LatticeConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LatticeError::io(path, e))?;

    let config: LatticeConfig = toml::from_str(&content).map_err(|e| {
        LatticeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write a default config file, to `target` or to the user config file.
/// Returns the path to the created file.
pub fn init_config(target: Option<&Path>) -> Result<PathBuf> {
    let path = match target {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| LatticeError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&LatticeConfig::default())
        .map_err(|e| LatticeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LatticeError::io(&path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = LatticeConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("similarity_threshold"));
        assert!(toml_str.contains("crosslinks.json"));
    }

    #[test]
    fn config_roundtrip() {
        let config = LatticeConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: LatticeConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed, config);
        assert_eq!(parsed.crosslinks.max_edges_per_node, 3);
        assert_eq!(parsed.classify.separators.len(), 3);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[crosslinks]
auto = true
similarity_threshold = 0.35

[render.canvas]
width = 1200
"#;
        let config: LatticeConfig = toml::from_str(toml_str).expect("parse");
        assert!(config.crosslinks.auto);
        assert_eq!(config.crosslinks.similarity_threshold, 0.35);
        assert_eq!(config.crosslinks.min_word_len, 4);
        assert_eq!(config.render.canvas.width, Some(1200));
        assert_eq!(config.render.canvas.height, None);
        assert_eq!(config.feed.summary_max_chars, 150);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_threshold() {
        let mut config = LatticeConfig::default();
        config.crosslinks.similarity_threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("similarity_threshold"));
    }

    #[test]
    fn validate_rejects_blank_separator() {
        let mut config = LatticeConfig::default();
        config.classify.separators = vec!["  ".into()];
        assert!(config.validate().is_err());

        config.classify.separators.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_cap() {
        let mut config = LatticeConfig::default();
        config.crosslinks.max_edges_per_node = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn init_then_load_from_explicit_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("lattice.toml");

        let written = init_config(Some(&path)).expect("init");
        assert_eq!(written, path);

        let loaded = load_config(Some(&path)).expect("load");
        assert_eq!(loaded, LatticeConfig::default());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, LatticeError::Io { .. }));
    }

    #[test]
    fn malformed_config_names_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[crosslinks\nauto = yes").expect("write");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
