//! The JSON document embedded in the page.
//!
//! Everything the browser needs is precomputed here: colours, hub sizes and
//! display dates. The template only lays out and wires up interaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use lattice_graph::{Edge, Graph, LinkOrigin};
use lattice_shared::{CanvasConfig, PhysicsConfig, RenderConfig, ThemeConfig};

/// Prefix keeping hub ids apart from post ids in the browser.
pub const HUB_ID_PREFIX: &str = "hub:";

#[derive(Debug, Serialize)]
pub struct Payload<'a> {
    pub meta: Meta<'a>,
    pub hubs: Vec<HubEntry<'a>>,
    pub posts: Vec<PostEntry<'a>>,
    pub links: Vec<LinkEntry<'a>>,
    pub options: Options<'a>,
}

#[derive(Debug, Serialize)]
pub struct Meta<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub post_count: usize,
    pub hub_count: usize,
    pub cross_link_count: usize,
}

#[derive(Debug, Serialize)]
pub struct HubEntry<'a> {
    pub id: String,
    pub label: &'a str,
    pub color: &'a str,
    /// Number of posts in this domain.
    pub size: usize,
}

#[derive(Debug, Serialize)]
pub struct PostEntry<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub url: &'a str,
    pub summary: &'a str,
    pub date: DateTime<Utc>,
    /// `None` for posts whose feed entry carried no usable date.
    pub date_label: Option<String>,
    /// Prefixed id of the owning hub.
    pub hub: String,
    pub domain: &'a str,
    pub color: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Structural,
    Crosslink,
}

#[derive(Debug, Serialize)]
pub struct LinkEntry<'a> {
    pub source: String,
    pub target: String,
    pub kind: LinkKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<LinkOrigin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct Options<'a> {
    pub theme: &'a ThemeConfig,
    pub physics: &'a PhysicsConfig,
    pub canvas: &'a CanvasConfig,
}

pub fn hub_id(slug: &str) -> String {
    format!("{HUB_ID_PREFIX}{slug}")
}

/// `Jan 05, 2024`; epoch dates stand for "unknown" and get no label.
pub fn date_label(date: DateTime<Utc>) -> Option<String> {
    (date != DateTime::<Utc>::UNIX_EPOCH).then(|| date.format("%b %d, %Y").to_string())
}

impl<'a> Payload<'a> {
    pub fn new(graph: &'a Graph, config: &'a RenderConfig) -> Self {
        let theme = &config.theme;
        let color_for = |i: usize| -> &'a str {
            if theme.palette.is_empty() {
                theme.hub_color.as_str()
            } else {
                theme.palette[i % theme.palette.len()].as_str()
            }
        };

        let mut colors: HashMap<&str, &str> = HashMap::with_capacity(graph.hubs().len());
        let hubs: Vec<HubEntry<'a>> = graph
            .hubs()
            .iter()
            .enumerate()
            .map(|(i, hub)| {
                colors.insert(hub.id.as_str(), color_for(i));
                HubEntry {
                    id: hub_id(&hub.id),
                    label: &hub.label,
                    color: &theme.hub_color,
                    size: graph.hub_size(&hub.id),
                }
            })
            .collect();

        let posts = graph
            .posts()
            .iter()
            .map(|post| {
                let domain = graph
                    .hub(&post.domain)
                    .map_or(post.domain.as_str(), |h| h.label.as_str());
                let color = colors
                    .get(post.domain.as_str())
                    .copied()
                    .unwrap_or(theme.hub_color.as_str());
                PostEntry {
                    id: &post.id,
                    label: &post.label,
                    url: &post.url,
                    summary: &post.summary,
                    date: post.date,
                    date_label: date_label(post.date),
                    hub: hub_id(&post.domain),
                    domain,
                    color,
                }
            })
            .collect();

        let links = graph
            .edges()
            .map(|edge| match edge {
                Edge::Structural(e) => LinkEntry {
                    source: e.from.clone(),
                    target: hub_id(&e.to),
                    kind: LinkKind::Structural,
                    origin: None,
                    reason: None,
                },
                Edge::Crosslink(e) => LinkEntry {
                    source: e.from.clone(),
                    target: e.to.clone(),
                    kind: LinkKind::Crosslink,
                    origin: Some(e.origin),
                    reason: e.reason.as_deref(),
                },
            })
            .collect();

        Self {
            meta: Meta {
                title: &config.title,
                subtitle: &config.subtitle,
                post_count: graph.posts().len(),
                hub_count: graph.hubs().len(),
                cross_link_count: graph.cross_links().len(),
            },
            hubs,
            posts,
            links,
            options: Options {
                theme,
                physics: &config.physics,
                canvas: &config.canvas,
            },
        }
    }
}
