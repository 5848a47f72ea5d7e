//! Page renderer: [`Graph`] → one self-contained HTML page.
//!
//! The graph is serialised into a JSON payload and embedded in a static
//! template that runs a d3 force simulation in the browser. Nothing here
//! knows how layout works; it only fills the template.

pub mod payload;

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, instrument};

use lattice_graph::Graph;
use lattice_shared::{LatticeError, RenderConfig, Result};

pub use payload::{HUB_ID_PREFIX, Payload, date_label, hub_id};

const TEMPLATE: &str = include_str!("../templates/graph.html");

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").expect("placeholder regex"));

/// Render the complete page.
#[instrument(skip_all, fields(posts = graph.posts().len(), hubs = graph.hubs().len()))]
pub fn render_page(graph: &Graph, config: &RenderConfig) -> Result<String> {
    let payload = Payload::new(graph, config);
    let json = serde_json::to_string(&payload)
        .map_err(|e| LatticeError::Render(format!("cannot serialise graph payload: {e}")))?;
    let json = script_safe_json(&json);

    let title = escape_html(&config.title);
    let subtitle = escape_html(&config.subtitle);
    let d3_url = escape_html(&config.d3_url);

    // Single pass, so substituted text is never rescanned for placeholders.
    let page = PLACEHOLDER_RE.replace_all(TEMPLATE, |caps: &Captures| -> String {
        match &caps[1] {
            "title" => title.to_string(),
            "subtitle" => subtitle.to_string(),
            "d3_url" => d3_url.to_string(),
            "payload" => json.to_string(),
            _ => caps[0].to_string(),
        }
    });

    debug!(bytes = page.len(), "page rendered");
    Ok(page.into_owned())
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Make serialised JSON safe to inline in a `<script>` element.
///
/// `</` and `<!--` can only appear inside JSON strings, where `\/` and `<`
/// decode to the same characters.
pub fn script_safe_json(json: &str) -> Cow<'_, str> {
    if !json.contains("</") && !json.contains("<!--") {
        return Cow::Borrowed(json);
    }
    Cow::Owned(json.replace("</", "<\\/").replace("<!--", "\\u003c!--"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use lattice_graph::{BuildOptions, CrossLinkEdge, LinkOrigin, build_graph};
    use lattice_shared::{ClassifiedPost, RawPost};

    fn post(model: &str, domain: &str, description: &str, date: DateTime<Utc>) -> ClassifiedPost {
        ClassifiedPost {
            raw: RawPost {
                title: format!("{model} - {domain}"),
                link: format!("https://blog.test/p/{}", model.to_lowercase().replace(' ', "-")),
                description: description.into(),
                published_at: date,
            },
            model_name: model.into(),
            domain_label: domain.into(),
            domain_slug: domain.to_lowercase(),
        }
    }

    fn sample_graph() -> Graph {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        let posts = [
            post("Kelly Criterion", "Economics", "Bet sizing.", date),
            post("Bayes Theorem", "Mathematics", "Updating beliefs.", date),
            post("Opportunity Cost", "Economics", "Foregone value.", DateTime::UNIX_EPOCH),
        ];
        let links = vec![CrossLinkEdge {
            from: "kelly-criterion".into(),
            to: "bayes-theorem".into(),
            reason: Some("Both reason about odds".into()),
            origin: LinkOrigin::Manual,
        }];
        build_graph(&posts, links, &BuildOptions::default()).unwrap()
    }

    /// Pull the embedded JSON back out of a rendered page.
    fn embedded_payload(page: &str) -> serde_json::Value {
        let start = page.find(r#"<script id="graph-data" type="application/json">"#).unwrap();
        let rest = &page[start..];
        let open = rest.find('>').unwrap() + 1;
        let close = rest.find("</script>").unwrap();
        serde_json::from_str(&rest[open..close]).unwrap()
    }

    #[test]
    fn page_embeds_every_node_and_edge() {
        let page = render_page(&sample_graph(), &RenderConfig::default()).unwrap();
        let data = embedded_payload(&page);

        assert_eq!(data["hubs"].as_array().unwrap().len(), 2);
        assert_eq!(data["posts"].as_array().unwrap().len(), 3);
        // 3 structural + 1 cross-link.
        assert_eq!(data["links"].as_array().unwrap().len(), 4);
        assert_eq!(data["meta"]["cross_link_count"], 1);
        assert_eq!(data["hubs"][0]["id"], "hub:economics");
        assert_eq!(data["hubs"][0]["size"], 2);
        assert_eq!(data["links"][0]["target"], "hub:economics");
        assert_eq!(data["links"][3]["kind"], "crosslink");
        assert_eq!(data["links"][3]["origin"], "manual");
        assert_eq!(data["links"][3]["reason"], "Both reason about odds");
    }

    #[test]
    fn page_fills_every_placeholder() {
        let page = render_page(&sample_graph(), &RenderConfig::default()).unwrap();
        assert!(!PLACEHOLDER_RE.is_match(&page));
        assert!(page.contains("<title>Latticework of Mental Models</title>"));
        assert!(page.contains(r#"src="https://d3js.org/d3.v7.min.js""#));
    }

    #[test]
    fn posts_carry_colours_and_dates() {
        let page = render_page(&sample_graph(), &RenderConfig::default()).unwrap();
        let data = embedded_payload(&page);
        let palette = RenderConfig::default().theme.palette;

        assert_eq!(data["posts"][0]["color"], palette[0].as_str());
        assert_eq!(data["posts"][1]["color"], palette[1].as_str());
        assert_eq!(data["posts"][2]["color"], palette[0].as_str());
        assert_eq!(data["posts"][0]["date_label"], "Jan 05, 2024");
        assert!(data["posts"][2]["date_label"].is_null());
        assert_eq!(data["posts"][0]["domain"], "Economics");
        assert_eq!(data["posts"][0]["hub"], "hub:economics");
    }

    #[test]
    fn options_are_passed_through() {
        let mut config = RenderConfig::default();
        config.physics.hub_charge = -900.0;
        config.canvas.width = Some(1200);
        let data = embedded_payload(&render_page(&sample_graph(), &config).unwrap());
        assert_eq!(data["options"]["physics"]["hub_charge"], -900.0);
        assert_eq!(data["options"]["canvas"]["width"], 1200);
        assert!(data["options"]["canvas"].get("height").is_none());
    }

    #[test]
    fn feed_text_cannot_break_out_of_the_script() {
        let hostile = post(
            "Injection",
            "Security",
            "</script><script>alert(1)</script><!--",
            DateTime::UNIX_EPOCH,
        );
        let graph = build_graph(&[hostile], vec![], &BuildOptions::default()).unwrap();
        let page = render_page(&graph, &RenderConfig::default()).unwrap();

        assert!(!page.contains("alert(1)</script>"));
        let data = embedded_payload(&page);
        assert_eq!(
            data["posts"][0]["summary"],
            "</script><script>alert(1)</script><!--"
        );
    }

    #[test]
    fn title_is_html_escaped() {
        let config = RenderConfig {
            title: "Models & <Maps>".into(),
            ..RenderConfig::default()
        };
        let page = render_page(&sample_graph(), &config).unwrap();
        assert!(page.contains("<title>Models &amp; &lt;Maps&gt;</title>"));
        // The payload keeps the raw text; the page sets it via textContent.
        assert_eq!(embedded_payload(&page)["meta"]["title"], "Models & <Maps>");
    }

    #[test]
    fn placeholder_text_in_titles_is_not_expanded() {
        let config = RenderConfig {
            title: "{{ payload }}".into(),
            ..RenderConfig::default()
        };
        let page = render_page(&sample_graph(), &config).unwrap();
        assert!(page.contains("<title>{{ payload }}</title>"));
    }

    #[test]
    fn empty_graph_still_renders() {
        let graph = build_graph(&[], vec![], &BuildOptions::default()).unwrap();
        let data = embedded_payload(&render_page(&graph, &RenderConfig::default()).unwrap());
        assert_eq!(data["meta"]["post_count"], 0);
        assert!(data["links"].as_array().unwrap().is_empty());
    }

    #[test]
    fn escape_helpers() {
        assert!(matches!(escape_html("plain"), Cow::Borrowed(_)));
        assert_eq!(escape_html(r#"a<b>"c"&'d'"#), "a&lt;b&gt;&quot;c&quot;&amp;&#39;d&#39;");
        assert!(matches!(script_safe_json(r#"{"a":"b"}"#), Cow::Borrowed(_)));
        assert_eq!(script_safe_json(r#"{"a":"</b>"}"#), r#"{"a":"<\/b>"}"#);
    }
}
