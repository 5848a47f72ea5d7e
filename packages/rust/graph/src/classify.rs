//! Title classifier: `"Model - Domain"` → (model name, domain).

use tracing::{debug, instrument};

use lattice_shared::{ClassifiedPost, ClassifyConfig, RawPost, UNCATEGORIZED_SLUG, slugify};

/// Result of splitting a single title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleParts {
    pub model_name: String,
    pub domain_label: String,
    pub domain_slug: String,
}

/// Split a title on the **last** occurrence of any configured separator.
///
/// The model name may itself contain a separator (`"Risk - Reward - Finance"`
/// is the model `Risk - Reward` in `Finance`). If no separator is found, the
/// model side is blank, or the domain side has no letters or digits, the
/// whole title is the model name and the post lands in the uncategorized
/// domain.
pub fn split_title(title: &str, config: &ClassifyConfig) -> TitleParts {
    let title = title.trim();

    let split = config
        .separators
        .iter()
        .filter(|sep| !sep.is_empty())
        .filter_map(|sep| title.rfind(sep.as_str()).map(|pos| (pos, sep.len())))
        // Rightmost wins; at the same position the longer separator wins.
        .max_by_key(|&(pos, len)| (pos, len));

    if let Some((pos, len)) = split {
        let model = title[..pos].trim();
        let domain = title[pos + len..].trim();
        if !model.is_empty() && domain.chars().any(char::is_alphanumeric) {
            return TitleParts {
                model_name: model.to_string(),
                domain_label: domain.to_string(),
                domain_slug: slugify(domain),
            };
        }
    }

    TitleParts {
        model_name: title.to_string(),
        domain_label: config.uncategorized_label.clone(),
        domain_slug: UNCATEGORIZED_SLUG.to_string(),
    }
}

/// Classify a single post.
pub fn classify(raw: RawPost, config: &ClassifyConfig) -> ClassifiedPost {
    let parts = split_title(&raw.title, config);
    ClassifiedPost {
        raw,
        model_name: parts.model_name,
        domain_label: parts.domain_label,
        domain_slug: parts.domain_slug,
    }
}

/// Classify every post, preserving order.
#[instrument(skip_all, fields(posts = posts.len()))]
pub fn classify_all(posts: Vec<RawPost>, config: &ClassifyConfig) -> Vec<ClassifiedPost> {
    let classified: Vec<ClassifiedPost> = posts.into_iter().map(|p| classify(p, config)).collect();

    let uncategorized = classified
        .iter()
        .filter(|p| p.domain_slug == UNCATEGORIZED_SLUG)
        .count();
    debug!(uncategorized, "titles classified");

    classified
}
