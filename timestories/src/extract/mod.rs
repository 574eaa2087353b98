//! Story link extraction.
//!
//! A backend walks the page and yields anchors in document order; the shared
//! pass here normalizes hrefs, filters on base URL and numeric article id,
//! de-duplicates by link and stops once the limit is reached.

use anyhow::{bail, Context, Result};
use common::{Config, ExtractStrategy};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

use crate::model::Story;

pub mod dom;
pub mod scan;

/// Candidate anchor: raw href plus its tag-free inner text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

/// Pure function of its inputs; cheap to clone into a blocking task.
#[derive(Debug, Clone)]
pub struct Extractor {
    /// Canonical form of the configured base URL; accepted links start with it.
    base_url: String,
    /// Scheme, host and non-default port, used to resolve root-relative hrefs.
    origin: String,
    limit: usize,
    strategy: ExtractStrategy,
}

impl Extractor {
    pub fn new(base_url: &str, limit: usize, strategy: ExtractStrategy) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid base URL: {}", base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("base URL must be http or https: {}", base_url);
        }
        Ok(Self {
            origin: base.origin().ascii_serialization(),
            base_url: base.into(),
            limit,
            strategy,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.source.base_url,
            config.extraction.limit,
            config.extraction.strategy,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Up to `limit` stories in first-seen order. An empty result is not an error here.
    pub fn extract(&self, page: &str) -> Vec<Story> {
        if self.limit == 0 {
            return Vec::new();
        }

        let stories = match self.strategy {
            ExtractStrategy::Dom => {
                let document = dom::parse(page);
                self.select_stories(dom::anchors(&document))
            }
            ExtractStrategy::Scan => self.select_stories(scan::anchors(page)),
        };

        debug!(strategy = %self.strategy, count = stories.len(), "extracted stories");
        stories
    }

    fn select_stories(&self, anchors: impl Iterator<Item = Anchor>) -> Vec<Story> {
        let mut stories = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for anchor in anchors {
            // An empty title skips the anchor without marking its href as seen.
            let title = collapse_whitespace(&anchor.text);
            if title.is_empty() {
                continue;
            }

            let Some(link) = self.normalize(&anchor.href) else {
                continue;
            };

            if !link.starts_with(&self.base_url) || !has_numeric_id(&link) || seen.contains(&link) {
                continue;
            }

            seen.insert(link.clone());
            stories.push(Story { title, link });

            if stories.len() >= self.limit {
                break;
            }
        }

        stories
    }

    fn normalize(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if let Some(rest) = href.strip_prefix("//") {
            Some(format!("https://{}", rest))
        } else if href.starts_with('/') {
            Some(format!("{}{}", self.origin, href))
        } else {
            Some(href.to_string())
        }
    }
}

/// `/` followed by at least seven digits and another `/`.
pub fn has_numeric_id(link: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/\d{7,}/").expect("numeric id pattern"))
        .is_match(link)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
