//! Anchor walk over a parsed HTML tree.
//!
//! The HTML5 parser happily closes anchors the page never closed. Before
//! parsing, every `<a` opening tag is stamped with its source index (or
//! `open` when no `</a>` closes it), so the walk can drop recovered anchors
//! and stitch back together the pieces of one anchor the parser split up.

use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::OnceLock;

use super::scan::open_tags;
use super::Anchor;

const MARKER: &str = "data-timestories-anchor";
const UNTERMINATED: &str = "open";

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("anchor selector"))
}

/// Parse `page` with every anchor opening tag stamped.
pub fn parse(page: &str) -> Html {
    let tags = open_tags(page);
    let mut marked = String::with_capacity(page.len() + tags.len() * (MARKER.len() + 12));
    let mut last = 0;

    for (index, tag) in tags.iter().enumerate() {
        // Insert right after the two ASCII bytes of "<a".
        let at = tag.start + 2;
        marked.push_str(&page[last..at]);
        if tag.terminated {
            marked.push_str(&format!(" {}=\"{}\"", MARKER, index));
        } else {
            marked.push_str(&format!(" {}=\"{}\"", MARKER, UNTERMINATED));
        }
        last = at;
    }
    marked.push_str(&page[last..]);

    Html::parse_document(&marked)
}

/// Properly closed anchors carrying an `href`, in document order. Text is every
/// descendant text node concatenated, so nested markup is already gone.
pub fn anchors(document: &Html) -> impl Iterator<Item = Anchor> {
    let mut found: Vec<Anchor> = Vec::new();
    let mut by_index: HashMap<usize, usize> = HashMap::new();

    for element in document.select(anchor_selector()) {
        let Some(index) = element
            .value()
            .attr(MARKER)
            .and_then(|v| v.parse::<usize>().ok())
        else {
            continue;
        };
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let text: String = element.text().collect();
        match by_index.get(&index) {
            Some(&pos) => found[pos].text.push_str(&text),
            None => {
                by_index.insert(index, found.len());
                found.push(Anchor {
                    href: href.to_string(),
                    text,
                });
            }
        }
    }

    found.into_iter()
}
