//! Regex tag scanning over raw page text.
//!
//! An anchor only counts when its opening tag is followed by a closing
//! `</a>` before any other `<a` opens; an unterminated anchor produces
//! nothing rather than swallowing the next one.

use html_escape::decode_html_entities;
use regex::Regex;
use std::sync::OnceLock;

use super::Anchor;

fn open_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<a\b([^>]*)>").expect("open tag pattern"))
}

fn close_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</a\s*>").expect("close tag pattern"))
}

fn href_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)(?:^|\s)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("href pattern")
    })
}

fn any_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern"))
}

/// An `<a ...>` opening tag and whether it is properly closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenTag {
    pub start: usize,
    pub terminated: bool,
}

/// Every `<a` opening tag in source order. A tag is terminated when a `</a>`
/// follows it before the next `<a` opens.
pub fn open_tags(page: &str) -> Vec<OpenTag> {
    let opens: Vec<_> = open_tag().find_iter(page).map(|m| (m.start(), m.end())).collect();
    let closes: Vec<usize> = close_tag().find_iter(page).map(|m| m.start()).collect();

    opens
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| {
            let next_open = opens.get(i + 1).map_or(page.len(), |&(s, _)| s);
            let first_close = closes.partition_point(|&c| c < end);
            let terminated = closes.get(first_close).is_some_and(|&c| c < next_open);
            OpenTag { start, terminated }
        })
        .collect()
}

/// Lazily yields anchors in document order.
pub fn anchors(page: &str) -> AnchorScan<'_> {
    AnchorScan { page, pos: 0 }
}

pub struct AnchorScan<'a> {
    page: &'a str,
    pos: usize,
}

impl Iterator for AnchorScan<'_> {
    type Item = Anchor;

    fn next(&mut self) -> Option<Anchor> {
        loop {
            let open = open_tag().captures_at(self.page, self.pos)?;
            let (body_start, attrs) = match (open.get(0), open.get(1)) {
                (Some(whole), Some(attrs)) => (whole.end(), attrs.as_str()),
                _ => return None,
            };

            // No closing tag anywhere after this point: nothing further can match.
            let close = close_tag().find_at(self.page, body_start)?;

            if let Some(next_open) = open_tag().find_at(self.page, body_start) {
                if next_open.start() < close.start() {
                    self.pos = next_open.start();
                    continue;
                }
            }

            self.pos = close.end();

            let Some(href) = href_value(attrs) else {
                continue;
            };

            let inner = &self.page[body_start..close.start()];
            return Some(Anchor {
                href: decode_html_entities(href).into_owned(),
                text: decode_html_entities(&strip_tags(inner)).into_owned(),
            });
        }
    }
}

fn href_value(attrs: &str) -> Option<&str> {
    let caps = href_attr().captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

fn strip_tags(html: &str) -> String {
    any_tag().replace_all(html, "").into_owned()
}
