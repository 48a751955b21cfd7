//! First-qualifying-link extraction from a Wikipedia article page.
//!
//! Implements the link policy of the "Getting to Philosophy" game: scan the
//! paragraphs of the main content region in document order and return the
//! first outbound article link that sits outside parentheses, outside
//! reference/pronunciation markup, and points at a real article rather than
//! a namespace page, a disambiguation page, or the page itself.
//!
//! Everything here is a pure function of the page HTML: no I/O, no shared
//! state, identical input gives identical output.

use crate::article::{ArticleRef, WIKIPEDIA_HOST};
use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use tracing::{debug, trace};
use url::Url;

static CONTENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#mw-content-text").unwrap());
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

static BASE_URL: Lazy<Url> =
    Lazy::new(|| Url::parse(&format!("https://{WIKIPEDIA_HOST}/")).unwrap());

/// Namespaces whose pages are never part of the game, plus the talk variant
/// of each. Compared against the percent-decoded title prefix before the
/// first `:`, spaces folded to underscores, ASCII case ignored.
static EXCLUDED_NAMESPACES: Lazy<HashSet<String>> = Lazy::new(|| {
    let bases = [
        "File",
        "Image",
        "Category",
        "Help",
        "Portal",
        "Special",
        "Template",
        "Wikipedia",
        "Draft",
        "User",
        "MediaWiki",
        "Module",
        "Gadget",
        "Media",
        "Topic",
    ];
    let mut set = HashSet::new();
    set.insert("talk".to_string());
    for base in bases {
        set.insert(base.to_ascii_lowercase());
        set.insert(format!("{}_talk", base.to_ascii_lowercase()));
    }
    set
});

/// Ancestor classes that mark a paragraph as navigation chrome rather than
/// article prose: infoboxes, hatnotes, navboxes, reference lists, tables of
/// contents, sidebars, thumbnails, metadata callouts.
const EXCLUDED_REGION_CLASSES: [&str; 9] = [
    "infobox",
    "hatnote",
    "navbox",
    "reflist",
    "toc",
    "sidebar",
    "thumb",
    "metadata",
    "mw-references-wrap",
];

/// Extract the first qualifying article link from a page.
///
/// `page` is the article the HTML belongs to, used to reject self-links.
/// Returns `None` when the content region is missing or no paragraph holds a
/// qualifying link; the caller treats that as a dead end, not an error.
pub fn first_qualifying_link(html: &str, page: &ArticleRef) -> Option<ArticleRef> {
    let document = Html::parse_document(html);
    let content = match document.select(&CONTENT_SELECTOR).next() {
        Some(content) => content,
        None => {
            debug!(%page, "No main content region on page");
            return None;
        }
    };

    for paragraph in content.select(&PARAGRAPH_SELECTOR) {
        if is_empty_paragraph(&paragraph) || in_excluded_region(&paragraph) {
            continue;
        }
        let mut depth = 0usize;
        if let Some(found) = scan_children(*paragraph, &mut depth, false, page) {
            debug!(%page, next = %found, "Extracted first qualifying link");
            return Some(found);
        }
    }

    debug!(%page, "No qualifying link in any paragraph");
    None
}

fn is_empty_paragraph(paragraph: &ElementRef) -> bool {
    paragraph.value().classes().any(|c| c == "mw-empty-elt")
}

/// A paragraph inside an infobox table, hatnote, navbox, reference list,
/// TOC, or sidebar is metadata, not article prose.
fn in_excluded_region(paragraph: &ElementRef) -> bool {
    paragraph
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| {
            let el = ancestor.value();
            el.name() == "table"
                || el.id().is_some_and(|id| id == "toc")
                || el
                    .classes()
                    .any(|c| EXCLUDED_REGION_CLASSES.contains(&c))
        })
}

/// Depth-first scan of a paragraph's inline content.
///
/// `depth` is the running parenthesis depth fed by every text node,
/// including text inside nested inline tags. `no_anchors` is set for the
/// subtrees of `<sup>` and `<span>` so reference markers and pronunciation
/// spans never yield a candidate, while their text still counts toward
/// `depth`.
fn scan_children(
    node: NodeRef<'_, Node>,
    depth: &mut usize,
    no_anchors: bool,
    page: &ArticleRef,
) -> Option<ArticleRef> {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                for c in text.chars() {
                    match c {
                        '(' => *depth += 1,
                        ')' => *depth = depth.saturating_sub(1),
                        _ => {}
                    }
                }
            }
            Node::Element(el) => {
                let name = el.name();
                let suppressed = no_anchors || name == "sup" || name == "span";
                if name == "a" && !suppressed && *depth == 0 {
                    if let Some(anchor) = ElementRef::wrap(child) {
                        if let Some(candidate) = qualify(anchor, page) {
                            return Some(candidate);
                        }
                        trace!(href = ?anchor.value().attr("href"), "Anchor did not qualify");
                    }
                }
                if let Some(found) = scan_children(child, depth, suppressed, page) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

/// Apply the qualification rules to one anchor element.
fn qualify(anchor: ElementRef<'_>, page: &ArticleRef) -> Option<ArticleRef> {
    let el = anchor.value();
    let href = el.attr("href")?;

    // Redlinks and disambiguation links are marked by class.
    if el.classes().any(|c| c == "new" || c == "mw-disambig") {
        return None;
    }

    let resolved = BASE_URL.join(href).ok()?;
    if resolved.fragment().is_some() {
        return None;
    }

    // Enforces host, /wiki/ path, and non-empty title in one place.
    let candidate = ArticleRef::parse(resolved.as_str()).ok()?;

    let title = urlencoding::decode(candidate.title()).ok()?;
    if let Some((namespace, _)) = title.split_once(':') {
        let key = namespace.trim().replace(' ', "_").to_ascii_lowercase();
        if EXCLUDED_NAMESPACES.contains(&key) {
            return None;
        }
    }
    if title.ends_with("(disambiguation)") {
        return None;
    }

    if candidate == *page {
        return None;
    }

    Some(candidate)
}
