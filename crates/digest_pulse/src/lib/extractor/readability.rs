//! Main-content extraction from raw markup.
//!
//! Candidate containers are scored by their non-link text density, with
//! bonuses for `article`/`main` and a penalty for link-heavy blocks. When no
//! candidate qualifies, a selector-based manual pass takes over.

use std::sync::LazyLock;

use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};

static NOISE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script, style, nav, footer, iframe, noscript").unwrap());
static MANUAL_NOISE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("aside, header, .ad, .advertisement, .cookie-banner").unwrap()
});
static ADS: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".ad").unwrap());
static CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article, main, section, div, td").unwrap());
static BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p, h1, h2, h3, h4, h5, h6, li, pre, blockquote").unwrap()
});
static MANUAL_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article, main, .content, .post-content, #content").unwrap()
});
static MANUAL_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, h1, h2, h3, h4").unwrap());
static LINKS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());

const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "pre", "blockquote",
];

/// class/id words that mark a container as page chrome
const BOILERPLATE_WORDS: &[&str] = &[
    "nav", "navbar", "menu", "sidebar", "footer", "header", "banner", "cookie", "consent",
    "ads", "advert", "promo", "subscribe", "newsletter", "comment",
];

/// Structural elements never detached as boilerplate, whatever their class
const STRUCTURAL_TAGS: &[&str] = &["html", "body", "article", "main"];

/// Candidates with less text than this are not scored
const MIN_CANDIDATE_CHARS: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readable {
    pub text: String,
    pub title: Option<String>,
}

/// Extracts the readable text and title of a page.
///
/// `literal` skips the scoring heuristic and keeps the whole body text, for
/// pages whose structure is the content (profiles, job posts).
pub fn extract_readable(html: &str, literal: bool) -> Readable {
    let mut document = Html::parse_document(html);
    let title = page_title(&document);

    strip(&mut document, &NOISE);

    let raw = if literal {
        strip(&mut document, &ADS);
        body_text(&document)
    } else {
        strip_boilerplate(&mut document);
        match pick_main_text(&document) {
            Some(text) => text,
            None => {
                tracing::debug!("No scored candidate, using manual extraction");
                manual_text(&mut document)
            }
        }
    };

    Readable {
        text: normalize_whitespace(&raw),
        title,
    }
}

/// Collapses horizontal whitespace on each line, squeezes runs of blank lines
/// into one and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_blank = false;

    for line in text.lines().map(|l| l.split_whitespace().join(" ")) {
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push_str(if pending_blank { "\n\n" } else { "\n" });
        }
        out.push_str(&line);
        pending_blank = false;
    }

    out
}

fn page_title(document: &Html) -> Option<String> {
    let og = document
        .select(&OG_TITLE)
        .filter_map(|m| m.value().attr("content"))
        .map(|t| t.split_whitespace().join(" "))
        .find(|t| !t.is_empty());

    og.or_else(|| {
        document
            .select(&TITLE)
            .next()
            .map(|t| t.text().collect::<String>().split_whitespace().join(" "))
            .filter(|t| !t.is_empty())
    })
}

fn strip(document: &mut Html, selector: &Selector) {
    let ids = document.select(selector).map(|e| e.id()).collect::<Vec<_>>();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Detaches page chrome marked by class or id (comments, sidebars, promos)
/// so no enclosing candidate can score or emit its text
fn strip_boilerplate(document: &mut Html) {
    let ids = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| !STRUCTURAL_TAGS.contains(&el.value().name()) && is_boilerplate(el))
        .map(|el| el.id())
        .collect::<Vec<_>>();

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Matches class/id tokens (split on whitespace, `-` and `_`) that start with
/// a boilerplate word, so `comments` and `top-nav` match but `headline` does not
fn is_boilerplate(el: &ElementRef) -> bool {
    let value = el.value();
    let marker = format!(
        "{} {}",
        value.attr("class").unwrap_or_default(),
        value.attr("id").unwrap_or_default()
    )
    .to_ascii_lowercase();

    marker
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|token| !token.is_empty())
        .any(|token| BOILERPLATE_WORDS.iter().any(|w| token.starts_with(w)))
}

fn text_chars(el: &ElementRef) -> usize {
    el.text().map(|t| t.trim().chars().count()).sum()
}

fn link_text_chars(el: &ElementRef) -> usize {
    el.select(&LINKS).map(|a| text_chars(&a)).sum()
}

fn score(el: &ElementRef) -> Option<i64> {
    if is_boilerplate(el) {
        return None;
    }
    let text = text_chars(el);
    if text < MIN_CANDIDATE_CHARS {
        return None;
    }
    let links = link_text_chars(el);

    let mut score = text as i64 - 2 * links as i64;
    match el.value().name() {
        "article" => score += 500,
        "main" => score += 300,
        _ => {}
    }
    if links > text / 2 {
        score -= 500;
    }
    Some(score)
}

fn pick_main_text(document: &Html) -> Option<String> {
    let (best, _) = document
        .select(&CANDIDATES)
        .filter_map(|el| score(&el).map(|s| (el, s)))
        .filter(|(_, s)| *s > 0)
        // first candidate wins ties, so outer containers beat equal inner ones
        .fold(None, |best: Option<(ElementRef, i64)>, (el, s)| match best {
            Some((_, top)) if top >= s => best,
            _ => Some((el, s)),
        })?;

    let text = block_text(&best);
    (!text.is_empty()).then_some(text)
}

/// Joins the text of block-level descendants with blank lines. Blocks nested in
/// other blocks are skipped so their text is not repeated. Falls back to the
/// container's flat text when it has no block children.
fn block_text(container: &ElementRef) -> String {
    let blocks = container
        .select(&BLOCKS)
        .filter(|block| !has_block_ancestor(block, container))
        .map(|block| block.text().join(" ").split_whitespace().join(" "))
        .filter(|t| !t.is_empty())
        .join("\n\n");

    if blocks.is_empty() {
        container.text().join(" ").split_whitespace().join(" ")
    } else {
        blocks
    }
}

fn has_block_ancestor(block: &ElementRef, container: &ElementRef) -> bool {
    block
        .ancestors()
        .take_while(|node| node.id() != container.id())
        .filter_map(|node| node.value().as_element().map(|e| e.name()))
        .any(|name| BLOCK_TAGS.contains(&name))
}

fn manual_text(document: &mut Html) -> String {
    strip(document, &MANUAL_NOISE);

    let container = document
        .select(&MANUAL_CONTAINER)
        .next()
        .or_else(|| document.select(&BODY).next());

    let Some(container) = container else {
        return String::new();
    };

    let blocks = container
        .select(&MANUAL_BLOCKS)
        .map(|block| block.text().join(" ").split_whitespace().join(" "))
        .filter(|t| !t.is_empty())
        .join("\n\n");

    if blocks.is_empty() {
        container.text().join(" ")
    } else {
        blocks
    }
}

fn body_text(document: &Html) -> String {
    document
        .select(&BODY)
        .next()
        .map(|body| {
            body.text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .join("\n")
        })
        .unwrap_or_default()
}
