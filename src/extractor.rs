//! Field extraction from wiki entry pages
//!
//! Pulls three independent fields out of an entry page:
//! - Category: the `span.explain` caption in the infobox ("Stag Beetle")
//! - Index: the number next to the "List of Pokémon by National Pokédex number" link
//! - Native name: the first kana run in the infobox or page heading
//!
//! Every lookup is best-effort. A field that cannot be found comes back as
//! `None` (or `IndexNumber::Unknown`) and never stops the others.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::record::{ExtractedRecord, IndexNumber};

/// Phrase that precedes the national index on every entry page
pub const INDEX_ANCHOR: &str = "List of Pokémon by National Pokédex number";

/// How many characters after the anchor phrase are searched for the index
const INDEX_WINDOW_CHARS: usize = 200;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

// Long-vowel mark, sound marks and the interpunct are Common script, not kana.
// A name never starts with the interpunct; gender signs and digits only continue one.
static KANA_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[\p{Hiragana}\p{Katakana}ー゛゜ｰﾞﾟ][\p{Hiragana}\p{Katakana}ー゛゜ｰﾞﾟ\x{3099}\x{309A}・♀♂0-9０-９]*",
    )
    .unwrap()
});

static CATEGORY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span.explain").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static INFOBOX_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("table.roundy").unwrap());
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#firstHeading, h1").unwrap());
static LANG_JA_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"[lang="ja"]"#).unwrap());

/// Strategy for turning an entry page into an [`ExtractedRecord`]
pub trait FieldExtractor: Send + Sync {
    fn extract(&self, html: &str) -> ExtractedRecord;
}

/// Extractor tuned to the current Bulbapedia entry page markup
#[derive(Debug, Default, Clone, Copy)]
pub struct WikiExtractor;

impl FieldExtractor for WikiExtractor {
    fn extract(&self, html: &str) -> ExtractedRecord {
        extract(html)
    }
}

/// Extract category, native name and index from raw page HTML
pub fn extract(html: &str) -> ExtractedRecord {
    // Decomposed accents would otherwise miss the anchor phrase
    let normalized: String = html.nfc().collect();
    let document = Html::parse_document(&normalized);

    ExtractedRecord {
        category: extract_category(&document),
        native_name: extract_native_name(&document),
        index: extract_index(&document),
    }
}

/// First non-Japanese `span.explain` caption, trimmed
pub fn extract_category(document: &Html) -> Option<String> {
    for element in document.select(&CATEGORY_SELECTOR) {
        let text = element.text().collect::<String>().trim().to_string();
        if text.is_empty() {
            continue;
        }
        // The Japanese category caption carries the same class
        if contains_japanese(&text) {
            debug!("Skipping Japanese category caption: {}", text);
            continue;
        }
        debug!("Found category via span.explain: {}", text);
        return Some(text);
    }

    debug!("No category caption found");
    None
}

/// National index, found next to the index-list anchor
pub fn extract_index(document: &Html) -> IndexNumber {
    if let Some(index) = index_from_anchor_link(document) {
        debug!("Found index via anchor link: {}", index);
        return index;
    }

    if let Some(index) = index_from_document_text(document) {
        debug!("Found index via document text: {}", index);
        return index;
    }

    debug!("No index found after anchor phrase");
    IndexNumber::Unknown
}

/// Links titled (or pointing at) the index list carry the number as their text
fn index_from_anchor_link(document: &Html) -> Option<IndexNumber> {
    for link in document.select(&LINK_SELECTOR) {
        if !link_targets_index_list(&link) {
            continue;
        }

        let link_text = link.text().collect::<String>();
        if let Some(index) = first_index_token(&link_text) {
            return Some(index);
        }

        let small = link
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "small");
        if let Some(small) = small {
            let small_text = small.text().collect::<String>();
            if let Some(index) = first_index_token(&small_text) {
                return Some(index);
            }
        }
    }
    None
}

fn link_targets_index_list(link: &ElementRef) -> bool {
    if let Some(title) = link.value().attr("title") {
        if collapse_whitespace(&title.nfc().collect::<String>()).contains(INDEX_ANCHOR) {
            return true;
        }
    }

    if let Some(href) = link.value().attr("href") {
        if let Ok(decoded) = urlencoding::decode(href) {
            let readable: String = decoded.replace('_', " ").nfc().collect();
            if readable.contains(INDEX_ANCHOR) {
                return true;
            }
        }
    }

    false
}

/// Anchor phrase in the page text followed by a number within the window
fn index_from_document_text(document: &Html) -> Option<IndexNumber> {
    let text = collapse_whitespace(&document.root_element().text().collect::<String>());
    let start = text.find(INDEX_ANCHOR)? + INDEX_ANCHOR.len();
    let window: String = text[start..].chars().take(INDEX_WINDOW_CHARS).collect();
    first_index_token(&window)
}

/// First run of exactly 3 or 4 ASCII digits
fn first_index_token(text: &str) -> Option<IndexNumber> {
    DIGIT_RUN
        .find_iter(text)
        .find_map(|m| IndexNumber::from_token(m.as_str()))
}

/// First kana run in the infobox, heading, or Japanese-tagged elements
pub fn extract_native_name(document: &Html) -> Option<String> {
    if let Some(infobox) = document.select(&INFOBOX_SELECTOR).next() {
        // Explicitly tagged Japanese text inside the infobox is the best source
        for tagged in infobox.select(&LANG_JA_SELECTOR) {
            if let Some(name) = first_kana_run(&node_text(&tagged)) {
                debug!("Found native name via infobox lang=ja: {}", name);
                return Some(name);
            }
        }

        // The Japanese category caption also lives in the infobox
        if let Some(name) = first_kana_run(&text_outside(&infobox, &CATEGORY_SELECTOR)) {
            debug!("Found native name via infobox text: {}", name);
            return Some(name);
        }
    }

    for heading in document.select(&HEADING_SELECTOR) {
        if let Some(name) = first_kana_run(&node_text(&heading)) {
            debug!("Found native name via heading: {}", name);
            return Some(name);
        }
    }

    for tagged in document.select(&LANG_JA_SELECTOR) {
        if let Some(name) = first_kana_run(&node_text(&tagged)) {
            debug!("Found native name via lang=ja element: {}", name);
            return Some(name);
        }
    }

    debug!("No native name found");
    None
}

/// Text nodes of `element` separated by spaces, so a number in the next
/// element never runs into a name
fn node_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Like [`node_text`], with any subtree matching `skip` left out
fn text_outside(element: &ElementRef, skip: &Selector) -> String {
    let skipped: HashSet<_> = element.select(skip).map(|el| el.id()).collect();

    element
        .descendants()
        .filter(|node| !node.ancestors().any(|ancestor| skipped.contains(&ancestor.id())))
        .filter_map(|node| node.value().as_text().map(|text| &**text))
        .collect::<Vec<&str>>()
        .join(" ")
}

/// First kana run (ニドラン♀, ポリゴン2) with trailing interpuncts dropped
fn first_kana_run(text: &str) -> Option<String> {
    let run = KANA_RUN.find(text)?.as_str().trim_end_matches('・');
    Some(run.to_string())
}

fn contains_japanese(text: &str) -> bool {
    text.chars().any(|c| c as u32 >= 0x3000)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
