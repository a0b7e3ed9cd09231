//! Extracted fields for one entry and the text block they are rendered into.

use std::fmt;

/// Placeholder for a text field the page did not yield
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing index
pub const UNKNOWN_INDEX: &str = "????";

/// National index of an entry, zero-padded to four digits when known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexNumber {
    Known(u16),
    Unknown,
}

impl IndexNumber {
    /// Parse a 3-4 digit token; anything else is rejected
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if !(3..=4).contains(&token.len()) || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        token.parse::<u16>().ok().map(IndexNumber::Known)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, IndexNumber::Known(_))
    }
}

impl fmt::Display for IndexNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexNumber::Known(n) => write!(f, "{:04}", n),
            IndexNumber::Unknown => f.write_str(UNKNOWN_INDEX),
        }
    }
}

/// Fields pulled out of a single entry page.
///
/// Each field is independent: a missing category does not prevent the
/// index or native name from being filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub category: Option<String>,
    pub native_name: Option<String>,
    pub index: IndexNumber,
}

impl Default for ExtractedRecord {
    fn default() -> Self {
        Self {
            category: None,
            native_name: None,
            index: IndexNumber::Unknown,
        }
    }
}

impl ExtractedRecord {
    pub fn category_or_unknown(&self) -> &str {
        self.category.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn native_name_or_unknown(&self) -> &str {
        self.native_name.as_deref().unwrap_or(UNKNOWN)
    }

    /// Number of fields that fell back to a placeholder
    pub fn missing_fields(&self) -> usize {
        [
            self.category.is_none(),
            self.native_name.is_none(),
            !self.index.is_known(),
        ]
        .iter()
        .filter(|missing| **missing)
        .count()
    }
}

/// Render the output block for a successfully fetched entry
pub fn format_entry(name: &str, record: &ExtractedRecord, url: &str) -> String {
    format!(
        "{name}\nURL: {url}\nFinal: {name}: {category} | {native} (Pokedex #{index})\n\n",
        name = name,
        url = url,
        category = record.category_or_unknown(),
        native = record.native_name_or_unknown(),
        index = record.index,
    )
}

/// Render the output block for an entry whose page could not be fetched
pub fn format_error(name: &str, reason: &str) -> String {
    format!("ERROR: could not fetch {}: {}\n\n", name, reason)
}
