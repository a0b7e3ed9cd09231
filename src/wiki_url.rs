/// Default wiki host used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://bulbapedia.bulbagarden.net";

/// Literal page-title qualifier appended to every entry slug
pub const PAGE_SUFFIX: &str = "_(Pok%C3%A9mon)";

/// Input names whose wiki slug or display form differs from the raw line.
/// Matched case-insensitively against the trimmed input.
const NAME_ALIASES: &[(&str, &str, &str)] = &[
    // (input, slug, display)
    ("mrmime", "Mr._Mime", "Mr. Mime"),
];

/// An entry name as read from the input file, with the forms derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryName {
    /// Trimmed input line
    pub input: String,
    /// Name printed in the output record
    pub display: String,
    /// Unencoded page slug (spaces already replaced by underscores)
    pub slug: String,
}

impl EntryName {
    pub fn new(raw: &str) -> Self {
        let input = raw.trim().to_string();

        if let Some((_, slug, display)) = NAME_ALIASES
            .iter()
            .find(|(alias, _, _)| alias.eq_ignore_ascii_case(&input))
        {
            return Self {
                input,
                display: display.to_string(),
                slug: slug.to_string(),
            };
        }

        Self {
            display: input.clone(),
            slug: input.replace(' ', "_"),
            input,
        }
    }

    /// Full page URL for this entry under `base_url`
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/wiki/{}{}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(&self.slug),
            PAGE_SUFFIX
        )
    }
}

/// Build the page URL for a raw entry name
pub fn entry_url(base_url: &str, name: &str) -> String {
    EntryName::new(name).url(base_url)
}
