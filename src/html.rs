use once_cell::sync::Lazy;
use scraper::{Html, Selector};

// Cached selectors, parsed once per process
static H1_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("h1 selector should be valid"));
static SUBHEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2, h3, h4, h5, h6").expect("subheading selector should be valid")
});

/// Structural statistics of a pre-rendered HTML fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub word_count: usize,
    pub h1_count: usize,
    pub subheading_count: usize,
}

impl ContentStats {
    /// Parses the fragment once and collects every statistic the analyzers need.
    pub fn from_html(content: &str) -> Self {
        let fragment = Html::parse_fragment(content);

        let word_count = fragment
            .root_element()
            .text()
            .flat_map(str::split_whitespace)
            .count();

        Self {
            word_count,
            h1_count: fragment.select(&H1_SELECTOR).count(),
            subheading_count: fragment.select(&SUBHEADING_SELECTOR).count(),
        }
    }
}

/// Counts words after stripping markup and collapsing whitespace
pub fn word_count(content: &str) -> usize {
    ContentStats::from_html(content).word_count
}
