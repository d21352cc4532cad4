//! Supplementary improvement suggestions.
//!
//! A fixed, enumerable list of heuristic rules evaluated directly against the
//! page. Independent of the scoring analyzers and never produces issues.

use crate::html;
use crate::models::{PageData, Priority, Suggestion};
use crate::schema;
use serde::{Deserialize, Serialize};

const LONG_FORM_WORD_COUNT: usize = 1000;
const TITLE_HOOK_CHARS: [char; 3] = ['?', '!', ':'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionRule {
    TitleNumber,
    TitleHook,
    ExpandContent,
    FaqSection,
    ProductVideo,
    ProductBrand,
}

impl SuggestionRule {
    pub const ALL: [SuggestionRule; 6] = [
        SuggestionRule::TitleNumber,
        SuggestionRule::TitleHook,
        SuggestionRule::ExpandContent,
        SuggestionRule::FaqSection,
        SuggestionRule::ProductVideo,
        SuggestionRule::ProductBrand,
    ];

    pub fn applies(&self, page: &PageData) -> bool {
        let title = page.title.as_deref().filter(|t| !t.is_empty());
        let content = page.content.as_deref().filter(|c| !c.is_empty());
        let product = page
            .structured_data
            .as_ref()
            .filter(|data| schema::has_type(data, "Product"));

        match self {
            SuggestionRule::TitleNumber => {
                title.is_some_and(|t| !t.chars().any(|c| c.is_ascii_digit()))
            }
            SuggestionRule::TitleHook => title.is_some_and(|t| !t.contains(TITLE_HOOK_CHARS)),
            SuggestionRule::ExpandContent => {
                content.is_some_and(|c| html::word_count(c) < LONG_FORM_WORD_COUNT)
            }
            SuggestionRule::FaqSection => {
                content.is_some_and(|c| !c.to_lowercase().contains("frequently asked"))
            }
            SuggestionRule::ProductVideo => {
                product.is_some_and(|data| !schema::has_field(data, "video"))
            }
            SuggestionRule::ProductBrand => {
                product.is_some_and(|data| !schema::has_field(data, "brand"))
            }
        }
    }

    pub fn suggestion(&self) -> Suggestion {
        match self {
            SuggestionRule::TitleNumber => Suggestion::new(
                Priority::Medium,
                "title",
                "Add a number to the title, e.g. \"7 ways to...\"",
                "Titles with numbers tend to get more clicks",
            ),
            SuggestionRule::TitleHook => Suggestion::new(
                Priority::Low,
                "title",
                "Make the title more engaging with a question, exclamation or colon",
                "Emotional or structured titles stand out in search results",
            ),
            SuggestionRule::ExpandContent => Suggestion::new(
                Priority::High,
                "content",
                "Expand the content to 1000+ words for comprehensive coverage",
                "Long-form content tends to rank higher for competitive queries",
            ),
            SuggestionRule::FaqSection => Suggestion::new(
                Priority::Medium,
                "content",
                "Add a frequently asked questions section",
                "FAQ content can win featured snippets and FAQ rich results",
            ),
            SuggestionRule::ProductVideo => Suggestion::new(
                Priority::Medium,
                "schema",
                "Add a product \"video\" to the Product schema",
                "Video rich results increase engagement",
            ),
            SuggestionRule::ProductBrand => Suggestion::new(
                Priority::Low,
                "schema",
                "Add a \"brand\" to the Product schema",
                "Brand information improves product search visibility",
            ),
        }
    }
}

/// Rules that apply to the page, in rule order
pub fn matching_rules(page: &PageData) -> Vec<SuggestionRule> {
    SuggestionRule::ALL
        .into_iter()
        .filter(|rule| rule.applies(page))
        .collect()
}

pub fn generate_suggestions(page: &PageData) -> Vec<Suggestion> {
    let rules = matching_rules(page);
    tracing::debug!(rules = ?rules, "suggestion rules matched");
    rules.iter().map(SuggestionRule::suggestion).collect()
}
