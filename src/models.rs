use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// SEO-relevant metadata and pre-rendered content of a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageData {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub keywords: Vec<String>,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    /// Pre-rendered HTML of the page body
    pub content: Option<String>,
    pub images: Vec<ImageRef>,
    pub links: Vec<LinkRef>,
    /// Arbitrary JSON-LD object
    pub structured_data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRef {
    pub href: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Meta,
    Content,
    Images,
    Schema,
    Performance,
    Mobile,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueCategory::Meta => "meta",
            IssueCategory::Content => "content",
            IssueCategory::Images => "images",
            IssueCategory::Schema => "schema",
            IssueCategory::Performance => "performance",
            IssueCategory::Mobile => "mobile",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: IssueCategory,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl Issue {
    pub fn new(severity: Severity, category: IssueCategory, message: impl Into<String>) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub priority: Priority,
    pub category: String,
    pub message: String,
    pub impact: String,
}

impl Suggestion {
    pub fn new(
        priority: Priority,
        category: impl Into<String>,
        message: impl Into<String>,
        impact: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            category: category.into(),
            message: message.into(),
            impact: impact.into(),
        }
    }
}

/// Every check the analyzer evaluates. Each contributes exactly one pass or fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    TitlePresent,
    TitleLength,
    DescriptionPresent,
    DescriptionLength,
    KeywordsPresent,
    CanonicalPresent,
    OgImagePresent,
    WordCount,
    SingleH1,
    Subheadings,
    KeywordInContent,
    ImageAltText,
    ModernImageFormats,
    SchemaType,
    ProductName,
    ProductOffers,
    ProductReviews,
    HasLinks,
    DescriptiveLinkText,
    LoadTime,
}

impl Check {
    pub const ALL: [Check; 20] = [
        Check::TitlePresent,
        Check::TitleLength,
        Check::DescriptionPresent,
        Check::DescriptionLength,
        Check::KeywordsPresent,
        Check::CanonicalPresent,
        Check::OgImagePresent,
        Check::WordCount,
        Check::SingleH1,
        Check::Subheadings,
        Check::KeywordInContent,
        Check::ImageAltText,
        Check::ModernImageFormats,
        Check::SchemaType,
        Check::ProductName,
        Check::ProductOffers,
        Check::ProductReviews,
        Check::HasLinks,
        Check::DescriptiveLinkText,
        Check::LoadTime,
    ];

    pub fn category(&self) -> IssueCategory {
        match self {
            Check::TitlePresent
            | Check::TitleLength
            | Check::DescriptionPresent
            | Check::DescriptionLength
            | Check::KeywordsPresent
            | Check::CanonicalPresent
            | Check::OgImagePresent => IssueCategory::Meta,
            Check::WordCount
            | Check::SingleH1
            | Check::Subheadings
            | Check::KeywordInContent
            | Check::HasLinks
            | Check::DescriptiveLinkText => IssueCategory::Content,
            Check::ImageAltText | Check::ModernImageFormats => IssueCategory::Images,
            Check::SchemaType
            | Check::ProductName
            | Check::ProductOffers
            | Check::ProductReviews => IssueCategory::Schema,
            Check::LoadTime => IssueCategory::Performance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub check: Check,
    pub passed: bool,
}

/// Derived, read-only statistics about the analyzed page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    pub has_title: bool,
    pub title_length: usize,
    pub has_meta_description: bool,
    pub meta_description_length: usize,
    pub keyword_count: usize,
    pub has_canonical: bool,
    pub has_og_image: bool,
    pub word_count: usize,
    pub h1_count: usize,
    pub subheading_count: usize,
    pub image_count: usize,
    pub images_missing_alt: usize,
    pub link_count: usize,
    pub schema_types: Vec<String>,
    pub estimated_page_size_kb: f64,
    pub estimated_load_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u8,
    pub passed: usize,
    pub total: usize,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<Suggestion>,
    pub checks: Vec<CheckOutcome>,
    pub metrics: PageMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub url: String,
    pub changefreq: ChangeFrequency,
    pub priority: f64,
    pub lastmod: String,
}

/// Analysis of one page together with its supplementary suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub source: String,
    pub analysis: AnalysisResult,
    pub extra_suggestions: Vec<Suggestion>,
    pub summary: IssueSummary,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub critical: usize,
    pub warnings: usize,
    pub infos: usize,
    pub suggestions: usize,
}
