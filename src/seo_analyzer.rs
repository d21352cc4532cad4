use crate::html::ContentStats;
use crate::models::{
    AnalysisResult, Check, CheckOutcome, Issue, IssueCategory, PageData, PageMetrics, Priority,
    Severity, Suggestion,
};
use crate::schema::{self, Requirement};

const TITLE_MIN_CHARS: usize = 30;
const TITLE_MAX_CHARS: usize = 60;
const DESCRIPTION_MIN_CHARS: usize = 120;
const DESCRIPTION_MAX_CHARS: usize = 160;
const MIN_WORD_COUNT: usize = 300;
const LOAD_TIME_BUDGET_MS: u64 = 3000;

// Page weight model used for the load time estimate
const LEGACY_IMAGE_KB: f64 = 80.0;
const MODERN_IMAGE_KB: f64 = 40.0;
const BASE_LATENCY_MS: f64 = 200.0;
const MS_PER_KB: f64 = 2.0;

const MODERN_IMAGE_EXTENSIONS: [&str; 2] = [".webp", ".avif"];
const GENERIC_LINK_TEXT: [&str; 7] = [
    "click here",
    "here",
    "read more",
    "more",
    "link",
    "learn more",
    "this",
];

/// Issues, suggestions and check outcomes produced by one analyzer pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub issues: Vec<Issue>,
    pub suggestions: Vec<Suggestion>,
    pub checks: Vec<CheckOutcome>,
}

impl Findings {
    fn record(&mut self, check: Check, passed: bool) {
        self.checks.push(CheckOutcome { check, passed });
    }

    fn pass(&mut self, check: Check) {
        self.record(check, true);
    }

    fn fail(&mut self, check: Check) {
        self.record(check, false);
    }

    fn issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    fn suggest(&mut self, suggestion: Suggestion) {
        self.suggestions.push(suggestion);
    }

    fn has_recorded(&self, check: Check) -> bool {
        self.checks.iter().any(|outcome| outcome.check == check)
    }

    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|outcome| outcome.passed).count()
    }

    fn extend(&mut self, other: Findings) {
        self.issues.extend(other.issues);
        self.suggestions.extend(other.suggestions);
        self.checks.extend(other.checks);
    }
}

pub struct SeoAnalyzer;

impl SeoAnalyzer {
    /// Runs every analyzer over the page and aggregates the outcome into a score
    pub fn analyze(page: &PageData) -> AnalysisResult {
        let stats = non_empty(&page.content).map(ContentStats::from_html);
        let metrics = Self::compute_metrics(page, stats.as_ref());

        let mut findings = Findings::default();
        findings.extend(Self::analyze_meta(page));
        findings.extend(Self::analyze_content(page, stats.as_ref()));
        findings.extend(Self::analyze_images(page));
        findings.extend(Self::analyze_schema(page));
        findings.extend(Self::analyze_links(page));
        findings.extend(Self::analyze_performance(&metrics, stats.is_some()));

        let result = Self::aggregate(findings, metrics);
        tracing::debug!(
            score = result.score,
            passed = result.passed,
            total = result.total,
            issues = result.issues.len(),
            suggestions = result.suggestions.len(),
            "page analyzed"
        );
        result
    }

    /// Purely arithmetic: the score is the share of passed checks in the registry
    pub fn aggregate(findings: Findings, metrics: PageMetrics) -> AnalysisResult {
        let total = Check::ALL.len();
        let passed = findings.passed();
        debug_assert!(
            passed <= total,
            "{} passed checks recorded for a registry of {}",
            passed,
            total
        );
        let passed = passed.min(total);
        let score = (passed as f64 / total as f64 * 100.0).round() as u8;

        AnalysisResult {
            score,
            passed,
            total,
            issues: findings.issues,
            suggestions: findings.suggestions,
            checks: findings.checks,
            metrics,
        }
    }

    pub fn analyze_meta(page: &PageData) -> Findings {
        let mut findings = Findings::default();

        // Title
        match non_empty(&page.title) {
            None => {
                findings.issue(
                    Issue::new(
                        Severity::Critical,
                        IssueCategory::Meta,
                        "Page is missing a title tag",
                    )
                    .with_fix("Add a descriptive title of 50-60 characters"),
                );
                findings.fail(Check::TitlePresent);
                findings.fail(Check::TitleLength);
            }
            Some(title) => {
                findings.pass(Check::TitlePresent);
                let length = title.chars().count();
                if length < TITLE_MIN_CHARS {
                    findings.issue(
                        Issue::new(
                            Severity::Warning,
                            IssueCategory::Meta,
                            format!("Title is too short ({} chars, recommended: 50-60)", length),
                        )
                        .with_fix("Expand the title to 50-60 characters"),
                    );
                    findings.fail(Check::TitleLength);
                } else if length > TITLE_MAX_CHARS {
                    findings.issue(
                        Issue::new(
                            Severity::Warning,
                            IssueCategory::Meta,
                            format!("Title is too long ({} chars, recommended: 50-60)", length),
                        )
                        .with_fix("Shorten the title to 60 characters or fewer"),
                    );
                    findings.fail(Check::TitleLength);
                } else {
                    findings.pass(Check::TitleLength);
                }
            }
        }

        // Meta description
        match non_empty(&page.meta_description) {
            None => {
                findings.issue(
                    Issue::new(
                        Severity::Critical,
                        IssueCategory::Meta,
                        "Page is missing a meta description",
                    )
                    .with_fix("Add a meta description of 150-160 characters"),
                );
                findings.fail(Check::DescriptionPresent);
                findings.fail(Check::DescriptionLength);
            }
            Some(description) => {
                findings.pass(Check::DescriptionPresent);
                let length = description.chars().count();
                if length < DESCRIPTION_MIN_CHARS {
                    findings.issue(
                        Issue::new(
                            Severity::Warning,
                            IssueCategory::Meta,
                            format!(
                                "Meta description is too short ({} chars, recommended: 150-160)",
                                length
                            ),
                        )
                        .with_fix("Expand the meta description to 150-160 characters"),
                    );
                    findings.fail(Check::DescriptionLength);
                } else if length > DESCRIPTION_MAX_CHARS {
                    findings.issue(
                        Issue::new(
                            Severity::Warning,
                            IssueCategory::Meta,
                            format!(
                                "Meta description is too long ({} chars, recommended: 150-160)",
                                length
                            ),
                        )
                        .with_fix("Shorten the meta description to 160 characters or fewer"),
                    );
                    findings.fail(Check::DescriptionLength);
                } else {
                    findings.pass(Check::DescriptionLength);
                }
            }
        }

        if focus_keywords(page).next().is_some() {
            findings.pass(Check::KeywordsPresent);
        } else {
            findings.suggest(Suggestion::new(
                Priority::Medium,
                "meta",
                "Add focus keywords for this page",
                "Keywords keep the title, description and content aligned with search intent",
            ));
            findings.fail(Check::KeywordsPresent);
        }

        if non_empty(&page.canonical_url).is_some() {
            findings.pass(Check::CanonicalPresent);
        } else {
            findings.issue(
                Issue::new(
                    Severity::Warning,
                    IssueCategory::Meta,
                    "Page is missing a canonical URL",
                )
                .with_fix("Add a canonical URL to prevent duplicate content"),
            );
            findings.fail(Check::CanonicalPresent);
        }

        if non_empty(&page.og_image).is_some() {
            findings.pass(Check::OgImagePresent);
        } else {
            findings.suggest(Suggestion::new(
                Priority::High,
                "meta",
                "Add an Open Graph image (recommended size: 1200x630)",
                "Links with a preview image get noticeably more clicks when shared",
            ));
            findings.fail(Check::OgImagePresent);
        }

        findings
    }

    /// `stats` is `None` when the page has no content; every content check then fails.
    pub fn analyze_content(page: &PageData, stats: Option<&ContentStats>) -> Findings {
        let mut findings = Findings::default();

        let (Some(content), Some(stats)) = (non_empty(&page.content), stats) else {
            findings.issue(
                Issue::new(Severity::Critical, IssueCategory::Content, "Page has no content")
                    .with_fix("Add at least 300 words of useful content"),
            );
            findings.fail(Check::WordCount);
            findings.fail(Check::SingleH1);
            findings.fail(Check::Subheadings);
            findings.fail(Check::KeywordInContent);
            return findings;
        };

        if stats.word_count < MIN_WORD_COUNT {
            findings.issue(
                Issue::new(
                    Severity::Warning,
                    IssueCategory::Content,
                    format!(
                        "Content is too thin ({} words, recommended: 300+)",
                        stats.word_count
                    ),
                )
                .with_fix("Expand the content to at least 300 words"),
            );
            findings.fail(Check::WordCount);
        } else {
            findings.pass(Check::WordCount);
        }

        match stats.h1_count {
            0 => {
                findings.issue(
                    Issue::new(
                        Severity::Critical,
                        IssueCategory::Content,
                        "Page is missing an H1 heading",
                    )
                    .with_fix("Add a single H1 heading that describes the page"),
                );
                findings.fail(Check::SingleH1);
            }
            1 => findings.pass(Check::SingleH1),
            count => {
                findings.issue(
                    Issue::new(
                        Severity::Warning,
                        IssueCategory::Content,
                        format!("Page has multiple H1 headings ({})", count),
                    )
                    .with_fix("Use only one H1 per page"),
                );
                findings.fail(Check::SingleH1);
            }
        }

        if stats.subheading_count > 0 {
            findings.pass(Check::Subheadings);
        } else {
            findings.suggest(Suggestion::new(
                Priority::Medium,
                "content",
                "Add H2-H6 subheadings to structure the content",
                "Subheadings make content scannable for readers and crawlers",
            ));
            findings.fail(Check::Subheadings);
        }

        let keywords: Vec<String> = focus_keywords(page).map(str::to_lowercase).collect();
        if keywords.is_empty() {
            findings.fail(Check::KeywordInContent);
        } else {
            let content = content.to_lowercase();
            if keywords.iter().any(|keyword| content.contains(keyword.as_str())) {
                findings.pass(Check::KeywordInContent);
            } else {
                findings.issue(
                    Issue::new(
                        Severity::Warning,
                        IssueCategory::Content,
                        "None of the focus keywords appear in the content",
                    )
                    .with_fix("Use your main keyword naturally in the content"),
                );
                findings.fail(Check::KeywordInContent);
            }
        }

        findings
    }

    pub fn analyze_images(page: &PageData) -> Findings {
        let mut findings = Findings::default();

        if page.images.is_empty() {
            findings.suggest(Suggestion::new(
                Priority::Low,
                "images",
                "Add relevant images to the page",
                "Images increase engagement and can rank in image search",
            ));
            findings.fail(Check::ImageAltText);
            findings.fail(Check::ModernImageFormats);
            return findings;
        }

        let missing_alt = page
            .images
            .iter()
            .filter(|image| non_empty(&image.alt).is_none())
            .count();
        if missing_alt > 0 {
            findings.issue(
                Issue::new(
                    Severity::Warning,
                    IssueCategory::Images,
                    format!("{} image(s) missing alt text", missing_alt),
                )
                .with_fix("Describe every image in its alt attribute"),
            );
            findings.fail(Check::ImageAltText);
        } else {
            findings.pass(Check::ImageAltText);
        }

        let legacy = page
            .images
            .iter()
            .filter(|image| !is_modern_format(&image.src))
            .count();
        if legacy > 0 {
            findings.suggest(Suggestion::new(
                Priority::High,
                "images",
                format!("Convert {} image(s) to WebP or AVIF", legacy),
                "Modern formats are typically 25-35% smaller and load faster",
            ));
            findings.fail(Check::ModernImageFormats);
        } else {
            findings.pass(Check::ModernImageFormats);
        }

        findings
    }

    /// Evaluates the shared per-type rule table against the page's JSON-LD
    pub fn analyze_schema(page: &PageData) -> Findings {
        let mut findings = Findings::default();

        match &page.structured_data {
            None => {
                findings.suggest(Suggestion::new(
                    Priority::High,
                    "schema",
                    "Add JSON-LD structured data",
                    "Structured data makes the page eligible for rich results",
                ));
            }
            Some(data) if schema::schema_types(data).is_empty() => {
                findings.issue(
                    Issue::new(
                        Severity::Critical,
                        IssueCategory::Schema,
                        "Structured data is missing the \"@type\" property",
                    )
                    .with_fix("Set \"@type\" to a Schema.org type such as Product"),
                );
            }
            Some(data) => {
                findings.pass(Check::SchemaType);
                for finding in schema::evaluate_rules(data) {
                    if let Some(check) = finding.rule.check {
                        findings.record(check, finding.satisfied);
                    }
                    if finding.satisfied {
                        continue;
                    }
                    match finding.rule.requirement {
                        Requirement::Required {
                            severity,
                            message,
                            fix,
                        } => findings
                            .issue(Issue::new(severity, IssueCategory::Schema, message).with_fix(fix)),
                        Requirement::Recommended {
                            priority,
                            message,
                            impact,
                        } => findings.suggest(Suggestion::new(priority, "schema", message, impact)),
                    }
                }
            }
        }

        // Type-specific checks the schema did not reach count as failed
        for check in Check::ALL {
            if check.category() == IssueCategory::Schema && !findings.has_recorded(check) {
                findings.fail(check);
            }
        }

        findings
    }

    pub fn analyze_links(page: &PageData) -> Findings {
        let mut findings = Findings::default();

        if page.links.is_empty() {
            findings.suggest(Suggestion::new(
                Priority::Low,
                "links",
                "Add internal links to related pages",
                "Internal links spread ranking signals and help crawlers discover pages",
            ));
            findings.fail(Check::HasLinks);
            findings.fail(Check::DescriptiveLinkText);
            return findings;
        }

        findings.pass(Check::HasLinks);

        let generic = page
            .links
            .iter()
            .filter(|link| {
                let text = link.text.trim().to_lowercase();
                text.is_empty() || GENERIC_LINK_TEXT.contains(&text.as_str())
            })
            .count();
        if generic > 0 {
            findings.issue(
                Issue::new(
                    Severity::Warning,
                    IssueCategory::Content,
                    format!("{} link(s) use empty or generic anchor text", generic),
                )
                .with_fix("Describe the destination, e.g. \"View pricing plans\" instead of \"click here\""),
            );
            findings.fail(Check::DescriptiveLinkText);
        } else {
            findings.pass(Check::DescriptiveLinkText);
        }

        findings
    }

    /// A page without content has nothing to time; its absence is reported by the content analyzer.
    pub fn analyze_performance(metrics: &PageMetrics, has_content: bool) -> Findings {
        let mut findings = Findings::default();

        if !has_content {
            findings.fail(Check::LoadTime);
            return findings;
        }

        if metrics.estimated_load_time_ms > LOAD_TIME_BUDGET_MS {
            findings.issue(
                Issue::new(
                    Severity::Warning,
                    IssueCategory::Performance,
                    format!(
                        "Estimated load time is {:.1}s (recommended: under 3s)",
                        metrics.estimated_load_time_ms as f64 / 1000.0
                    ),
                )
                .with_fix("Compress images and reduce page weight"),
            );
            findings.fail(Check::LoadTime);
        } else {
            findings.pass(Check::LoadTime);
        }

        findings
    }

    pub fn compute_metrics(page: &PageData, stats: Option<&ContentStats>) -> PageMetrics {
        let stats = stats.copied().unwrap_or_default();
        let content_kb = page.content.as_deref().map_or(0, str::len) as f64 / 1024.0;
        let images_kb: f64 = page
            .images
            .iter()
            .map(|image| {
                if is_modern_format(&image.src) {
                    MODERN_IMAGE_KB
                } else {
                    LEGACY_IMAGE_KB
                }
            })
            .sum();
        let size_kb = content_kb + images_kb;

        PageMetrics {
            has_title: non_empty(&page.title).is_some(),
            title_length: page.title.as_deref().map_or(0, |t| t.chars().count()),
            has_meta_description: non_empty(&page.meta_description).is_some(),
            meta_description_length: page
                .meta_description
                .as_deref()
                .map_or(0, |d| d.chars().count()),
            keyword_count: focus_keywords(page).count(),
            has_canonical: non_empty(&page.canonical_url).is_some(),
            has_og_image: non_empty(&page.og_image).is_some(),
            word_count: stats.word_count,
            h1_count: stats.h1_count,
            subheading_count: stats.subheading_count,
            image_count: page.images.len(),
            images_missing_alt: page
                .images
                .iter()
                .filter(|image| non_empty(&image.alt).is_none())
                .count(),
            link_count: page.links.len(),
            schema_types: page
                .structured_data
                .as_ref()
                .map(schema::schema_types)
                .unwrap_or_default(),
            estimated_page_size_kb: (size_kb * 10.0).round() / 10.0,
            estimated_load_time_ms: (BASE_LATENCY_MS + size_kb * MS_PER_KB).round() as u64,
        }
    }
}

/// Analyzes a page and returns its score, issues, suggestions and metrics
pub fn analyze_seo(page: &PageData) -> AnalysisResult {
    SeoAnalyzer::analyze(page)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

fn focus_keywords(page: &PageData) -> impl Iterator<Item = &str> {
    page.keywords
        .iter()
        .map(|keyword| keyword.trim())
        .filter(|keyword| !keyword.is_empty())
}

/// Ignores query strings and fragments, e.g. `hero.webp?w=640`
pub(crate) fn is_modern_format(src: &str) -> bool {
    let path = src.split(['?', '#']).next().unwrap_or(src).to_lowercase();
    MODERN_IMAGE_EXTENSIONS
        .iter()
        .any(|extension| path.ends_with(extension))
}
