//! Sitemap URL policy.
//!
//! Priority and change frequency come from ordered `(pattern, value)` tables
//! evaluated first-match-wins, so the policy can be audited and tested as data.

use crate::models::{ChangeFrequency, SitemapEntry};
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

pub const DEFAULT_PRIORITY: f64 = 0.5;
pub const DEFAULT_CHANGE_FREQUENCY: ChangeFrequency = ChangeFrequency::Monthly;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlPattern {
    /// `/` or the empty string
    Root,
    Exact(&'static [&'static str]),
    /// Last path segment is one of the names, with or without a trailing slash
    LastSegment(&'static [&'static str]),
    Contains(&'static [&'static str]),
}

impl UrlPattern {
    pub fn matches(&self, url: &str) -> bool {
        let path = strip_query(url);
        match self {
            UrlPattern::Root => path.is_empty() || path == "/",
            UrlPattern::Exact(paths) => paths.contains(&path),
            UrlPattern::LastSegment(names) => {
                let trimmed = path.trim_end_matches('/');
                names.iter().any(|name| {
                    trimmed
                        .strip_suffix(name)
                        .is_some_and(|head| head.ends_with('/'))
                })
            }
            UrlPattern::Contains(fragments) => {
                fragments.iter().any(|fragment| path.contains(fragment))
            }
        }
    }
}

pub static PRIORITY_RULES: &[(UrlPattern, f64)] = &[
    (UrlPattern::Root, 1.0),
    (
        UrlPattern::LastSegment(&["shop", "products", "courses", "pricing", "about", "contact"]),
        0.9,
    ),
    (UrlPattern::Contains(&["/category/", "/collection/", "/tag/"]), 0.8),
    (UrlPattern::Contains(&["/product/", "/course/", "/item/"]), 0.7),
    (UrlPattern::Contains(&["/blog/", "/news/", "/article/"]), 0.6),
    (UrlPattern::Contains(&["/docs/", "/help/", "/support/"]), 0.5),
];

pub static CHANGE_FREQUENCY_RULES: &[(UrlPattern, ChangeFrequency)] = &[
    (UrlPattern::Root, ChangeFrequency::Daily),
    (UrlPattern::Exact(&["/shop"]), ChangeFrequency::Daily),
    (
        UrlPattern::Contains(&["/product/", "/course/"]),
        ChangeFrequency::Weekly,
    ),
    (
        UrlPattern::Contains(&["/blog/", "/news/", "/docs/", "/help/"]),
        ChangeFrequency::Monthly,
    ),
    (
        UrlPattern::Contains(&["/about", "/privacy", "/terms"]),
        ChangeFrequency::Yearly,
    ),
];

const EXCLUDED_FRAGMENTS: [&str; 4] = ["/api/", "/admin/", "/private/", "?page="];

static AUTH_PAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/(login|signup|logout|auth)/?$").expect("auth page regex should be valid")
});
static NON_PAGE_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.(json|xml|txt|pdf|zip)$").expect("file extension regex should be valid")
});

fn first_match<T: Copy>(rules: &[(UrlPattern, T)], url: &str, default: T) -> T {
    let url = relative_url(url);
    rules
        .iter()
        .find(|(pattern, _)| pattern.matches(&url))
        .map_or(default, |(_, value)| *value)
}

pub fn url_priority(url: &str) -> f64 {
    first_match(PRIORITY_RULES, url, DEFAULT_PRIORITY)
}

pub fn change_frequency(url: &str) -> ChangeFrequency {
    first_match(CHANGE_FREQUENCY_RULES, url, DEFAULT_CHANGE_FREQUENCY)
}

/// Returns why a URL does not belong in the sitemap, if it doesn't
pub fn exclusion_reason(url: &str) -> Option<&'static str> {
    let url = relative_url(url);

    if let Some(fragment) = EXCLUDED_FRAGMENTS
        .iter()
        .find(|fragment| url.contains(*fragment))
    {
        return Some(match *fragment {
            "?page=" => "paginated listing",
            _ => "non-public section",
        });
    }
    if AUTH_PAGE.is_match(&url) {
        return Some("authentication page");
    }
    if NON_PAGE_FILE.is_match(&url) {
        return Some("non-HTML file");
    }
    None
}

pub fn filter_sitemap_urls<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    urls.iter()
        .map(|url| url.as_ref())
        .filter(|url| match exclusion_reason(url) {
            Some(reason) => {
                tracing::debug!(url = %url, reason, "excluding URL from sitemap");
                false
            }
            None => true,
        })
        .map(str::to_string)
        .collect()
}

/// Filters the URLs and builds entries stamped with today's UTC date
pub fn generate_sitemap_entries<S: AsRef<str>>(urls: &[S], base_url: &str) -> Vec<SitemapEntry> {
    generate_sitemap_entries_at(urls, base_url, Utc::now().date_naive())
}

pub fn generate_sitemap_entries_at<S: AsRef<str>>(
    urls: &[S],
    base_url: &str,
    lastmod: NaiveDate,
) -> Vec<SitemapEntry> {
    let lastmod = lastmod.format("%Y-%m-%d").to_string();

    let entries: Vec<SitemapEntry> = filter_sitemap_urls(urls)
        .into_iter()
        .map(|url| SitemapEntry {
            url: join_url(base_url, &url),
            changefreq: change_frequency(&url),
            priority: url_priority(&url),
            lastmod: lastmod.clone(),
        })
        .collect();

    tracing::info!(
        input = urls.len(),
        entries = entries.len(),
        "sitemap entries generated"
    );
    entries
}

/// Renders entries as a sitemaps.org `urlset` document
pub fn render_sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.url)));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape_xml(&entry.lastmod)));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.changefreq));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn join_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{}{}", base, url)
    } else {
        format!("{}/{}", base, url)
    }
}

/// Absolute URLs are reduced to path and query so the tables only ever see site-relative paths
fn relative_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        _ => url.to_string(),
    }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_segment_requires_whole_segment() {
        let pattern = UrlPattern::LastSegment(&["shop"]);
        assert!(pattern.matches("/shop"));
        assert!(pattern.matches("/en/shop/"));
        assert!(!pattern.matches("/workshop"));
        assert!(!pattern.matches("/shop/item"));
    }

    #[test]
    fn test_absolute_urls_are_matched_by_path() {
        assert_eq!(url_priority("https://example.com/"), 1.0);
        assert_eq!(url_priority("https://example.com/blog/post"), 0.6);
        assert!(exclusion_reason("https://example.com/api/users").is_some());
    }

    #[test]
    fn test_join_url_trims_base_slash() {
        assert_eq!(join_url("https://x.com/", "/about"), "https://x.com/about");
        assert_eq!(join_url("https://x.com", "about"), "https://x.com/about");
        assert_eq!(
            join_url("https://x.com", "https://cdn.x.com/a"),
            "https://cdn.x.com/a"
        );
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("/a?b=1&c=<2>"), "/a?b=1&amp;c=&lt;2&gt;");
    }
}
