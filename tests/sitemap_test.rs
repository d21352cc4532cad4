use chrono::NaiveDate;
use pagelint::models::ChangeFrequency;
use pagelint::sitemap::{
    change_frequency, filter_sitemap_urls, generate_sitemap_entries, generate_sitemap_entries_at,
    render_sitemap_xml, url_priority,
};

#[test]
fn test_url_priority_table() {
    let cases = [
        ("/", 1.0),
        ("", 1.0),
        ("/shop", 0.9),
        ("/pricing/", 0.9),
        ("/about", 0.9),
        ("/category/mugs", 0.8),
        ("/tag/stoneware", 0.8),
        ("/product/123", 0.7),
        ("/course/pottery-101", 0.7),
        ("/blog/my-post", 0.6),
        ("/news/launch", 0.6),
        ("/docs/getting-started", 0.5),
        ("/careers", 0.5),
    ];

    for (url, expected) in cases {
        assert_eq!(url_priority(url), expected, "priority for {:?}", url);
    }
}

#[test]
fn test_first_match_wins() {
    // Category outranks product when both fragments appear
    assert_eq!(url_priority("/category/mugs/product/1"), 0.8);
    // Product cadence wins over blog cadence
    assert_eq!(
        change_frequency("/product/blog/1"),
        ChangeFrequency::Weekly
    );
}

#[test]
fn test_change_frequency_table() {
    let cases = [
        ("/", ChangeFrequency::Daily),
        ("/shop", ChangeFrequency::Daily),
        ("/product/123", ChangeFrequency::Weekly),
        ("/course/intro", ChangeFrequency::Weekly),
        ("/blog/post", ChangeFrequency::Monthly),
        ("/help/returns", ChangeFrequency::Monthly),
        ("/about", ChangeFrequency::Yearly),
        ("/privacy", ChangeFrequency::Yearly),
        ("/terms", ChangeFrequency::Yearly),
        ("/gallery", ChangeFrequency::Monthly),
    ];

    for (url, expected) in cases {
        assert_eq!(change_frequency(url), expected, "changefreq for {:?}", url);
    }
}

#[test]
fn test_filter_sitemap_urls() {
    assert_eq!(
        filter_sitemap_urls(&["/", "/api/x", "/admin/y", "/page?page=2", "/doc.pdf"]),
        vec!["/".to_string()]
    );

    let kept = filter_sitemap_urls(&[
        "/login",
        "/account/logout/",
        "/auth",
        "/signup",
        "/authors",
        "/private/notes",
        "/feed.xml",
        "/robots.txt",
        "/export.zip",
        "/data.json",
        "/blog/json-tips",
    ]);
    assert_eq!(kept, vec!["/authors".to_string(), "/blog/json-tips".to_string()]);
}

#[test]
fn test_generate_sitemap_entries_at() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    let entries = generate_sitemap_entries_at(
        &["/", "/api/health", "/product/7", "/blog/glazes"],
        "https://clayworks.test/",
        date,
    );

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].url, "https://clayworks.test/");
    assert_eq!(entries[0].priority, 1.0);
    assert_eq!(entries[0].changefreq, ChangeFrequency::Daily);
    assert_eq!(entries[1].url, "https://clayworks.test/product/7");
    assert_eq!(entries[1].priority, 0.7);
    assert_eq!(entries[1].changefreq, ChangeFrequency::Weekly);
    assert_eq!(entries[2].changefreq, ChangeFrequency::Monthly);
    assert!(entries.iter().all(|entry| entry.lastmod == "2026-03-14"));
}

#[test]
fn test_generate_sitemap_entries_uses_today() {
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let entries = generate_sitemap_entries(&["/about"], "https://clayworks.test");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].lastmod, today);
}

#[test]
fn test_render_sitemap_xml() {
    let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
    let entries = generate_sitemap_entries_at(&["/", "/search?q=a&b"], "https://x.com", date);
    let xml = render_sitemap_xml(&entries);

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
    assert!(xml.contains("<loc>https://x.com/</loc>"));
    assert!(xml.contains("<loc>https://x.com/search?q=a&amp;b</loc>"));
    assert!(xml.contains("<lastmod>2026-01-02</lastmod>"));
    assert!(xml.contains("<changefreq>daily</changefreq>"));
    assert!(xml.contains("<priority>1.0</priority>"));
    assert!(xml.contains("<priority>0.5</priority>"));
    assert_eq!(xml.matches("<url>").count(), 2);
    assert!(xml.trim_end().ends_with("</urlset>"));
}
