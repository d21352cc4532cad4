use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn pagelint(config_home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("pagelint");
    cmd.env("XDG_CONFIG_HOME", config_home).env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_help() {
    let dir = tempdir().unwrap();
    let assert = pagelint(dir.path()).arg("--help").assert();

    // On Windows, the binary name in help might be "pagelint.exe"
    let expected_pattern = if cfg!(windows) {
        "pagelint.exe [OPTIONS] <COMMAND>"
    } else {
        "pagelint [OPTIONS] <COMMAND>"
    };

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains(expected_pattern));
}

#[test]
fn test_analyze_json_output() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.json");
    fs::write(
        &page,
        r#"{"title": "Short", "metaDescription": "A page", "content": "<h1>Hello</h1>"}"#,
    )
    .unwrap();

    let output = pagelint(dir.path())
        .args(["analyze", page.to_str().unwrap(), "--output", "json", "--suggestions"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["analysis"]["total"], 20);
    assert!(report["analysis"]["score"].as_u64().unwrap() < 50);
    assert!(
        report["analysis"]["issues"]
            .as_array()
            .unwrap()
            .iter()
            .any(|issue| issue["message"].as_str().unwrap().starts_with("Title is too short"))
    );
    assert!(!report["extra_suggestions"].as_array().unwrap().is_empty());
}

#[test]
fn test_analyze_min_score_fails_lint() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.yaml");
    fs::write(&page, "title: Short\n").unwrap();

    pagelint(dir.path())
        .args(["analyze", page.to_str().unwrap(), "--min-score", "90"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("below the required minimum of 90"));
}

#[test]
fn test_analyze_missing_file_fails() {
    let dir = tempdir().unwrap();
    pagelint(dir.path())
        .args(["analyze", dir.path().join("nope.json").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_xml_output_only_for_sitemap() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.json");
    fs::write(&page, "{}").unwrap();

    pagelint(dir.path())
        .args(["analyze", page.to_str().unwrap(), "-o", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only supported by the sitemap command"));
}

#[test]
fn test_robots_default_preset() {
    let dir = tempdir().unwrap();
    pagelint(dir.path())
        .args([
            "robots",
            "--preset",
            "default",
            "--sitemap",
            "https://x.com/sitemap.xml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Disallow: /api/"))
        .stdout(predicate::str::contains("Sitemap: https://x.com/sitemap.xml"));
}

#[test]
fn test_robots_default_preset_requires_sitemap() {
    let dir = tempdir().unwrap();
    pagelint(dir.path())
        .args(["robots", "--preset", "default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs a sitemap URL"));
}

#[test]
fn test_robots_custom_with_check() {
    let dir = tempdir().unwrap();
    pagelint(dir.path())
        .args(["robots", "--disallow", "/admin/", "--check", "/admin/users"])
        .assert()
        .success()
        .stdout(predicate::str::contains("User-agent: *\nAllow: /\nDisallow: /admin/\n"))
        .stderr(predicate::str::contains("Disallowed: /admin/users is blocked"));
}

#[test]
fn test_sitemap_xml_output() {
    let dir = tempdir().unwrap();
    let urls = dir.path().join("urls.txt");
    fs::write(&urls, "# pages\n/\n/api/internal\n/blog/first-post\n\n").unwrap();

    pagelint(dir.path())
        .args([
            "sitemap",
            urls.to_str().unwrap(),
            "--base-url",
            "https://x.com",
            "-o",
            "xml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("<loc>https://x.com/blog/first-post</loc>"))
        .stdout(predicate::str::contains("/api/internal").not());
}

#[test]
fn test_sitemap_rejects_non_http_base_url() {
    let dir = tempdir().unwrap();
    let urls = dir.path().join("urls.txt");
    fs::write(&urls, "/\n").unwrap();

    pagelint(dir.path())
        .args(["sitemap", urls.to_str().unwrap(), "--base-url", "ftp://x.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only http and https are supported"));
}

#[test]
fn test_schema_faq_script_tag() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("faq.toml");
    fs::write(
        &input,
        "[[questions]]\nquestion = \"Is it oven safe?\"\nanswer = \"Up to 250C.\"\n",
    )
    .unwrap();

    pagelint(dir.path())
        .args(["schema", "faq", input.to_str().unwrap(), "--script-tag"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<script type=\"application/ld+json\">"))
        .stdout(predicate::str::contains("\"FAQPage\""))
        .stdout(predicate::str::contains("Is it oven safe?"));
}

#[test]
fn test_validate_reports_missing_type() {
    let dir = tempdir().unwrap();
    let schema = dir.path().join("schema.json");
    fs::write(&schema, r#"{"name": "Blue mug"}"#).unwrap();

    pagelint(dir.path())
        .args(["validate", schema.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Schema is invalid"))
        .stderr(predicate::str::contains("Schema validation failed"));
}

#[test]
fn test_validate_rejects_unparseable_json() {
    let dir = tempdir().unwrap();
    let schema = dir.path().join("schema.json");
    fs::write(&schema, "{ not json").unwrap();

    pagelint(dir.path())
        .args(["validate", schema.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON-LD"));
}
