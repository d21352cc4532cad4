use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Directives for [`generate_robots_txt`]. Defaults to allowing everything for every agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RobotsTxtConfig {
    pub user_agents: Vec<String>,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
    pub crawl_delay: Option<u32>,
    pub sitemap: Option<String>,
}

impl Default for RobotsTxtConfig {
    fn default() -> Self {
        Self {
            user_agents: vec!["*".to_string()],
            allow: vec!["/".to_string()],
            disallow: Vec::new(),
            crawl_delay: None,
            sitemap: None,
        }
    }
}

/// Paths hidden from crawlers by the default preset
pub const DEFAULT_DISALLOW: [&str; 6] = [
    "/api/",
    "/admin/",
    "/_astro/",
    "/private/",
    "/*.json$",
    "/*.xml$",
];

const DEV_ROBOTS_TXT: &str = "# Development environment: do not index\n\
User-agent: *\n\
Disallow: /\n\
\n\
# This site is not ready for search engines yet.\n";

/// Renders one `User-agent` block per agent followed by an optional `Sitemap` line
pub fn generate_robots_txt(config: &RobotsTxtConfig) -> String {
    let mut lines: Vec<String> = Vec::new();

    for agent in &config.user_agents {
        lines.push(format!("User-agent: {}", agent));
        lines.extend(config.allow.iter().map(|path| format!("Allow: {}", path)));
        lines.extend(
            config
                .disallow
                .iter()
                .map(|path| format!("Disallow: {}", path)),
        );
        if let Some(delay) = config.crawl_delay {
            lines.push(format!("Crawl-delay: {}", delay));
        }
        lines.push(String::new());
    }

    if let Some(sitemap) = &config.sitemap {
        lines.push(format!("Sitemap: {}", sitemap));
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Production preset: everything public except API, admin, build output and data files
pub fn default_robots_txt(sitemap_url: &str) -> String {
    generate_robots_txt(&RobotsTxtConfig {
        disallow: DEFAULT_DISALLOW.iter().map(|path| path.to_string()).collect(),
        sitemap: Some(sitemap_url.to_string()),
        ..Default::default()
    })
}

/// Blocks every crawler from the whole site
pub fn strict_robots_txt() -> String {
    generate_robots_txt(&RobotsTxtConfig {
        allow: Vec::new(),
        disallow: vec!["/".to_string()],
        ..Default::default()
    })
}

/// Fixed template for development and preview deployments
pub fn dev_robots_txt() -> String {
    DEV_ROBOTS_TXT.to_string()
}

/// Represents a robots.txt rule (either Allow or Disallow)
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    pattern: String,
    is_allow: bool,
}

/// Parsed robots.txt directives, used to check paths against generated output.
#[derive(Debug, Default)]
pub struct RobotsRules {
    /// Rules grouped by user-agent (lowercased)
    rules: HashMap<String, Vec<Rule>>,
    crawl_delays: HashMap<String, u32>,
    sitemaps: Vec<String>,
}

impl RobotsRules {
    pub fn parse(content: &str) -> Self {
        let mut parsed = Self::default();
        let mut current_agents: Vec<String> = Vec::new();
        let mut current_rules: Vec<Rule> = Vec::new();
        // Consecutive User-agent lines share one group
        let mut in_agent_lines = false;

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Split on first colon
            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim().to_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    if !in_agent_lines {
                        parsed.flush(&current_agents, &mut current_rules);
                        current_agents.clear();
                    }
                    current_agents.push(value.to_lowercase());
                    in_agent_lines = true;
                }
                "allow" | "disallow" => {
                    in_agent_lines = false;
                    if !value.is_empty() {
                        current_rules.push(Rule {
                            pattern: value.to_string(),
                            is_allow: field == "allow",
                        });
                    }
                }
                "crawl-delay" => {
                    in_agent_lines = false;
                    if let Ok(delay) = value.parse::<u32>() {
                        for agent in &current_agents {
                            parsed.crawl_delays.insert(agent.clone(), delay);
                        }
                    }
                }
                "sitemap" => parsed.sitemaps.push(value.to_string()),
                _ => {
                    tracing::debug!(directive = %field, "ignoring unknown robots.txt directive");
                }
            }
        }

        parsed.flush(&current_agents, &mut current_rules);
        parsed
    }

    fn flush(&mut self, agents: &[String], rules: &mut Vec<Rule>) {
        for agent in agents {
            self.rules
                .entry(agent.clone())
                .or_default()
                .extend(rules.iter().cloned());
        }
        rules.clear();
    }

    /// Checks if a path may be crawled by the given user agent
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        let rules = self
            .rules
            .get(&user_agent.to_lowercase())
            .or_else(|| self.rules.get("*"));

        match rules {
            Some(rules) => check_rules(rules, path),
            // If no rules found, allow by default
            None => true,
        }
    }

    pub fn crawl_delay(&self, user_agent: &str) -> Option<u32> {
        self.crawl_delays
            .get(&user_agent.to_lowercase())
            .or_else(|| self.crawl_delays.get("*"))
            .copied()
    }

    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }
}

/// The most specific (longest) matching rule wins; ties go to the later rule
fn check_rules(rules: &[Rule], path: &str) -> bool {
    let mut allowed = true;
    let mut most_specific_length = 0;

    for rule in rules {
        if path_matches(&rule.pattern, path) {
            let pattern_len = rule.pattern.len();
            if pattern_len >= most_specific_length {
                most_specific_length = pattern_len;
                allowed = rule.is_allow;
            }
        }
    }

    allowed
}

/// Checks if a path matches a pattern (supports `*` and `$` wildcards)
fn path_matches(pattern: &str, path: &str) -> bool {
    let (pattern, must_end) = match pattern.strip_suffix('$') {
        Some(stripped) => (stripped, true),
        None => (pattern, false),
    };

    match pattern.split_once('*') {
        None if must_end => path == pattern,
        None => path.starts_with(pattern),
        Some((prefix, rest)) => {
            let Some(remaining) = path.strip_prefix(prefix) else {
                return false;
            };
            let rest = if must_end {
                format!("{}$", rest)
            } else {
                rest.to_string()
            };
            if rest.is_empty() {
                return true;
            }
            // Try the remaining pattern at every position the wildcard could stop
            remaining
                .char_indices()
                .map(|(idx, _)| idx)
                .chain(std::iter::once(remaining.len()))
                .any(|idx| path_matches(&rest, &remaining[idx..]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matches_prefix() {
        assert!(path_matches("/admin", "/admin/page"));
        assert!(path_matches("/admin", "/admin"));
        assert!(!path_matches("/admin", "/user"));
    }

    #[test]
    fn test_path_matches_wildcard() {
        assert!(path_matches("/admin/*", "/admin/page"));
        assert!(path_matches("/admin/*", "/admin/"));
        assert!(path_matches("/*.php", "/index.php"));
        assert!(path_matches("/*.php", "/admin/index.php"));
        assert!(!path_matches("/*.php", "/index.html"));
    }

    #[test]
    fn test_path_matches_end_marker() {
        assert!(path_matches("/admin$", "/admin"));
        assert!(!path_matches("/admin$", "/admin/"));
        assert!(path_matches("/*.json$", "/data/feed.json"));
        assert!(!path_matches("/*.json$", "/data/feed.json?x=1"));
    }

    #[test]
    fn test_check_rules() {
        let rules = vec![
            Rule {
                pattern: "/admin".to_string(),
                is_allow: false,
            },
            Rule {
                pattern: "/admin/public".to_string(),
                is_allow: true,
            },
        ];

        assert!(!check_rules(&rules, "/admin"));
        assert!(check_rules(&rules, "/admin/public"));
        assert!(!check_rules(&rules, "/admin/private"));
        assert!(check_rules(&rules, "/public"));
    }

    #[test]
    fn test_parse_groups_consecutive_agents() {
        let content = "User-agent: googlebot\nUser-agent: bingbot\nDisallow: /secret\nCrawl-delay: 4\n\nUser-agent: *\nDisallow: /admin\n";
        let robots = RobotsRules::parse(content);

        assert!(!robots.is_allowed("/secret", "Googlebot"));
        assert!(!robots.is_allowed("/secret", "bingbot"));
        assert!(robots.is_allowed("/secret", "otherbot"));
        assert!(!robots.is_allowed("/admin", "otherbot"));
        assert_eq!(robots.crawl_delay("bingbot"), Some(4));
        assert_eq!(robots.crawl_delay("otherbot"), None);
    }
}
