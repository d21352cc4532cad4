use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Command};

/// Configuration file structure. All fields are optional to allow partial configuration;
/// explicit command line values always win.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Output format: text, json or xml
    pub output: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Site origin prepended to sitemap paths
    pub base_url: Option<String>,

    /// Sitemap URL advertised in robots.txt
    pub sitemap_url: Option<String>,

    /// Directives for custom robots.txt generation
    pub robots: Option<RobotsSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RobotsSettings {
    pub user_agents: Option<Vec<String>>,
    pub allow: Option<Vec<String>>,
    pub disallow: Option<Vec<String>>,
    pub crawl_delay: Option<u32>,
}

/// Structured document format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

/// Reads any deserializable document (config, page data, schema input) as JSON, TOML or YAML
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let format = ConfigFormat::from_path(path)
        .with_context(|| format!("Unsupported file format: {}", path.display()))?;

    let document = match format {
        ConfigFormat::Json => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))?,
        ConfigFormat::Toml => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML: {}", path.display()))?,
        ConfigFormat::Yaml => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML: {}", path.display()))?,
    };

    Ok(document)
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config = read_document(path)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("pagelint.{}", ext)));
            }
        }

        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let config_dir = config_home.join("pagelint");
            for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
                for ext in format.extensions() {
                    paths.push(config_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Fills every option the command line left unset from this configuration
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        let command = match &cli.command {
            Command::Sitemap { urls, base_url } => Command::Sitemap {
                urls: urls.clone(),
                base_url: base_url.clone().or_else(|| self.base_url.clone()),
            },
            Command::Robots {
                preset,
                sitemap,
                user_agents,
                allow,
                disallow,
                crawl_delay,
                check,
            } => {
                let robots = self.robots.clone().unwrap_or_default();
                let or_config = |values: &Vec<String>, configured: Option<Vec<String>>| {
                    if values.is_empty() {
                        configured.unwrap_or_default()
                    } else {
                        values.clone()
                    }
                };
                Command::Robots {
                    preset: *preset,
                    sitemap: sitemap
                        .clone()
                        .or_else(|| self.sitemap_url.clone())
                        .or_else(|| {
                            self.base_url.as_ref().map(|base| {
                                format!("{}/sitemap.xml", base.trim_end_matches('/'))
                            })
                        }),
                    user_agents: or_config(user_agents, robots.user_agents),
                    allow: or_config(allow, robots.allow),
                    disallow: or_config(disallow, robots.disallow),
                    crawl_delay: crawl_delay.or(robots.crawl_delay),
                    check: check.clone(),
                }
            }
            other => other.clone(),
        };

        Cli {
            command,
            output: cli.output.clone().or_else(|| self.output.clone()),
            save: cli.save.clone(),
            verbose: cli.verbose || self.verbose.unwrap_or(false),
            config: cli.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RobotsPreset;
    use crate::models::PageData;
    use serial_test::serial;
    use tempfile::tempdir;

    fn robots_cli() -> Cli {
        Cli {
            command: Command::Robots {
                preset: RobotsPreset::Custom,
                sitemap: None,
                user_agents: vec![],
                allow: vec![],
                disallow: vec![],
                crawl_delay: None,
                check: None,
            },
            output: None,
            save: None,
            verbose: false,
            config: None,
        }
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.TOML")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("config.txt")), None);
    }

    #[test]
    fn test_load_toml_config_with_robots_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pagelint.toml");
        fs::write(
            &path,
            r#"
output = "json"
base_url = "https://example.com"

[robots]
disallow = ["/admin/", "/cart/"]
crawl_delay = 2
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.as_deref(), Some("json"));
        let robots = config.robots.unwrap();
        assert_eq!(
            robots.disallow,
            Some(vec!["/admin/".to_string(), "/cart/".to_string()])
        );
        assert_eq!(robots.crawl_delay, Some(2));
        assert_eq!(robots.user_agents, None);
    }

    #[test]
    fn test_read_document_parses_page_data_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.yaml");
        fs::write(
            &path,
            "title: Handmade mugs\nmetaDescription: Mugs\nkeywords: [mugs]\nimages:\n  - src: /a.webp\n    alt: A mug\n",
        )
        .unwrap();

        let page: PageData = read_document(&path).unwrap();
        assert_eq!(page.title.as_deref(), Some("Handmade mugs"));
        assert_eq!(page.meta_description.as_deref(), Some("Mugs"));
        assert_eq!(page.images[0].alt.as_deref(), Some("A mug"));
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, "content").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_merge_fills_robots_from_config() {
        let config = Config {
            base_url: Some("https://example.com/".to_string()),
            robots: Some(RobotsSettings {
                disallow: Some(vec!["/cart/".to_string()]),
                crawl_delay: Some(5),
                ..Default::default()
            }),
            output: Some("json".to_string()),
            ..Default::default()
        };

        let merged = config.merge_with_cli(&robots_cli());
        assert_eq!(merged.output.as_deref(), Some("json"));
        match merged.command {
            Command::Robots {
                sitemap,
                disallow,
                crawl_delay,
                ..
            } => {
                assert_eq!(sitemap.as_deref(), Some("https://example.com/sitemap.xml"));
                assert_eq!(disallow, vec!["/cart/".to_string()]);
                assert_eq!(crawl_delay, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides_config() {
        let config = Config {
            output: Some("json".to_string()),
            robots: Some(RobotsSettings {
                disallow: Some(vec!["/cart/".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut cli = robots_cli();
        cli.output = Some("text".to_string());
        if let Command::Robots { disallow, .. } = &mut cli.command {
            *disallow = vec!["/tmp/".to_string()];
        }

        let merged = config.merge_with_cli(&cli);
        assert_eq!(merged.output.as_deref(), Some("text"));
        if let Command::Robots { disallow, .. } = merged.command {
            assert_eq!(disallow, vec!["/tmp/".to_string()]);
        }
    }

    #[test]
    #[serial]
    fn test_default_paths_use_xdg_config_home() {
        let dir = tempdir().unwrap();
        // SAFETY: serialized with the other environment tests
        unsafe { std::env::set_var("XDG_CONFIG_HOME", dir.path()) };

        let paths = Config::default_paths();
        assert_eq!(paths[0], PathBuf::from("pagelint.json"));
        assert!(paths.contains(&dir.path().join("pagelint").join("config.toml")));

        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };
    }
}
