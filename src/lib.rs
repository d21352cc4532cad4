pub mod cli;
pub mod config;
pub mod html;
pub mod models;
pub mod reporter;
pub mod robots;
pub mod schema;
pub mod seo_analyzer;
pub mod sitemap;
pub mod suggestions;

pub use schema::{
    generate_faq_schema, generate_organization_schema, generate_product_schema,
    schema_to_script_tag, validate_schema,
};
pub use seo_analyzer::analyze_seo;
pub use suggestions::generate_suggestions;

use anyhow::{Context, Result, bail};
use cli::{Cli, Command, RobotsPreset, SchemaKind};
use colored::*;
use config::{Config, read_document};
use models::PageData;
use reporter::{OutputFormat, Reporter};
use robots::{RobotsRules, RobotsTxtConfig};
use serde_json::Value;
use std::fs;
use std::path::Path;
use url::Url;

/// Loads the configuration file (explicit or found on the default paths) and merges it into the arguments
pub fn load_args(args: Cli) -> Result<Cli> {
    let config = match &args.config {
        Some(path) => Some(Config::from_file(Path::new(path))?),
        None => Config::from_default_paths()?,
    };
    Ok(match config {
        Some(config) => config.merge_with_cli(&args),
        None => args,
    })
}

/// Runs the requested command; `args` are expected to be merged with the config already
pub fn run(args: Cli) -> Result<()> {
    let format = OutputFormat::parse(args.output.as_deref())?;
    if format == OutputFormat::Xml && !matches!(args.command, Command::Sitemap { .. }) {
        bail!("XML output is only supported by the sitemap command");
    }

    match &args.command {
        Command::Analyze {
            page,
            suggestions,
            min_score,
        } => {
            let data: PageData = read_document(Path::new(page))?;
            let analysis = analyze_seo(&data);
            let extra = if *suggestions {
                generate_suggestions(&data)
            } else {
                Vec::new()
            };
            let score = analysis.score;
            let report = Reporter::generate_report(page, analysis, extra);

            match format {
                OutputFormat::Json => Reporter::print_json(&report)?,
                _ => Reporter::print_text_report(&report),
            }
            if let Some(filename) = &args.save {
                Reporter::save_json_report(&report, filename)?;
            }

            if let Some(min_score) = min_score
                && score < *min_score
            {
                bail!("SEO score {} is below the required minimum of {}", score, min_score);
            }
        }
        Command::Suggest { page } => {
            let data: PageData = read_document(Path::new(page))?;
            let suggestions = generate_suggestions(&data);

            match format {
                OutputFormat::Json => Reporter::print_json(&suggestions)?,
                _ => Reporter::print_suggestions(&suggestions),
            }
            if let Some(filename) = &args.save {
                Reporter::save_json_report(&suggestions, filename)?;
            }
        }
        Command::Schema {
            kind,
            input,
            script_tag,
        } => {
            let path = Path::new(input);
            let schema = match kind {
                SchemaKind::Product => generate_product_schema(&read_document(path)?),
                SchemaKind::Organization => generate_organization_schema(&read_document(path)?),
                SchemaKind::Faq => generate_faq_schema(&read_document(path)?),
            };

            if *script_tag {
                println!("{}", schema_to_script_tag(&schema));
            } else {
                Reporter::print_json(&schema)?;
            }
            if let Some(filename) = &args.save {
                Reporter::save_json_report(&schema, filename)?;
            }
        }
        Command::Validate { schema } => {
            // Hand-edited JSON-LD that fails to parse is a caller error, not a validation result
            let contents = fs::read_to_string(schema)
                .with_context(|| format!("Failed to read schema file: {}", schema))?;
            let value: Value = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON-LD: {}", schema))?;
            let report = validate_schema(&value);

            match format {
                OutputFormat::Json => Reporter::print_json(&report)?,
                _ => Reporter::print_validation(&report),
            }
            if let Some(filename) = &args.save {
                Reporter::save_json_report(&report, filename)?;
            }
            if !report.valid {
                bail!("Schema validation failed");
            }
        }
        Command::Robots {
            preset,
            sitemap,
            user_agents,
            allow,
            disallow,
            crawl_delay,
            check,
        } => {
            let output = match preset {
                RobotsPreset::Default => {
                    let sitemap = sitemap
                        .as_deref()
                        .context("The default preset needs a sitemap URL (--sitemap or sitemap_url in config)")?;
                    robots::default_robots_txt(sitemap)
                }
                RobotsPreset::Strict => robots::strict_robots_txt(),
                RobotsPreset::Dev => robots::dev_robots_txt(),
                RobotsPreset::Custom => {
                    let defaults = RobotsTxtConfig::default();
                    let or_default = |values: &Vec<String>, fallback: Vec<String>| {
                        if values.is_empty() {
                            fallback
                        } else {
                            values.clone()
                        }
                    };
                    robots::generate_robots_txt(&RobotsTxtConfig {
                        user_agents: or_default(user_agents, defaults.user_agents),
                        allow: or_default(allow, defaults.allow),
                        disallow: disallow.clone(),
                        crawl_delay: *crawl_delay,
                        sitemap: sitemap.clone(),
                    })
                }
            };

            print!("{}", output);

            if let Some(path) = check {
                let rules = RobotsRules::parse(&output);
                let agent = user_agents.first().map_or("*", String::as_str);
                if rules.is_allowed(path, agent) {
                    eprintln!("{} {} is crawlable", "Allowed:".bright_green().bold(), path);
                } else {
                    eprintln!("{} {} is blocked", "Disallowed:".bright_red().bold(), path);
                }
            }
        }
        Command::Sitemap { urls, base_url } => {
            let base_url = base_url
                .as_deref()
                .context("A base URL is required (--base-url or base_url in config)")?;
            validate_base_url(base_url)?;

            let contents = fs::read_to_string(urls)
                .with_context(|| format!("Failed to read URL list: {}", urls))?;
            let paths: Vec<&str> = contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .collect();

            let entries = sitemap::generate_sitemap_entries(paths.as_slice(), base_url);

            match format {
                OutputFormat::Json => Reporter::print_json(&entries)?,
                OutputFormat::Xml => print!("{}", sitemap::render_sitemap_xml(&entries)),
                OutputFormat::Text => Reporter::print_sitemap(&entries),
            }
            if let Some(filename) = &args.save {
                Reporter::save_json_report(&entries, filename)?;
            }
        }
    }

    Ok(())
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed = Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => bail!(
            "Invalid base URL scheme '{}': only http and https are supported",
            scheme
        ),
    }
}
