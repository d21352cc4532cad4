use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "pagelint")]
#[command(version, about = "An SEO linter, JSON-LD generator and sitemap/robots.txt toolkit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format: text or json (sitemap also supports xml)
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Save a JSON report to file
    #[arg(short, long, global = true)]
    pub save: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Score a page description file (JSON, TOML, or YAML) and list its issues
    Analyze {
        #[arg(value_name = "PAGE")]
        page: String,

        /// Also run the supplementary suggestion rules
        #[arg(long)]
        suggestions: bool,

        /// Exit with an error when the score is below this value
        #[arg(long, value_name = "SCORE")]
        min_score: Option<u8>,
    },

    /// Print heuristic improvement suggestions for a page
    Suggest {
        #[arg(value_name = "PAGE")]
        page: String,
    },

    /// Generate a JSON-LD schema from an input file
    Schema {
        #[arg(value_enum)]
        kind: SchemaKind,

        #[arg(value_name = "INPUT")]
        input: String,

        /// Wrap the schema in a <script type="application/ld+json"> tag
        #[arg(long)]
        script_tag: bool,
    },

    /// Validate a JSON-LD file
    Validate {
        #[arg(value_name = "SCHEMA")]
        schema: String,
    },

    /// Generate robots.txt
    Robots {
        /// Preset to render; custom builds from the directive options
        #[arg(long, value_enum, default_value_t = RobotsPreset::Custom)]
        preset: RobotsPreset,

        /// Sitemap URL to advertise
        #[arg(long)]
        sitemap: Option<String>,

        /// User agent to address (repeatable, default: *)
        #[arg(long = "user-agent", value_name = "AGENT")]
        user_agents: Vec<String>,

        /// Path to allow (repeatable, default: /)
        #[arg(long, value_name = "PATH")]
        allow: Vec<String>,

        /// Path to disallow (repeatable)
        #[arg(long, value_name = "PATH")]
        disallow: Vec<String>,

        /// Seconds crawlers should wait between requests
        #[arg(long)]
        crawl_delay: Option<u32>,

        /// Report whether this path is crawlable under the generated rules
        #[arg(long, value_name = "PATH")]
        check: Option<String>,
    },

    /// Build sitemap entries from a file with one site-relative URL per line
    Sitemap {
        #[arg(value_name = "URLS")]
        urls: String,

        /// Site origin prepended to every path, e.g. https://example.com
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaKind {
    Product,
    Organization,
    Faq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RobotsPreset {
    /// Public site with API, admin and data files hidden
    Default,
    /// Block every crawler
    Strict,
    /// Development deployment template
    Dev,
    /// Build from --user-agent/--allow/--disallow/--crawl-delay
    Custom,
}
