mod cli;
mod core;

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::cli::output::{detect_color, OutputFormat, OutputOptions};
use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "notecart",
    about = "Turn notes into shopping lists and track what the model calls cost",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: $XDG_CONFIG_HOME/notecart/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output JSON
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a note into a shopping list
    #[command(group(ArgGroup::new("source").required(true).args(["file", "text", "sample"])))]
    Process {
        /// Note file (.json note or plain text)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Note text given inline
        #[arg(short, long)]
        text: Option<String>,

        /// Use the built-in sample grocery note
        #[arg(long)]
        sample: bool,

        /// Override the note id used in logs and output file names
        #[arg(long)]
        note_id: Option<String>,

        /// json|markdown|text (default: settings.default_format)
        #[arg(long)]
        output_format: Option<String>,

        /// Don't write the result to the output directory
        #[arg(long)]
        no_save: bool,
    },
    /// Inspect logged model costs
    Cost {
        #[command(subcommand)]
        action: CostAction,
    },
    /// Inspect or extend the item cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CostAction {
    /// Totals, averages and projected spend
    Summary,
    /// Estimate one request's cost under every pricing tier
    Compare {
        /// Note text to price
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Note file to price
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Assumed response length in tokens
        #[arg(long, default_value_t = cli::cost_cmd::DEFAULT_OUTPUT_TOKENS)]
        output_tokens: u64,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Look up an item by name (substring match either way)
    Get { name: String },
    /// Remember an item's attributes
    Add {
        name: String,
        #[arg(long)]
        category: Option<String>,
        /// high|medium|low
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        estimated_cost: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
    },
    /// Show every cached item
    List,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Print the config file path
    Path,
}

/// `RUST_LOG` wins, then `--verbose`, then `settings.log_level`.
fn init_tracing(verbose: bool, log_level: &str) {
    let level = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let loaded = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let settings = loaded
        .as_ref()
        .map(|c| c.settings.clone())
        .unwrap_or_default();

    init_tracing(cli.verbose, &settings.log_level);

    let output_opts = OutputOptions {
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::from_id(&settings.default_format).unwrap_or(OutputFormat::Markdown)
        },
        pretty: cli.pretty,
        use_color: detect_color(!cli.no_color, &settings.color),
        verbose: cli.verbose,
    };

    // Config subcommands work on broken config files too
    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::Init => cli::config_cmd::init(&config_path, &output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(&config_path, &output_opts)?,
            ConfigAction::Path => cli::config_cmd::path(&config_path, &output_opts)?,
        }
        return Ok(());
    }

    let config = match loaded {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} ({})", e, config_path.display());
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Process {
            file,
            text,
            sample: _,
            note_id,
            output_format,
            no_save,
        } => {
            let source = match (file, text) {
                (Some(path), _) => cli::process_cmd::NoteSource::File(path),
                (None, Some(text)) => cli::process_cmd::NoteSource::Text(text),
                (None, None) => cli::process_cmd::NoteSource::Sample,
            };
            let output_format = match output_format.as_deref() {
                Some(id) => match OutputFormat::from_id(id) {
                    Some(f) => Some(f),
                    None => {
                        eprintln!("Unknown output format: '{}' (json|markdown|text)", id);
                        std::process::exit(1);
                    }
                },
                None => None,
            };
            let args = cli::process_cmd::ProcessArgs {
                source,
                note_id,
                output_format,
                no_save,
            };
            cli::process_cmd::run(args, &config, &output_opts).await?;
        }
        Commands::Cost { action } => match action {
            CostAction::Summary => cli::cost_cmd::summary(&config, &output_opts)?,
            CostAction::Compare {
                text,
                file,
                output_tokens,
            } => cli::cost_cmd::compare(text, file, output_tokens, &output_opts)?,
        },
        Commands::Cache { action } => match action {
            CacheAction::Get { name } => cli::cache_cmd::get(&name, &config, &output_opts)?,
            CacheAction::Add {
                name,
                category,
                priority,
                estimated_cost,
                quantity,
            } => {
                let args = cli::cache_cmd::AddArgs {
                    name,
                    category,
                    priority,
                    estimated_cost,
                    quantity,
                };
                cli::cache_cmd::add(args, &config, &output_opts)?
            }
            CacheAction::List => cli::cache_cmd::list(&config, &output_opts)?,
        },
        Commands::Config { .. } => {}
    }

    Ok(())
}
