use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use stargaze_core::{Bucket, OutputFormat, StargazeConfig, StargazeError};
use stargaze_data::Dataset;
use stargaze_metrics::popularity::PopularityOptions;
use stargaze_views::{
    render, CorrelationView, LanguagesView, OverviewOptions, OverviewView, PopularityView, View,
};

#[derive(Parser)]
#[command(
    name = "stargaze",
    version,
    about = "Explore a dataset of GitHub repositories from the terminal",
    long_about = "Stargaze renders dashboard views over two CSV exports of GitHub repository data:\n\
                   an aggregate table (one row per repository) and a time series\n\
                   (one row per repository snapshot with its creation time).\n\n\
                   Examples:\n  \
                     stargaze overview                      Top repositories, language trends, gauges\n  \
                     stargaze overview --repo octo/cat      Gauges for one repository\n  \
                     stargaze languages --language Rust     Repositories written in Rust\n  \
                     stargaze correlation --format json     Correlation matrix as JSON\n  \
                     stargaze popularity --format markdown  Popularity charts as Markdown"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .stargaze.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for views.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and charts (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,

    /// Directory the dataset paths are resolved against (default: .)
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Aggregate repositories CSV (overrides [data] repositories)
    #[arg(long, global = true)]
    repositories: Option<PathBuf>,

    /// Repository time series CSV (overrides [data] time_series)
    #[arg(long, global = true)]
    time_series: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Top repositories, language popularity, engagement, and gauges
    #[command(long_about = "Show the data overview.\n\n\
        Ranks repositories by stars, tabulates language popularity per year (or month),\n\
        summarizes stars, forks and watchers per creation year, and draws four gauges\n\
        for one repository.\n\n\
        Examples:\n  stargaze overview\n  stargaze overview --repo octo/cat --bucket month")]
    Overview {
        /// Repository for the gauges (default: first time series row)
        #[arg(long)]
        repo: Option<String>,

        /// Popularity bucket: year or month (default: from config, else year)
        #[arg(long)]
        bucket: Option<Bucket>,
    },
    /// Repositories by primary language and stars distribution
    #[command(long_about = "Show the language trends view.\n\n\
        Lists repositories with the selected primary language, the stars distribution\n\
        per language, and how many repositories use each language.\n\n\
        Examples:\n  stargaze languages\n  stargaze languages --language Python")]
    Languages {
        /// Language to filter by (default: the most common one)
        #[arg(long)]
        language: Option<String>,
    },
    /// Pearson correlation between the numeric columns
    Correlation,
    /// Stars against forks and pull requests, and watchers per repository
    Popularity,
    /// Create a default .stargaze.toml configuration file
    #[command(long_about = "Create a default .stargaze.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .stargaze.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1m\x1b[33m*\x1b[0m \x1b[1mstargaze\x1b[0m v{version} - GitHub repository dataset explorer\n");

        println!("Quick start:");
        println!("  \x1b[36mstargaze init\x1b[0m                 Create a .stargaze.toml config file");
        println!("  \x1b[36mstargaze overview\x1b[0m             Summarize the dataset\n");

        println!("All commands:");
        println!("  \x1b[32moverview\x1b[0m     Top repositories, language trends, engagement, gauges");
        println!("  \x1b[32mlanguages\x1b[0m    Repositories per language and stars distribution");
        println!("  \x1b[32mcorrelation\x1b[0m  Correlation between numeric columns");
        println!("  \x1b[32mpopularity\x1b[0m   Stars vs forks and pull requests, watchers");
        println!("  \x1b[32minit\x1b[0m         Create default configuration\n");
    } else {
        println!("stargaze v{version} - GitHub repository dataset explorer\n");

        println!("Quick start:");
        println!("  stargaze init                 Create a .stargaze.toml config file");
        println!("  stargaze overview             Summarize the dataset\n");

        println!("All commands:");
        println!("  overview     Top repositories, language trends, engagement, gauges");
        println!("  languages    Repositories per language and stars distribution");
        println!("  correlation  Correlation between numeric columns");
        println!("  popularity   Stars vs forks and pull requests, watchers");
        println!("  init         Create default configuration\n");
    }

    println!("Run 'stargaze <command> --help' for details.");
}

const DEFAULT_CONFIG: &str = r#"# Stargaze Configuration

[data]
# Paths are relative to --data-dir unless absolute.
# repositories = "github_dataset.csv"
# time_series = "new_repository_data.csv"

[overview]
# top_repositories = 25

[popularity]
# bucket = "year"
# top_languages = 10
# other_label = "Other"
"#;

/// Convert a library error into a report, with a hint where one helps.
fn diagnose(err: StargazeError) -> miette::Report {
    match err {
        StargazeError::FileNotFound(_) => miette::miette!(
            help = "Pass --repositories/--time-series, set paths under [data] in .stargaze.toml, or use --data-dir",
            "{err}"
        ),
        StargazeError::Parse(_) => miette::miette!(
            help = "created_at must be an ISO-8601 timestamp such as 2021-03-04T05:06:07Z",
            "{err}"
        ),
        StargazeError::Config(_) | StargazeError::Toml(_) => miette::miette!(
            help = "Run 'stargaze init' in an empty directory to see every option",
            "{err}"
        ),
        other => miette::miette!("{other}"),
    }
}

fn load_config(path: Option<&Path>) -> Result<StargazeConfig> {
    match path {
        Some(path) => StargazeConfig::from_file(path).map_err(diagnose),
        None => {
            let default_path = Path::new(".stargaze.toml");
            if default_path.exists() {
                StargazeConfig::from_file(default_path).map_err(diagnose)
            } else {
                Ok(StargazeConfig::default())
            }
        }
    }
}

fn load_dataset(cli: &Cli, config: &StargazeConfig) -> Result<Dataset> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let mut data = config.data.clone();
    if let Some(path) = &cli.repositories {
        data.repositories = cwd.join(path);
    }
    if let Some(path) = &cli.time_series {
        data.time_series = cwd.join(path);
    }

    let spinner = if std::io::stderr().is_terminal() {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
        {
            pb.set_style(style);
        }
        pb.set_message("Loading datasets...");
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let result = Dataset::load(&data, &cli.data_dir);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    result.map_err(diagnose)
}

fn print_view<V: View>(view: &V, format: OutputFormat) -> Result<()> {
    let output = render(view, format).map_err(diagnose)?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn init_tracing(verbose: bool, use_color: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_ansi(use_color)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };
    init_tracing(cli.verbose, use_color && std::io::stderr().is_terminal());

    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(format = %cli.format, data_dir = %cli.data_dir.display(), "configuration resolved");

    match &cli.command {
        None => print_welcome(use_color),
        Some(Command::Overview { repo, bucket }) => {
            let dataset = load_dataset(&cli, &config)?;
            let mut popularity = PopularityOptions::from(&config.popularity);
            if let Some(bucket) = bucket {
                popularity.bucket = *bucket;
            }
            let options = OverviewOptions {
                top_repositories: config.overview.top_repositories,
                popularity,
                repository: repo.clone(),
            };
            let view = OverviewView::build(&dataset, &options);
            if view.gauges.is_none() {
                if let Some(name) = &view.selected_repository {
                    eprintln!("note: repository '{name}' not found in the time series");
                }
            }
            print_view(&view, cli.format)?;
        }
        Some(Command::Languages { language }) => {
            let dataset = load_dataset(&cli, &config)?;
            let view = LanguagesView::build(&dataset.repositories, language.as_deref());
            if let Some(language) = &view.selected_language {
                if view.repositories.is_empty() {
                    eprintln!("note: no repositories use '{language}'");
                }
            }
            print_view(&view, cli.format)?;
        }
        Some(Command::Correlation) => {
            let dataset = load_dataset(&cli, &config)?;
            print_view(&CorrelationView::build(&dataset.repositories), cli.format)?;
        }
        Some(Command::Popularity) => {
            let dataset = load_dataset(&cli, &config)?;
            print_view(&PopularityView::build(&dataset), cli.format)?;
        }
        Some(Command::Init) => {
            let path = Path::new(".stargaze.toml");
            if path.exists() {
                miette::bail!(".stargaze.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .stargaze.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "stargaze", &mut std::io::stdout());
        }
    }

    Ok(())
}
