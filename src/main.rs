use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use forkline::config::{AppConfig, ConfigStore};
use forkline::git::{CommitLogProvider, GitCli};
use forkline::graph_render::GraphTheme;
use forkline::graph_rows::{GraphView, GraphViewOptions};
use forkline::graph_svg::{render_text, render_view_svg};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Svg,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

#[derive(Parser, Debug)]
#[command(name = "forkline")]
#[command(about = "Render the commit graph of a git worktree", long_about = None)]
#[command(version)]
struct Args {
    /// Repository or worktree directory (default: current directory)
    #[arg(value_name = "REPO")]
    repo: Option<PathBuf>,

    /// Maximum number of commits to load
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<usize>,

    /// Only show commits whose author matches
    #[arg(long, value_name = "PATTERN")]
    author: Option<String>,

    /// Only follow the current HEAD instead of every ref
    #[arg(long)]
    head_only: bool,

    /// Override the configured theme
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Give the graph column its full natural width
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    run(args, config)
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let store = match &args.config {
        Some(path) => ConfigStore::at(path.clone()),
        None => ConfigStore::new()?,
    };
    let config = store.load_or_create_default()?;
    debug!(path = %store.path().display(), theme = ?config.theme, "loaded config");
    Ok(config)
}

fn run(args: Args, config: AppConfig) -> Result<()> {
    let cwd = match args.repo {
        Some(path) => path,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let git = GitCli::discover(&cwd)?;

    let mut log_options = config.graph.log_options();
    if let Some(limit) = args.limit {
        log_options.limit = limit;
    }
    if args.author.is_some() {
        log_options.author = args.author.clone();
    }
    if args.head_only {
        log_options.all_refs = false;
    }
    let commits = git.load_commits(&log_options)?;

    let theme = match args.theme {
        Some(ThemeArg::Light) => GraphTheme::Light,
        Some(ThemeArg::Dark) => GraphTheme::Dark,
        None => GraphTheme::from_preference(config.theme),
    };
    let mut view = GraphView::new(GraphViewOptions {
        theme,
        zebra_rows: config.graph.zebra_rows,
        min_graph_width: config.graph.min_graph_width,
        preferred_graph_width: config.graph.graph_width,
        fullscreen: args.fullscreen,
        ..GraphViewOptions::default()
    });
    view.set_commits(commits);

    let rendered = match args.format {
        OutputFormat::Svg => render_view_svg(&view),
        OutputFormat::Text => render_text(&view.layout(), &view.rows()),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("failed to write output to {}", path.display()))?;
            info!(path = %path.display(), commits = view.commits().len(), "wrote commit graph");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("failed to write output to stdout")?;
        }
    }
    Ok(())
}
