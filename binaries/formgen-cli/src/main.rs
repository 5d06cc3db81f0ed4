//! formgen CLI
//!
//! Natural-language UI generator: serve the interactive page, or run a
//! single generation from the terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use formgen_config::Config;
use formgen_requester::{OpenAiClient, SchemaRequester};
use formgen_web::AppState;

#[derive(Parser)]
#[command(name = "formgen")]
#[command(about = "Describe an app in plain words, get a working form")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config dir)
    #[arg(short, long, global = true, env = "FORMGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to listen on, overrides config
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Generate a UI description for a query and print it
    Generate {
        /// What the app should do
        query: String,

        /// Print rendered HTML instead of JSON
        #[arg(long)]
        html: bool,
    },

    /// Render a descriptor file to HTML offline
    Render {
        /// JSON file holding a descriptor array
        file: PathBuf,
    },

    /// Print the instruction sent for a query
    Prompt {
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading config")?;
    init_logging(&config, cli.log_json);
    match config_source(cli.config.as_deref()) {
        Some(path) => tracing::debug!(path = %path.display(), "loaded config file"),
        None => tracing::debug!("no config file, using defaults"),
    }

    match cli.command {
        Commands::Serve { bind } => cmd_serve(config, bind).await,
        Commands::Generate { query, html } => cmd_generate(&config, &query, html).await,
        Commands::Render { file } => cmd_render(&file),
        Commands::Prompt { query } => cmd_prompt(&query),
    }
}

/// File `Config::load` read: the explicit path, else the default if present
fn config_source(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Config::default_path().filter(|p| p.exists()),
    }
}

/// `RUST_LOG` wins over the configured filter
fn init_logging(config: &Config, force_json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if force_json || config.log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn cmd_serve(config: Config, bind: Option<String>) -> Result<()> {
    let addr = bind.unwrap_or_else(|| config.server.bind.clone());
    let state = AppState::from_config(&config)?;
    tracing::info!(
        model = %config.completion.model,
        api_base = %config.completion.api_base,
        "starting formgen"
    );

    formgen_web::serve(Arc::new(state), &addr)
        .await
        .with_context(|| format!("serving on {}", addr))
}

async fn cmd_generate(config: &Config, query: &str, html: bool) -> Result<()> {
    formgen_requester::validate_query(query)?;
    let client = OpenAiClient::from_config(&config.completion)?;
    let requester = SchemaRequester::new(Arc::new(client));

    let ui = requester.generate(query).await?;
    if html {
        println!("{}", formgen_render::render_html(&ui));
    } else {
        println!("{}", serde_json::to_string_pretty(&ui)?);
    }
    Ok(())
}

fn cmd_render(file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let ui = formgen_schema::parse_ui_description(&raw)?;

    for note in formgen_schema::inspect(&ui) {
        eprintln!("  note: {}", note);
    }
    println!("{}", formgen_render::render_html(&ui));
    Ok(())
}

fn cmd_prompt(query: &str) -> Result<()> {
    let query = formgen_requester::validate_query(query)?;
    println!("{}", formgen_requester::build_prompt(query));
    Ok(())
}
