use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use spacenews::api::{ApiClient, Category};
use spacenews::app::{App, AppEvent};
use spacenews::config::Config;
use spacenews::theme::ThemeVariant;
use spacenews::ui;

/// Default config file location (~/.config/spacenews/config.toml).
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("spacenews")
        .join("config.toml"))
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_slug(s).ok_or_else(|| {
        let valid: Vec<&str> = Category::ALL.iter().map(|c| c.slug()).collect();
        format!("unknown category '{s}' (expected one of: {})", valid.join(", "))
    })
}

fn parse_theme(s: &str) -> Result<ThemeVariant, String> {
    ThemeVariant::from_str_name(s).ok_or_else(|| format!("unknown theme '{s}' (dark or light)"))
}

#[derive(Parser, Debug)]
#[command(
    name = "spacenews",
    version,
    about = "Browse space news from the Spaceflight News API in your terminal"
)]
struct Args {
    /// Category shown at startup (articles, blogs, reports, technology, ...)
    #[arg(long, value_name = "SLUG", value_parser = parse_category)]
    category: Option<Category>,

    /// Color theme: dark or light
    #[arg(long, value_parser = parse_theme)]
    theme: Option<ThemeVariant>,

    /// Config file path [default: ~/.config/spacenews/config.toml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // The TUI owns stdout, so logs go to stderr and stay silent unless RUST_LOG is set
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let base_url = args.base_url.as_deref().unwrap_or(&config.api_base_url);
    let api = ApiClient::new(base_url)
        .with_context(|| format!("Invalid API base URL '{base_url}'"))?
        .with_page_limit(config.page_limit)
        .with_timeout(config.request_timeout());

    let theme = args.theme.unwrap_or_else(|| {
        ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme in config, using default");
            ThemeVariant::default()
        })
    });
    let category = args.category.unwrap_or_else(|| config.category());

    let mut app = App::new(api, category, theme);
    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{warning}");
    }

    tracing::info!(category = %category, theme = theme.name(), "Starting spacenews");

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    let initial = app.feed.refresh();

    ui::run(&mut app, Some(initial), event_tx, event_rx)
        .await
        .context("Terminal UI failed")?;

    Ok(())
}
