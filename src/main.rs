//! climateframe - Main CLI Entry Point

use anyhow::{bail, Context, Result};
use clap::Parser;
use climateframe::{
    article::Article,
    backend,
    cli::{Args, Commands},
    config::Config,
    orchestrator::{BatchCancel, BatchEntry, ClassificationOrchestrator},
    sources::SourceBias,
    statistics::{weekly_trends, FramingStatistics, StatisticsFilter},
    taxonomy::{TaxonomyRegistry, NONE_LABEL},
};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);
    tracing::debug!(verbosity = args.verbosity().as_str(), "logging initialized");

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    match &args.command {
        Commands::Classify {
            title,
            source,
            file,
        } => {
            run_classify(&config, title, source.as_deref(), file.as_deref()).await?;
        }
        Commands::Batch {
            file,
            climate_only,
            stats,
            trend_weeks,
            year,
            weeks,
            bias,
        } => {
            let filter = stats_filter(*year, weeks, *bias);
            let stats = stats.then_some((filter, *trend_weeks));
            run_batch(&config, file, *climate_only, stats).await?;
        }
        Commands::Taxonomy => show_taxonomy(),
        Commands::Doctor => run_doctor(&config).await?,
        Commands::Config => show_config(&config, args.config.as_ref())?,
    }

    Ok(())
}

/// Install the stderr tracing subscriber; `RUST_LOG` overrides verbosity
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.verbosity().log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_orchestrator(config: &Config) -> Result<ClassificationOrchestrator> {
    let backend = backend::from_config(config).context("Failed to create classification backend")?;
    Ok(ClassificationOrchestrator::new(backend)
        .with_max_concurrent_articles(config.batch.max_concurrent_articles))
}

async fn run_classify(
    config: &Config,
    title: &str,
    source: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let body = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read article from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read article from stdin")?;
            buf
        }
    };

    let mut article = Article::new(title, body);
    if let Some(source) = source {
        article = article.with_source(source);
    }

    let orchestrator = build_orchestrator(config)?;
    let classification = orchestrator.classify_article(&article).await;

    println!("{}", serde_json::to_string_pretty(&classification.result)?);
    Ok(())
}

fn stats_filter(year: Option<i32>, weeks: &[u32], bias: Option<SourceBias>) -> StatisticsFilter {
    let mut filter = StatisticsFilter::new().with_weeks(weeks.iter().copied());
    if let Some(year) = year {
        filter = filter.with_year(year);
    }
    if let Some(bias) = bias {
        filter = filter.with_bias(bias);
    }
    filter
}

/// `stats` carries the statistics filter and trend bucket count when set
async fn run_batch(
    config: &Config,
    file: &Path,
    climate_only: bool,
    stats: Option<(StatisticsFilter, usize)>,
) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read articles from {}", file.display()))?;
    let mut articles: Vec<Article> =
        serde_json::from_str(&contents).context("Articles file must be a JSON array of articles")?;

    if climate_only {
        let before = articles.len();
        articles.retain(Article::is_climate_related);
        tracing::info!(kept = articles.len(), skipped = before - articles.len(), "climate filter applied");
    }

    let orchestrator = build_orchestrator(config)?;

    // Ctrl-C stops articles that have not started yet
    let cancel = BatchCancel::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling remaining articles");
            signal_cancel.cancel();
        }
    });

    let entries = orchestrator.classify_batch(articles, &cancel).await;
    let classified: Vec<_> = entries
        .iter()
        .filter_map(BatchEntry::classification)
        .cloned()
        .collect();

    if let Some((filter, trend_weeks)) = stats {
        let output = serde_json::json!({
            "statistics": FramingStatistics::compute(&classified, &filter),
            "trends": weekly_trends(&classified, &filter, trend_weeks),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&classified)?);
    }

    Ok(())
}

fn show_taxonomy() {
    for spec in TaxonomyRegistry::global().tasks() {
        println!("{}", spec.name().bold());
        for field in spec.required_fields() {
            let none = if field.nullable {
                format!(" (or {})", NONE_LABEL)
            } else {
                String::new()
            };
            println!("  {}: {}{}", field.name.cyan(), field.taxonomy, none.dimmed());
            for label in field.taxonomy.labels() {
                println!("    - {}", label);
            }
        }
        println!();
    }
}

async fn run_doctor(config: &Config) -> Result<()> {
    println!("Backend: {} ({})", config.backend.provider.as_str(), config.active_model());

    let backend = match backend::from_config(config) {
        Ok(backend) => backend,
        Err(e) => {
            println!("  {} {}", "✗".red(), e);
            bail!("backend could not be created");
        }
    };

    match backend.health_check().await {
        Ok(true) => {
            println!("  {} {} is reachable", "✓".green(), backend.name());
            Ok(())
        }
        Ok(false) => {
            println!("  {} {} is not reachable", "✗".red(), backend.name());
            bail!("{} is not reachable", backend.name());
        }
        Err(e) => {
            println!("  {} health check failed: {}", "✗".red(), e);
            bail!("health check failed");
        }
    }
}

fn show_config(config: &Config, path: Option<&PathBuf>) -> Result<()> {
    let source = path
        .cloned()
        .or_else(Config::default_path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());

    println!("{} {}", "Configuration:".bold(), source);
    println!();
    println!("{}", toml::to_string_pretty(config).context("Failed to render configuration")?);
    Ok(())
}
