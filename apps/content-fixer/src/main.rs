//! content-fixer binary
//!
//! Exit codes: 0 success, 1 analyze found HIGH-severity claims, 2 hard
//! failure (configuration, fetch or report writing).

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use compliance_engine::ComplianceEngine;
use content_fixer::config::FixerConfig;
use content_fixer::driver::{BatchDriver, Pass, Passes, RunMode, RunOptions};
use content_fixer::report::{ConsoleReporter, OutputFormat, Reporter};
use content_fixer::source::{ContentCache, ContentSource};
use content_fixer::store::{ContentStore, DocumentQuery, HttpContentStore};
use shared_types::{RichTextDocument, Severity};

#[derive(Parser, Debug)]
#[command(name = "content-fixer")]
#[command(
    version,
    about = "Repair leaked markdown and unverifiable claims in content-store rich text"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Document type to process (default from config: blogPost)
    #[arg(long = "type", global = true)]
    document_type: Option<String>,

    /// Report file format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report markdown leaks and claims without writing anything
    Analyze {
        /// Only these slugs (repeatable)
        #[arg(long = "slug")]
        slugs: Vec<String>,
    },
    /// Apply fixes and commit changed documents
    Fix {
        /// Run a single pass
        #[arg(long, value_enum)]
        only: Option<Pass>,

        /// Only these slugs (repeatable)
        #[arg(long = "slug")]
        slugs: Vec<String>,
    },
    /// Load one page (store first, then markdown file) and print its analysis
    Preview { slug: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("content_fixer=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config =
        FixerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(document_type) = cli.document_type {
        config.run.document_type = document_type;
    }

    match cli.command {
        Command::Analyze { slugs } => {
            batch(&config, RunMode::Analyze, Passes::default(), slugs, cli.format).await
        }
        Command::Fix { only, slugs } => {
            let passes = only.map(Passes::only).unwrap_or_default();
            batch(&config, RunMode::Fix, passes, slugs, cli.format).await
        }
        Command::Preview { slug } => preview(&config, &slug).await,
    }
}

fn engine(config: &FixerConfig) -> ComplianceEngine {
    ComplianceEngine::with_allow_list(&config.compliance.allow_list)
}

fn connect(config: &FixerConfig, needs_write: bool) -> anyhow::Result<Arc<dyn ContentStore>> {
    let settings = config
        .store_settings(needs_write)
        .context("Invalid content store configuration")?;
    tracing::info!("Content store: {} (dataset {})", settings.url, settings.dataset);
    let store = HttpContentStore::new(&settings).context("Failed to build HTTP client")?;
    Ok(Arc::new(store))
}

async fn batch(
    config: &FixerConfig,
    mode: RunMode,
    passes: Passes,
    slugs: Vec<String>,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let store = connect(config, mode == RunMode::Fix)?;

    let slugs = if slugs.is_empty() {
        config.run.slugs.clone()
    } else {
        slugs
    };
    let query = DocumentQuery::new(&config.run.document_type, &config.run.body_field)
        .with_slugs(slugs);

    let options = RunOptions {
        mode,
        passes,
        body_field: config.run.body_field.clone(),
        delay: config.run.delay(),
    };
    let summary = BatchDriver::new(store, engine(config), options)
        .run(&query)
        .await;

    Reporter::new(OutputFormat::Console).report(&summary)?;
    let path = Reporter::new(format).write_report(&summary, &config.run.report_dir)?;
    tracing::info!("Report written to {}", path.display());

    Ok(ExitCode::from(summary.exit_code()))
}

async fn preview(config: &FixerConfig, slug: &str) -> anyhow::Result<ExitCode> {
    let store = connect(config, false)?;
    let query = DocumentQuery::new(&config.run.document_type, &config.run.body_field);
    let source = ContentSource::new(
        store.clone(),
        Arc::new(ContentCache::new()),
        config.run.markdown_dir.clone(),
        query,
    );
    let page = source
        .page(slug)
        .await
        .with_context(|| format!("Failed to load page {:?}", slug))?;

    let mut options = RunOptions::new(RunMode::Analyze);
    options.body_field = config.run.body_field.clone();
    let driver = BatchDriver::new(store, engine(config), options);
    let processed = driver.process(RichTextDocument {
        id: page.id().to_string(),
        title: Some(page.title.clone()),
        slug: Some(page.slug.clone()),
        blocks: page.blocks,
    });

    print!("{}", ConsoleReporter::format_document(&processed.report)?);
    let high = processed
        .report
        .changes
        .iter()
        .any(|change| change.severity == Severity::High);
    Ok(ExitCode::from(u8::from(high)))
}
