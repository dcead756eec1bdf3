//! Evidence packaging CLI
//!
//! Builds the deliverable for one report from an already rendered primary PDF,
//! a JSON manifest of report sections and a directory of evidence files.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use evidence_core::report::BoxError;
use evidence_core::{
    DirContentStore, MergeConfig, ReportGenerator, ReportOrchestrator, ReportRequest,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "evidence-pack")]
#[command(version, about = "Merge report evidence into a PDF or a ZIP package")]
struct Args {
    /// Rendered report PDF
    #[arg(long)]
    primary: PathBuf,

    /// JSON report request: subject name, report suffix and sections
    #[arg(long)]
    manifest: PathBuf,

    /// Directory holding one file per evidence id
    #[arg(long)]
    store: PathBuf,

    /// Overrides the manifest's subject name
    #[arg(long)]
    name: Option<String>,

    /// Overrides the manifest's report suffix
    #[arg(long)]
    suffix: Option<String>,

    /// Output directory
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// TOML merge configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

/// Hands out the primary PDF read from disk
struct FileGenerator {
    path: PathBuf,
}

#[async_trait]
impl ReportGenerator for FileGenerator {
    async fn render(&self, _request: &ReportRequest) -> Result<Vec<u8>, BoxError> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

async fn run(args: Args) -> Result<PathBuf> {
    let config = match &args.config {
        Some(path) => MergeConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MergeConfig::default(),
    };

    let manifest = tokio::fs::read_to_string(&args.manifest)
        .await
        .with_context(|| format!("Failed to read manifest {}", args.manifest.display()))?;
    let mut request: ReportRequest =
        serde_json::from_str(&manifest).context("Invalid manifest JSON")?;
    if let Some(name) = args.name {
        request.subject_name = name;
    }
    if let Some(suffix) = args.suffix {
        request.report_suffix = suffix;
    }

    let generator = FileGenerator { path: args.primary };
    let store = DirContentStore::new(args.store);
    let artifact = ReportOrchestrator::new(&generator, &store, &config)
        .build(&request)
        .await
        .context("Failed to build report")?;

    let path = artifact
        .write_to_dir(&args.out)
        .await
        .with_context(|| format!("Failed to write to {}", args.out.display()))?;
    tracing::info!(
        path = %path.display(),
        media_type = artifact.media_type(),
        bytes = artifact.bytes().len(),
        "Wrote report"
    );
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = run(args).await?;
    println!("{}", path.display());
    Ok(())
}
