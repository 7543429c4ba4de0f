//! `run` command: build the pipeline from config and emit the digest.

use std::path::Path;

use anyhow::Context;
use newsdigest_core::AppConfig;
use newsdigest_ingest::{ConfiguredListing, DigestSummarizer, Pipeline};

use crate::report;
use crate::OutputFormat;

/// Execute one digest run and write the rendered report.
///
/// # Errors
///
/// Returns an error if the company list cannot be resolved, a client cannot
/// be built, or the output cannot be written. Listing and page failures do
/// not surface here; they are recorded per topic in the report.
pub(crate) async fn run_digest(
    mut config: AppConfig,
    company_filter: Vec<String>,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    if !company_filter.is_empty() {
        config.companies_override = Some(company_filter);
    }
    let companies = newsdigest_core::resolve_companies(&config)
        .with_context(|| format!("loading companies from {}", config.companies_path.display()))?;

    let listing = ConfiguredListing::from_config(&config).context("building listing source")?;
    let summarizer = DigestSummarizer::from_config(&config).context("building summarizer")?;
    tracing::info!(
        provider = %config.listing_provider,
        summarizer = summarizer.name(),
        companies = companies.len(),
        "digest configured"
    );

    let pipeline = Pipeline::new(config, listing, summarizer).context("building pipeline")?;
    let digest = pipeline.run(&companies).await;

    let rendered = match format {
        OutputFormat::Json => report::render_json(&digest)?,
        OutputFormat::Text => report::render_text(&digest)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing digest to {}", path.display()))?;
            tracing::info!(path = %path.display(), "digest written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
