//! Batch driver: discover and extract privacy policies for a CSV of
//! domains.
//!
//! Runs N independent per-domain sessions concurrently. Sessions share
//! no mutable state; the append-only CSV writer is the single shared
//! sink, and all writes happen on the consumer loop. Every input
//! domain yields exactly one output row, even on total failure.

use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use policy_extraction::{DomainStatus, PolicyReport, PolicyScout, ScrapeConfig};

#[derive(Parser, Debug)]
#[command(
    name = "policy-scout",
    about = "Discover and extract privacy policies for a list of domains"
)]
struct Args {
    /// CSV file of domains; uses a `domain` column if present,
    /// otherwise the first column
    #[arg(long)]
    input: PathBuf,

    /// Append-only output CSV
    #[arg(long, default_value = "policy_scrape_output.csv")]
    output: PathBuf,

    /// Concurrent domain sessions
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Only process the first N domains
    #[arg(long)]
    limit: Option<usize>,
}

/// Read domain strings from CSV. Expects a header row; picks the
/// `domain` column when present, the first column otherwise.
fn read_domains<R: std::io::Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().context("reading CSV header")?.clone();
    let column = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("domain"))
        .unwrap_or(0);

    let mut domains = Vec::new();
    for record in rdr.records() {
        let record = record.context("reading CSV record")?;
        if let Some(value) = record.get(column) {
            let value = value.trim();
            if !value.is_empty() {
                domains.push(value.to_string());
            }
        }
    }
    Ok(domains)
}

/// Open the output CSV in append mode, writing the header row only
/// when the file is new.
fn open_output(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    let exists = path.exists();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening output file {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if !exists {
        writer.write_record([
            "Input Domain",
            "Privacy Policy URL",
            "Policy Text",
            "Needs Review",
        ])?;
    }
    Ok(writer)
}

fn write_report<W: std::io::Write>(writer: &mut csv::Writer<W>, report: &PolicyReport) -> Result<()> {
    let url_field = report.url_field();
    writer.write_record([
        report.domain.as_str(),
        url_field.as_str(),
        report.text_field().trim(),
        if report.needs_review { "True" } else { "False" },
    ])?;
    writer.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,policy_extraction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let args = Args::parse();

    let file = std::fs::File::open(&args.input)
        .with_context(|| format!("domain list not found: {}", args.input.display()))?;
    let mut domains = read_domains(file)?;
    if let Some(limit) = args.limit {
        domains.truncate(limit);
    }

    info!(
        domains = domains.len(),
        concurrency = args.concurrency,
        output = %args.output.display(),
        "starting batch"
    );

    let scout = Arc::new(PolicyScout::new(ScrapeConfig::default()));
    let mut writer = open_output(&args.output)?;

    // One isolated fetcher session per domain, independent timeouts,
    // so a hung domain cannot block the others.
    let mut reports = stream::iter(domains.into_iter().map(|domain| {
        let scout = Arc::clone(&scout);
        async move {
            match scout.scrape(&domain).await {
                Ok(report) => report,
                Err(e) => {
                    error!(domain = %domain, error = %e, "domain pass failed");
                    PolicyReport::flagged(domain, DomainStatus::Outdated)
                }
            }
        }
    }))
    .buffer_unordered(args.concurrency.max(1));

    let mut written = 0usize;
    while let Some(report) = reports.next().await {
        write_report(&mut writer, &report)?;
        written += 1;
    }

    info!(rows = written, "batch complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_domain_column() {
        let csv_data = "rank,domain\n1,example.com\n2,example.org\n3,\n";
        let domains = read_domains(csv_data.as_bytes()).unwrap();
        assert_eq!(domains, vec!["example.com", "example.org"]);
    }

    #[test]
    fn falls_back_to_first_column() {
        let csv_data = "site,notes\nexample.com,primary\nexample.net,secondary\n";
        let domains = read_domains(csv_data.as_bytes()).unwrap();
        assert_eq!(domains, vec!["example.com", "example.net"]);
    }

    #[test]
    fn flagged_report_renders_status_row() {
        let report = PolicyReport::flagged("slow.example.com", DomainStatus::TimedOut);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(vec![]);
        write_report(&mut writer, &report).unwrap();

        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(data.contains("slow.example.com"));
        assert!(data.contains("DOMAIN TIMED OUT"));
        assert!(data.contains("No privacy url found"));
        assert!(data.contains("False"));
    }

    #[test]
    fn found_report_renders_urls_and_review_flag() {
        let report = PolicyReport {
            domain: "example.com".to_string(),
            status: DomainStatus::Found,
            candidate_urls: vec!["https://privacy.vendor.com/policy".to_string()],
            text: "Extracted policy text.".to_string(),
            needs_review: true,
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(vec![]);
        write_report(&mut writer, &report).unwrap();

        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(data.contains("https://privacy.vendor.com/policy"));
        assert!(data.contains("Extracted policy text."));
        assert!(data.contains("True"));
    }
}
