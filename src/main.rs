//! CLI entry point for `mboxGraph`.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};

use mboxgraph::config::{self, Config};
use mboxgraph::error::GraphError;
use mboxgraph::export::{self, ExportFormat};
use mboxgraph::model::index::ArchiveIndex;
use mboxgraph::parser::mbox::MboxScanner;
use mboxgraph::stats::{self, ActivityReport, BucketWidth};

#[derive(Parser)]
#[command(
    name = "mboxgraph",
    version,
    about = "Per-sender activity charts from MBOX archives"
)]
struct Cli {
    /// MBOX file to scan
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Bucket width: year, hour, <n>d, or <n>h
    #[arg(short, long, default_value = "year")]
    bucket: BucketWidth,

    /// Output format: html, csv, or points
    #[arg(short, long, default_value = "html")]
    format: ExportFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Measurement name for line-protocol output
    #[arg(long, default_value = "mail")]
    measurement: String,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level);

    let scanner = MboxScanner::new(&cli.file)?
        .with_max_line_len(config.performance.max_line_len)
        .with_read_buffer_size(config.performance.read_buffer_size);

    let pb = ProgressBar::new(scanner.file_size());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Scanning [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut index = ArchiveIndex::new();
    let summary = scanner.scan(
        &mut |sender, timestamp| index.record(sender, timestamp),
        Some(&|current, total| {
            pb.set_length(total);
            pb.set_position(current);
        }),
    )?;
    pb.finish_and_clear();

    if index.is_empty() {
        return Err(GraphError::EmptyArchive(cli.file.clone()).into());
    }
    index.sort_chronologically();

    let report = stats::aggregate(&index, cli.bucket);

    match &cli.output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .map_err(|e| GraphError::io(path, e))?;
            render(&cli, &config, &index, &report, &mut file)?;
        }
        None => {
            let stdout = std::io::stdout();
            render(&cli, &config, &index, &report, &mut stdout.lock())?;
        }
    }

    eprintln!(
        "Scanned {} ({}) in {:.2?}: {} messages from {} senders ({} incomplete, {} unparsable dates)",
        cli.file.display(),
        format_size(scanner.file_size(), BINARY),
        start.elapsed(),
        summary.messages,
        index.sender_count(),
        summary.skipped,
        summary.bad_dates,
    );

    Ok(())
}

fn render<W: Write>(
    cli: &Cli,
    config: &Config,
    index: &ArchiveIndex,
    report: &ActivityReport,
    writer: &mut W,
) -> anyhow::Result<()> {
    match cli.format {
        ExportFormat::Html => export::html::write_chart(report, writer, &config.chart),
        ExportFormat::Csv => export::csv::write_counts(report, writer),
        ExportFormat::Points => export::points::write_points(index, writer, &cli.measurement),
    }
}

/// Set up tracing with stderr output.
fn setup_logging(level: &str) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
