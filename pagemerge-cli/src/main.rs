//! pagemerge - Merge PDF documents and page selections into a single file.

mod cli;

use clap::Parser;
use std::io::Write;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pagemerge::MergeSession;
use pagemerge::config::{Config, OutputMode, OverwriteMode};
use pagemerge::error::PageMergeError;
use pagemerge::io::{PdfReader, PdfWriter, SaveOutput};
use pagemerge::merge::{MergeOptions, MergePlan, MergeStatistics};
use pagemerge::output::{
    OutputFormatter, describe_save_output, display_merge_statistics, display_plan,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Default log level when `RUST_LOG` is not set.
fn log_level(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pagemerge={}", log_level(verbose, quiet))));

    // Logs share stderr with user messages; stdout may carry the PDF.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PageMergeError> {
    let sources = cli.get_all_sources().await?;
    let config = cli.to_config(sources)?;
    tracing::debug!(?config, "resolved configuration");

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() && !config.dry_run {
        formatter.section(&format!("{} v{}", pagemerge::NAME, pagemerge::VERSION));
        formatter.blank_line();
    }

    if config.dry_run {
        let plan = run_blocking({
            let config = config.clone();
            move || build_plan(&config)
        })
        .await?;
        return display_plan(&formatter, &plan, config.plan_json);
    }

    if config.mode == OutputMode::File {
        handle_output_overwrite(&config, &formatter).await?;
        PdfWriter::new().can_write(&config.output)?;
    }

    formatter.info(&format!("Merging {} source(s)...", config.sources().len()));

    let (stats, output) = run_blocking({
        let config = config.clone();
        move || merge_and_save(&config)
    })
    .await?;

    if let SaveOutput::Bytes(ref bytes) = output {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()?;
    }

    if formatter.should_print() {
        display_merge_statistics(&formatter, &stats);
        formatter.success(&describe_save_output(&output));
        if formatter.is_verbose() && !config.metadata.is_empty() {
            for (field, value) in config.metadata.fields() {
                formatter.detail(&field.to_string(), value);
            }
        }
    }

    Ok(())
}

/// Run synchronous merge work off the async runtime.
async fn run_blocking<T, F>(work: F) -> Result<T, PageMergeError>
where
    F: FnOnce() -> Result<T, PageMergeError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| PageMergeError::other(format!("Merge task failed: {err}")))?
}

fn build_plan(config: &Config) -> Result<MergePlan, PageMergeError> {
    MergePlan::build(
        config.sources(),
        &PdfReader::new(),
        config.duplex,
        config.orientation,
    )
}

/// Merge every configured source and save the result.
fn merge_and_save(config: &Config) -> Result<(MergeStatistics, SaveOutput), PageMergeError> {
    let mut session =
        MergeSession::new().with_writer(PdfWriter::with_compression(config.compression));
    for spec in config.sources() {
        session.add_spec(spec.clone())?;
    }

    let options = MergeOptions {
        orientation: config.orientation,
        duplex: config.duplex,
    };
    let stats = session.merge_with(options, &config.metadata)?.clone();
    let output = session.save(&config.output, config.mode)?;

    Ok((stats, output))
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), PageMergeError> {
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PageMergeError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // Quiet runs cannot ask, so they behave like --no-clobber.
            if formatter.is_quiet() {
                return Err(PageMergeError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            print!("Overwrite? [y/N]: ");
            std::io::stdout().flush().ok();

            let mut response = String::new();
            std::io::stdin()
                .read_line(&mut response)
                .map_err(|err| PageMergeError::other(format!("Failed to read input: {err}")))?;

            match response.trim().to_lowercase().as_str() {
                "y" | "yes" => Ok(()),
                _ => Err(PageMergeError::Cancelled),
            }
        }
    }
}
