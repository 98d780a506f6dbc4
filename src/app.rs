//! Application entry logic shared by the binary and the integration tests.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use yansi::Paint;

use crate::actions::{validate_preserves_copy, DeleteConfig, Remover};
use crate::cli::{Cli, OutputFormat};
use crate::config::Settings;
use crate::duplicates::{DedupeEngine, DedupeReport, EngineConfig, EngineError};
use crate::error::ExitCode;
use crate::logging::init_logging;
use crate::output::{DuplicateAction, JsonOutput, TextReporter};
use crate::progress::Progress;
use crate::signal::{install_handler, ShutdownHandler};

const COUNTDOWN_TICK: Duration = Duration::from_millis(100);

/// Run the tool, writing results to stdout.
///
/// # Errors
///
/// Any configuration, scan, deletion or output failure. The run stops at
/// the first one.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Run the tool, writing results to `out`.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with_output<W: Write>(cli: Cli, out: &mut W) -> Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let settings = Settings::load(&cli).context("failed to load configuration")?;
    if cli.print_config {
        write!(out, "{}", settings.to_toml()?)?;
        return Ok(ExitCode::Success);
    }

    let root = cli
        .directory
        .as_deref()
        .context("--directory is required")?;
    let extensions = settings.extension_set()?;
    let preferred = settings.preferred_extension();
    log::debug!(
        "Scanning {} for [{}], preferred: {}",
        root.display(),
        extensions,
        preferred.as_ref().map_or("none".to_string(), ToString::to_string)
    );

    let handler = install_handler()?;

    if settings.clean {
        countdown(settings.delay_secs, &handler)?;
    }

    let progress = Arc::new(Progress::new(cli.quiet || cli.no_progress));
    let config = EngineConfig::new(extensions)
        .with_preferred(preferred)
        .with_io_threads(settings.io_threads)
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(progress);

    let report = DedupeEngine::new(config)
        .run(root)
        .with_context(|| format!("failed to scan {}", root.display()))?;

    let delete_config = if settings.trash {
        DeleteConfig::trash()
    } else {
        DeleteConfig::permanent()
    };
    let remover = settings
        .clean
        .then(|| Remover::new(delete_config).with_shutdown_flag(handler.get_flag()));

    let remover = match cli.output {
        OutputFormat::Text => write_text(&report, remover, out)?,
        OutputFormat::Json => write_json(&report, remover, out)?,
    };

    let summary = report.summary();
    log::info!(
        "{} file(s) scanned ({}), {} duplicate set(s), {} duplicate file(s), {} in duplicates, took {:.2?}",
        summary.files_cataloged,
        summary.bytes_cataloged_display(),
        summary.duplicate_groups,
        summary.duplicate_files,
        summary.duplicate_bytes_display(),
        summary.duration
    );
    if let Some(remover) = remover {
        log::info!("{}", remover.into_result().summary());
    }

    Ok(ExitCode::Success)
}

/// Print the listing, deleting each duplicate first when a remover is given.
fn write_text<W: Write>(
    report: &DedupeReport,
    mut remover: Option<Remover>,
    out: &mut W,
) -> Result<Option<Remover>> {
    let mut reporter = TextReporter::new(out);
    for set in report.sets() {
        reporter.set_header(set)?;
        match remover.as_mut() {
            Some(remover) => {
                validate_preserves_copy(set)?;
                for record in &set.duplicates {
                    let removed = remover.remove(record)?;
                    reporter.deleted(&removed.path)?;
                }
            }
            None => {
                for path in set.paths() {
                    reporter.listed(path)?;
                }
            }
        }
    }
    reporter.total(report.total_duplicate_bytes())?;
    Ok(remover)
}

/// Delete everything first (when asked), then print one JSON document.
fn write_json<W: Write>(
    report: &DedupeReport,
    mut remover: Option<Remover>,
    out: &mut W,
) -> Result<Option<Remover>> {
    let action = match remover.as_mut() {
        Some(remover) => {
            for set in report.sets() {
                remover.remove_set(set)?;
            }
            DuplicateAction::Deleted
        }
        None => DuplicateAction::Listed,
    };
    JsonOutput::new(report, action, ExitCode::Success).write_to(out, true)?;
    Ok(remover)
}

/// Warn and wait before anything is deleted. Ctrl+C aborts the run.
fn countdown(delay_secs: u64, handler: &ShutdownHandler) -> Result<(), EngineError> {
    let warning = format!(
        "WARNING: Files will begin deletion in {delay_secs} seconds. CTRL+C to stop."
    );
    eprintln!("{}", warning.yellow().bold());

    let deadline = Instant::now() + Duration::from_secs(delay_secs);
    loop {
        if handler.is_shutdown_requested() {
            log::info!("Deletion cancelled during countdown");
            return Err(EngineError::Interrupted);
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        thread::sleep(remaining.min(COUNTDOWN_TICK));
    }

    eprintln!("{}", "Starting...".bold());
    Ok(())
}
