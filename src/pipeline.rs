//! Full ETL run: the song pass, then the log pass, then a summary.

use crate::config::AppConfig;
use crate::ingestion::{
    BarProgress, IngestionOrchestrator, IngestionReport, LogProgress, ProgressSink,
    TransformMode,
};
use crate::source::{discover_files, FileSource};
use crate::transform::ForeignKeyResolver;
use crate::warehouse::{SqliteWarehouse, TableCounts};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub songs: IngestionReport,
    pub logs: IngestionReport,
    pub counts: TableCounts,
}

/// Opens the warehouse named by `config` and loads both data families into it.
pub fn run_pipeline(config: &AppConfig) -> Result<PipelineSummary> {
    let mut warehouse = SqliteWarehouse::open(config.db_path())?;
    run_pipeline_with(&mut warehouse, config)
}

/// Loads both data families into an already open warehouse.
///
/// Songs go first so that the log pass can resolve plays against them.
pub fn run_pipeline_with(
    warehouse: &mut SqliteWarehouse,
    config: &AppConfig,
) -> Result<PipelineSummary> {
    let songs = run_pass(warehouse, config, TransformMode::Song, &config.song_data)?;
    let logs = run_pass(warehouse, config, TransformMode::Log, &config.log_data)?;
    let counts = warehouse.counts()?;

    let summary = PipelineSummary {
        songs,
        logs,
        counts,
    };
    log_summary(&summary);
    Ok(summary)
}

fn run_pass(
    warehouse: &mut SqliteWarehouse,
    config: &AppConfig,
    mode: TransformMode,
    root: &Path,
) -> Result<IngestionReport> {
    let files = discover_files(root, &config.file_extension)
        .with_context(|| format!("Failed to list {} files in {:?}", mode, root))?;

    let mut progress: Box<dyn ProgressSink> = if config.progress_bar {
        Box::new(BarProgress::new())
    } else {
        Box::new(LogProgress)
    };

    let report = IngestionOrchestrator::new(
        warehouse,
        ForeignKeyResolver::new(config.duration_tolerance),
        config.failure_policy,
    )
    .run(mode, FileSource::new(files), progress.as_mut())
    .with_context(|| format!("The {} pass failed", mode))?;
    Ok(report)
}

fn log_summary(summary: &PipelineSummary) {
    info!("");
    info!("ETL Summary");
    info!("===========");
    for report in [&summary.songs, &summary.logs] {
        info!(
            "{} files: {} processed, {} committed, {} failed",
            report.mode,
            report.units_processed(),
            report.units_committed,
            report.failed_units.len()
        );
        for failed in &report.failed_units {
            warn!("  skipped {}: {}", failed.unit, failed.reason);
        }
    }
    let rows = &summary.logs.rows;
    info!(
        "Rows loaded: {} songs, {} artists, {} users, {} time, {} songplays ({} resolved)",
        summary.songs.rows.songs,
        summary.songs.rows.artists,
        rows.users,
        rows.time,
        rows.songplays,
        rows.songplays_resolved
    );

    info!("");
    info!("Warehouse contains:");
    info!("  Songs: {}", summary.counts.songs);
    info!("  Artists: {}", summary.counts.artists);
    info!("  Users: {}", summary.counts.users);
    info!("  Time: {}", summary.counts.time);
    info!("  Songplays: {}", summary.counts.songplays);
}
