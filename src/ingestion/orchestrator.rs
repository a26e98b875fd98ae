use super::{
    FailedUnit, FailurePolicy, IngestionError, IngestionReport, ProgressSink, RowTally,
    TransformMode, UnitError,
};
use crate::source::{SourceError, SourceUnit};
use crate::transform::{map_log_unit, map_song_unit, ForeignKeyResolver};
use crate::warehouse::{Warehouse, WarehouseRow};
use tracing::{debug, error, info, warn};

/// Drives one pass over a sequence of source units.
///
/// The orchestrator holds the warehouse session exclusively for the whole
/// pass. Every unit is staged in full and then committed, so a failure never
/// leaves part of a unit behind.
pub struct IngestionOrchestrator<'a, W: Warehouse + ?Sized> {
    warehouse: &'a mut W,
    resolver: ForeignKeyResolver,
    policy: FailurePolicy,
}

impl<'a, W: Warehouse + ?Sized> IngestionOrchestrator<'a, W> {
    pub fn new(warehouse: &'a mut W, resolver: ForeignKeyResolver, policy: FailurePolicy) -> Self {
        Self {
            warehouse,
            resolver,
            policy,
        }
    }

    /// Processes `units` in order with the mapper selected by `mode`.
    ///
    /// Under [`FailurePolicy::Abort`] the first failing unit is rolled back
    /// and returned as an error. Under [`FailurePolicy::SkipUnit`] it is
    /// rolled back, recorded in the report and the pass continues.
    pub fn run<I>(
        &mut self,
        mode: TransformMode,
        units: I,
        progress: &mut dyn ProgressSink,
    ) -> Result<IngestionReport, IngestionError>
    where
        I: ExactSizeIterator<Item = Result<SourceUnit, SourceError>>,
    {
        let total = units.len();
        let mut report = IngestionReport::new(mode, total);
        progress.start(mode, total);

        for (index, next) in units.enumerate() {
            let (label, outcome) = match next {
                Ok(unit) => (unit.label(), self.load_unit(mode, &unit)),
                Err(err) => (err.path().display().to_string(), Err(err.into())),
            };

            match outcome {
                Ok(rows) => {
                    debug!("Committed {}", label);
                    report.units_committed += 1;
                    report.rows.add(&rows);
                }
                Err(err) => {
                    self.warehouse
                        .rollback()
                        .map_err(|source| IngestionError::Rollback {
                            unit: label.clone(),
                            source,
                        })?;
                    match self.policy {
                        FailurePolicy::Abort => {
                            error!("Aborting {} pass at {}: {}", mode, label, err);
                            progress.finish();
                            return Err(IngestionError::UnitFailed {
                                unit: label,
                                source: err,
                            });
                        }
                        FailurePolicy::SkipUnit => {
                            warn!("Skipping {}: {}", label, err);
                            report.failed_units.push(FailedUnit {
                                unit: label,
                                reason: err.to_string(),
                            });
                        }
                    }
                }
            }

            progress.unit_done(index + 1, total);
        }

        progress.finish();
        info!(
            "Finished {} pass: {} of {} files committed",
            mode, report.units_committed, report.units_total
        );
        Ok(report)
    }

    /// Stages and commits one unit. On error nothing has been committed and
    /// the caller must roll back.
    fn load_unit(&mut self, mode: TransformMode, unit: &SourceUnit) -> Result<RowTally, UnitError> {
        let rows = match mode {
            TransformMode::Song => self.load_song_unit(unit)?,
            TransformMode::Log => self.load_log_unit(unit)?,
        };
        self.warehouse.commit()?;
        Ok(rows)
    }

    fn load_song_unit(&mut self, unit: &SourceUnit) -> Result<RowTally, UnitError> {
        let (song, artist) = map_song_unit(unit)?;
        self.warehouse.insert(&WarehouseRow::Song(song))?;
        self.warehouse.insert(&WarehouseRow::Artist(artist))?;
        Ok(RowTally {
            songs: 1,
            artists: 1,
            ..RowTally::default()
        })
    }

    fn load_log_unit(&mut self, unit: &SourceUnit) -> Result<RowTally, UnitError> {
        let plays = map_log_unit(unit)?;
        let mut rows = RowTally::default();

        for play in plays {
            self.warehouse.insert(&WarehouseRow::Time(play.time))?;
            self.warehouse.insert(&WarehouseRow::User(play.user))?;

            let mut songplay = play.songplay;
            songplay.song_artist = self.resolver.resolve(&mut *self.warehouse, &play.lookup)?;
            if songplay.song_artist.is_some() {
                rows.songplays_resolved += 1;
            }
            self.warehouse.insert(&WarehouseRow::Songplay(songplay))?;

            rows.time += 1;
            rows.users += 1;
            rows.songplays += 1;
        }
        Ok(rows)
    }
}
