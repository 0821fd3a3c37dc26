//! CSV export adapter implementing ExportPort.

use crate::domain::error::ScreenerError;
use crate::domain::screen::ScoredResult;
use crate::domain::table::{result_cell, universe_record, UNIVERSE_COLUMNS};
use crate::domain::universe::UniverseRow;
use crate::ports::export_port::ExportPort;
use std::path::Path;

pub struct CsvExportAdapter;

fn export_err(path: &Path, e: impl std::fmt::Display) -> ScreenerError {
    ScreenerError::Export {
        reason: format!("failed to write {}: {}", path.display(), e),
    }
}

impl ExportPort for CsvExportAdapter {
    fn write_results(
        &self,
        results: &[ScoredResult],
        columns: &[&str],
        output_path: &Path,
    ) -> Result<(), ScreenerError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| export_err(output_path, e))?;
        wtr.write_record(columns)
            .map_err(|e| export_err(output_path, e))?;
        for result in results {
            wtr.write_record(columns.iter().map(|c| result_cell(result, c)))
                .map_err(|e| export_err(output_path, e))?;
        }
        wtr.flush().map_err(|e| export_err(output_path, e))?;
        Ok(())
    }

    fn write_universe(&self, rows: &[UniverseRow], output_path: &Path) -> Result<(), ScreenerError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| export_err(output_path, e))?;
        wtr.write_record(UNIVERSE_COLUMNS)
            .map_err(|e| export_err(output_path, e))?;
        for row in rows {
            wtr.write_record(universe_record(row))
                .map_err(|e| export_err(output_path, e))?;
        }
        wtr.flush().map_err(|e| export_err(output_path, e))?;
        Ok(())
    }
}
