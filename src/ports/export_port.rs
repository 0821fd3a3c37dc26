//! Export port trait.

use crate::domain::error::ScreenerError;
use crate::domain::screen::ScoredResult;
use crate::domain::universe::UniverseRow;
use std::path::Path;

/// Port for writing result tables.
pub trait ExportPort {
    /// Write ranked screen results restricted to `columns`, in that order.
    fn write_results(
        &self,
        results: &[ScoredResult],
        columns: &[&str],
        output_path: &Path,
    ) -> Result<(), ScreenerError>;

    /// Write the four-column universe file.
    fn write_universe(&self, rows: &[UniverseRow], output_path: &Path) -> Result<(), ScreenerError>;
}
