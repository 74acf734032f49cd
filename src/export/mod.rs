//! CSV export of fetched data
//!
//! Each container goes to its own file with the index (date or region) as the
//! first column and the keyword as the value column header. Existing files
//! are overwritten.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::models::{InterestSeries, RegionalInterest};
use crate::utils::error::ExportError;

/// Header of the series index column
pub const DATE_COLUMN: &str = "date";

/// Header of the regional index column
pub const REGION_COLUMN: &str = "geoName";

/// Writes exports into a directory
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `series` to `file_name` inside the export directory
    ///
    /// # Errors
    ///
    /// `ExportError::NoData` for an empty series, `Io`/`Csv` on write failure.
    pub fn write_series(
        &self,
        series: &InterestSeries,
        file_name: &str,
    ) -> Result<PathBuf, ExportError> {
        if series.is_empty() {
            return Err(ExportError::NoData);
        }

        let path = self.dir.join(file_name);
        let file = self.create(&path)?;
        write_series_to(file, series).map_err(|source| ExportError::Csv {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), rows = series.len(), "Series exported");
        Ok(path)
    }

    /// Write `regional` to `file_name` inside the export directory
    ///
    /// # Errors
    ///
    /// `ExportError::NoData` when there are no regions, `Io`/`Csv` on write
    /// failure.
    pub fn write_regional(
        &self,
        regional: &RegionalInterest,
        file_name: &str,
    ) -> Result<PathBuf, ExportError> {
        if regional.is_empty() {
            return Err(ExportError::NoData);
        }

        let path = self.dir.join(file_name);
        let file = self.create(&path)?;
        write_regional_to(file, regional).map_err(|source| ExportError::Csv {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), regions = regional.len(), "Regional data exported");
        Ok(path)
    }

    /// Write an arbitrary text document (charts) inside the export directory
    ///
    /// # Errors
    ///
    /// `ExportError::Io` on write failure.
    pub fn write_document(&self, contents: &str, file_name: &str) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(file_name);
        let mut file = self.create(&path)?;
        file.write_all(contents.as_bytes())
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    fn create(&self, path: &Path) -> Result<File, ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ExportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        File::create(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Write `series` as CSV (`date,<keyword>`) to any writer
///
/// # Errors
///
/// Returns the underlying CSV error.
pub fn write_series_to<W: Write>(writer: W, series: &InterestSeries) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([DATE_COLUMN, series.keyword()])?;

    for point in series.points() {
        wtr.write_record([point.date.format("%Y-%m-%d").to_string(), point.score.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `regional` as CSV (`geoName,<keyword>`) to any writer
///
/// # Errors
///
/// Returns the underlying CSV error.
pub fn write_regional_to<W: Write>(
    writer: W,
    regional: &RegionalInterest,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([REGION_COLUMN, regional.keyword()])?;

    for region in regional.regions() {
        wtr.write_record([region.name.clone(), region.score.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}
