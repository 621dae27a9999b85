//! Writing placements out for other tools.
//!
//! Feature-gated behind `placement-io`. The optimizer itself never touches
//! the filesystem; these helpers are for callers that persist results.

use std::io::Write;
use std::path::Path;

use crate::optimizer::Placement;
use crate::report::PlacementReport;

/// Error type for placement save/load operations.
#[derive(Debug, thiserror::Error)]
pub enum PlacementIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("deserialization error: {0}")]
    Deserialize(#[source] serde_json::Error),
}

impl Placement {
    /// Write one `x_meter,y_meter` row per tower, after a header row.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), PlacementIoError> {
        writeln!(writer, "x_meter,y_meter")?;
        for p in self {
            writeln!(writer, "{:.2},{:.2}", p.x(), p.y())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save the tower positions as a CSV file.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<(), PlacementIoError> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }
}

impl PlacementReport {
    /// Save the report as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), PlacementIoError> {
        let json = serde_json::to_string_pretty(self).map_err(PlacementIoError::Serialize)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PlacementIoError> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(PlacementIoError::Deserialize)
    }
}
