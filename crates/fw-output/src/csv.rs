//! CSV output backend.
//!
//! Creates in the configured output directory:
//! - `fields.csv`: one metadata row per saved field
//! - `<map>_t<tick>.csv`: `x,y,value` for every cell of that save
//! - `<map>_t<tick>.png`: textures (feature `png`)

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::debug;

use crate::sink::FieldSink;
use crate::{FieldMetaRow, FieldSnapshot, OutputResult};
#[cfg(feature = "png")]
use crate::Gradient;

/// Writes fields as CSV files and, with feature `png`, PNG textures.
pub struct CsvSink {
    dir:      PathBuf,
    meta:     Writer<File>,
    finished: bool,
}

impl CsvSink {
    /// Create `dir` if needed, then open `fields.csv` and write its header.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        let mut meta = Writer::from_path(dir.join("fields.csv"))?;
        meta.write_record([
            "map", "tick", "width", "height", "cell_size", "origin_x", "origin_y", "origin_z",
            "mean_change", "converged", "file",
        ])?;
        Ok(Self { dir: dir.to_path_buf(), meta, finished: false })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_meta(&mut self, row: &FieldMetaRow, file: &Path) -> OutputResult<()> {
        let file_name = file.file_name().map(|f| f.to_string_lossy().into_owned()).unwrap_or_default();
        self.meta.write_record(&[
            row.map.clone(),
            row.tick.to_string(),
            row.width.to_string(),
            row.height.to_string(),
            row.cell_size.to_string(),
            row.origin_x.to_string(),
            row.origin_y.to_string(),
            row.origin_z.to_string(),
            row.mean_change.map(|c| c.to_string()).unwrap_or_default(),
            (row.converged as u8).to_string(),
            file_name,
        ])?;
        self.meta.flush()?;
        Ok(())
    }
}

impl FieldSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn save_field(&mut self, snapshot: &FieldSnapshot<'_>) -> OutputResult<String> {
        let path = self.dir.join(format!("{}.csv", snapshot.file_stem()));
        let mut values = Writer::from_path(&path)?;
        values.write_record(["x", "y", "value"])?;
        for (x, y, v) in snapshot.cells() {
            values.write_record(&[x.to_string(), y.to_string(), v.to_string()])?;
        }
        values.flush()?;

        self.write_meta(&FieldMetaRow::from(snapshot), &path)?;
        debug!(map = snapshot.name, tick = %snapshot.tick, path = %path.display(), "field saved");
        Ok(path.display().to_string())
    }

    #[cfg(feature = "png")]
    fn save_as_texture(&mut self, snapshot: &FieldSnapshot<'_>, gradient: &Gradient) -> OutputResult<String> {
        let path = self.dir.join(format!("{}.png", snapshot.file_stem()));
        crate::texture::write_png(&path, snapshot.field, gradient)?;
        debug!(map = snapshot.name, tick = %snapshot.tick, path = %path.display(), "texture saved");
        Ok(path.display().to_string())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.meta.flush()?;
        Ok(())
    }
}
