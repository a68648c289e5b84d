//! Parquet output backend (feature `parquet`).
//!
//! Appends every save to two files in the configured output directory:
//! - `fields.parquet`: one metadata row per save
//! - `field_values.parquet`: `map, tick, x, y, value` per cell

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{BooleanBuilder, Float32Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::sink::FieldSink;
use crate::{FieldMetaRow, FieldSnapshot, OutputResult};

fn meta_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("map",         DataType::Utf8,    false),
        Field::new("tick",        DataType::UInt64,  false),
        Field::new("width",       DataType::UInt32,  false),
        Field::new("height",      DataType::UInt32,  false),
        Field::new("cell_size",   DataType::Float32, false),
        Field::new("origin_x",    DataType::Float32, false),
        Field::new("origin_y",    DataType::Float32, false),
        Field::new("origin_z",    DataType::Float32, false),
        Field::new("mean_change", DataType::Float32, true),
        Field::new("converged",   DataType::Boolean, false),
    ]))
}

fn values_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("map",   DataType::Utf8,    false),
        Field::new("tick",  DataType::UInt64,  false),
        Field::new("x",     DataType::UInt32,  false),
        Field::new("y",     DataType::UInt32,  false),
        Field::new("value", DataType::Float32, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes fields to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetSink {
    meta:          Option<ArrowWriter<File>>,
    values:        Option<ArrowWriter<File>>,
    meta_schema:   Arc<Schema>,
    values_schema: Arc<Schema>,
    saves:         u64,
}

impl ParquetSink {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        let meta_schema = meta_schema();
        let values_schema = values_schema();

        let meta = ArrowWriter::try_new(
            File::create(dir.join("fields.parquet"))?,
            Arc::clone(&meta_schema),
            Some(snappy_props()),
        )?;
        let values = ArrowWriter::try_new(
            File::create(dir.join("field_values.parquet"))?,
            Arc::clone(&values_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            meta: Some(meta),
            values: Some(values),
            meta_schema,
            values_schema,
            saves: 0,
        })
    }
}

impl FieldSink for ParquetSink {
    fn name(&self) -> &'static str {
        "parquet"
    }

    fn save_field(&mut self, snapshot: &FieldSnapshot<'_>) -> OutputResult<String> {
        let (Some(meta), Some(values)) = (self.meta.as_mut(), self.values.as_mut()) else {
            return Ok(String::new());
        };
        let row = FieldMetaRow::from(snapshot);

        let mut maps        = StringBuilder::new();
        let mut ticks       = UInt64Builder::new();
        let mut widths      = UInt32Builder::new();
        let mut heights     = UInt32Builder::new();
        let mut cell_sizes  = Float32Builder::new();
        let mut origin_xs   = Float32Builder::new();
        let mut origin_ys   = Float32Builder::new();
        let mut origin_zs   = Float32Builder::new();
        let mut changes     = Float32Builder::new();
        let mut converged   = BooleanBuilder::new();

        maps.append_value(&row.map);
        ticks.append_value(row.tick);
        widths.append_value(row.width);
        heights.append_value(row.height);
        cell_sizes.append_value(row.cell_size);
        origin_xs.append_value(row.origin_x);
        origin_ys.append_value(row.origin_y);
        origin_zs.append_value(row.origin_z);
        changes.append_option(row.mean_change);
        converged.append_value(row.converged);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.meta_schema),
            vec![
                Arc::new(maps.finish()),
                Arc::new(ticks.finish()),
                Arc::new(widths.finish()),
                Arc::new(heights.finish()),
                Arc::new(cell_sizes.finish()),
                Arc::new(origin_xs.finish()),
                Arc::new(origin_ys.finish()),
                Arc::new(origin_zs.finish()),
                Arc::new(changes.finish()),
                Arc::new(converged.finish()),
            ],
        )?;
        meta.write(&batch)?;

        let mut maps   = StringBuilder::new();
        let mut ticks  = UInt64Builder::new();
        let mut xs     = UInt32Builder::new();
        let mut ys     = UInt32Builder::new();
        let mut vals   = Float32Builder::new();
        for (x, y, v) in snapshot.cells() {
            maps.append_value(snapshot.name);
            ticks.append_value(row.tick);
            xs.append_value(x);
            ys.append_value(y);
            vals.append_value(v);
        }
        let batch = RecordBatch::try_new(
            Arc::clone(&self.values_schema),
            vec![
                Arc::new(maps.finish()),
                Arc::new(ticks.finish()),
                Arc::new(xs.finish()),
                Arc::new(ys.finish()),
                Arc::new(vals.finish()),
            ],
        )?;
        values.write(&batch)?;

        let handle = format!("field_values.parquet#{}", self.saves);
        self.saves += 1;
        Ok(handle)
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.meta.take() {
            w.close()?;
        }
        if let Some(w) = self.values.take() {
            w.close()?;
        }
        Ok(())
    }
}
