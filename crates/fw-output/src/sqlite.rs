//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `fields.db` file in the configured output directory with
//! two tables: `fields` (one row per save) and `field_values` (one row per
//! cell, keyed by `field_id`).  Textures are stored as PNG blobs in
//! `field_textures` when feature `png` is also enabled.

use std::path::Path;

use rusqlite::Connection;

use crate::sink::FieldSink;
use crate::{FieldMetaRow, FieldSnapshot, OutputResult};

/// Writes fields to an SQLite database.
pub struct SqliteSink {
    conn:     Connection,
    finished: bool,
}

impl SqliteSink {
    /// Open (or create) `fields.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("fields.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS fields (
                 id          INTEGER PRIMARY KEY,
                 map         TEXT    NOT NULL,
                 tick        INTEGER NOT NULL,
                 width       INTEGER NOT NULL,
                 height      INTEGER NOT NULL,
                 cell_size   REAL    NOT NULL,
                 origin_x    REAL    NOT NULL,
                 origin_y    REAL    NOT NULL,
                 origin_z    REAL    NOT NULL,
                 mean_change REAL,
                 converged   INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS field_values (
                 field_id INTEGER NOT NULL REFERENCES fields(id),
                 x        INTEGER NOT NULL,
                 y        INTEGER NOT NULL,
                 value    REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS field_textures (
                 map  TEXT    NOT NULL,
                 tick INTEGER NOT NULL,
                 png  BLOB    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }

    /// Borrow the connection, e.g. to query results after the run.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl FieldSink for SqliteSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn save_field(&mut self, snapshot: &FieldSnapshot<'_>) -> OutputResult<String> {
        let row = FieldMetaRow::from(snapshot);
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO fields \
             (map, tick, width, height, cell_size, origin_x, origin_y, origin_z, mean_change, converged) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                row.map,
                row.tick as i64,
                row.width,
                row.height,
                row.cell_size,
                row.origin_x,
                row.origin_y,
                row.origin_z,
                row.mean_change,
                row.converged as i64,
            ],
        )?;
        let field_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO field_values (field_id, x, y, value) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (x, y, v) in snapshot.cells() {
                stmt.execute(rusqlite::params![field_id, x, y, v])?;
            }
        }
        tx.commit()?;
        Ok(format!("fields/{field_id}"))
    }

    #[cfg(feature = "png")]
    fn save_as_texture(
        &mut self,
        snapshot: &FieldSnapshot<'_>,
        gradient: &crate::Gradient,
    ) -> OutputResult<String> {
        let mut png = Vec::new();
        image::write_buffer_with_format(
            &mut std::io::Cursor::new(&mut png),
            &crate::texture::render_rgba(snapshot.field, gradient),
            snapshot.field.width() as u32,
            snapshot.field.height() as u32,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        self.conn.execute(
            "INSERT INTO field_textures (map, tick, png) VALUES (?1, ?2, ?3)",
            rusqlite::params![snapshot.name, snapshot.tick.0 as i64, png],
        )?;
        Ok(format!("field_textures/{}", self.conn.last_insert_rowid()))
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
