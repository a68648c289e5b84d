//! The `FieldSink` trait implemented by all persistence backends.

use crate::{FieldSnapshot, Gradient, OutputError, OutputResult};

/// A backend that persists field snapshots.
///
/// Both save methods return an opaque handle (a path for file backends, a
/// row reference for databases).  Nothing in the simulation reads it back.
pub trait FieldSink {
    /// Short backend name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Persist the raw row-major values and grid layout of `snapshot`.
    fn save_field(&mut self, snapshot: &FieldSnapshot<'_>) -> OutputResult<String>;

    /// Persist `snapshot` rendered through `gradient`.
    ///
    /// Backends without an image encoding return
    /// [`OutputError::Unsupported`].
    fn save_as_texture(
        &mut self,
        _snapshot: &FieldSnapshot<'_>,
        _gradient: &Gradient,
    ) -> OutputResult<String> {
        Err(OutputError::Unsupported { sink: self.name(), what: "save textures" })
    }

    /// Flush and close.  Idempotent; called once when the simulation ends.
    fn finish(&mut self) -> OutputResult<()>;
}
