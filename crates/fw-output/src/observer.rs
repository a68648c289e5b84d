//! `PersistenceObserver<K>` bridges `SimObserver` to a `FieldSink`.

use fw_core::Tick;
use fw_probe::RayMap;
use fw_sim::{SimObserver, TickReport};
use tracing::{info, warn};

use crate::sink::FieldSink;
use crate::{FieldSnapshot, Gradient, OutputError, OutputResult};

/// A [`SimObserver`] that saves every map once when it converges and again
/// every `save_interval` simulated seconds.
///
/// Errors from the sink are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct PersistenceObserver<K: FieldSink> {
    sink:          K,
    /// Also render a texture on every save when set.
    gradient:      Option<Gradient>,
    /// Simulated seconds between periodic saves; `0` disables them.
    save_interval: f32,
    next_save:     f32,
    handles:       Vec<String>,
    last_error:    Option<OutputError>,
}

impl<K: FieldSink> PersistenceObserver<K> {
    /// Convergence-only persistence: no periodic saves, no textures.
    pub fn new(sink: K) -> Self {
        Self {
            sink,
            gradient:      None,
            save_interval: 0.0,
            next_save:     0.0,
            handles:       Vec::new(),
            last_error:    None,
        }
    }

    /// Save every `secs` simulated seconds as well.  Non-positive or
    /// non-finite values disable periodic saves.
    pub fn with_save_interval(mut self, secs: f32) -> Self {
        self.save_interval = if secs.is_finite() && secs > 0.0 { secs } else { 0.0 };
        self.next_save = self.save_interval;
        self
    }

    /// Render a texture through `gradient` alongside every field save.
    pub fn with_textures(mut self, gradient: Gradient) -> Self {
        self.gradient = Some(gradient);
        self
    }

    /// Handles returned by the sink, in save order.
    pub fn handles(&self) -> &[String] {
        &self.handles
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Unwrap the inner sink (e.g. to inspect files after the sim).
    pub fn into_sink(self) -> K {
        self.sink
    }

    fn save(&mut self, map: &RayMap, tick: Tick) {
        let snapshot = FieldSnapshot::of_map(map, tick);
        let result = self.sink.save_field(&snapshot);
        self.store(result);
        if let Some(gradient) = &self.gradient {
            let result = self.sink.save_as_texture(&snapshot, gradient);
            self.store(result);
        }
    }

    fn store(&mut self, result: OutputResult<String>) {
        match result {
            Ok(handle) => self.handles.push(handle),
            Err(e) => {
                warn!(sink = self.sink.name(), error = %e, "field save failed");
                // Keep only the first error.
                if self.last_error.is_none() {
                    self.last_error = Some(e);
                }
            }
        }
    }
}

impl<K: FieldSink> SimObserver for PersistenceObserver<K> {
    fn on_map_converged(&mut self, tick: Tick, map: &RayMap) {
        info!(map = map.name(), %tick, "map converged, saving");
        self.save(map, tick);
    }

    fn on_tick_end(&mut self, tick: Tick, report: &TickReport, maps: &[RayMap]) {
        if self.save_interval <= 0.0 || report.elapsed_secs < self.next_save {
            return;
        }
        while self.next_save <= report.elapsed_secs {
            self.next_save += self.save_interval;
        }
        for map in maps {
            self.save(map, tick);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _maps: &[RayMap]) {
        if let Err(e) = self.sink.finish() {
            self.store(Err(e));
        }
    }
}
