use serde::Serialize;
use std::sync::Mutex;

/// Counters of the acquisition loop, shared between the cycle task and the
/// status endpoint.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MetricsSnapshot {
    /// Completed acquisition cycles.
    pub cycles: usize,
    /// Frames degraded to the zero-matrix fallback.
    pub degraded_frames: usize,
    /// Chirp columns whose resample was skipped.
    pub resample_skips: usize,
    /// Teardown steps that failed and were swallowed.
    pub teardown_faults: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_cycle(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.cycles += 1;
        }
    }

    pub fn record_degraded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.degraded_frames += 1;
        }
    }

    pub fn record_resample_skip(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.resample_skips += 1;
        }
    }

    pub fn record_teardown_fault(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.teardown_faults += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let recorder = MetricsRecorder::new();
        recorder.record_cycle();
        recorder.record_cycle();
        recorder.record_degraded();
        recorder.record_teardown_fault();
        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.cycles, 2);
        assert_eq!(snapshot.degraded_frames, 1);
        assert_eq!(snapshot.resample_skips, 0);
        assert_eq!(snapshot.teardown_faults, 1);
    }
}
