use crate::acquisition::publisher::FramePublisher;
use crate::acquisition::stop::StopSignal;
use crate::config::RadarConfig;
use crate::hardware::{Generator, Sampler};
use crate::prelude::{RadarError, RadarResult, ScanStatus};
use crate::processing::RangeDopplerProcessor;
use crate::telemetry::MetricsRecorder;
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-cycle state machine: arm the sampler, wait until it captures, fire
/// the generator trigger, wait for completion, read the burst and publish
/// the processed frame. Loops until the stop signal fires or a cycle fails.
pub struct Orchestrator {
    config: RadarConfig,
    sampler: Box<dyn Sampler>,
    generator: Option<Box<dyn Generator>>,
    processor: RangeDopplerProcessor,
    publisher: FramePublisher,
    stop: StopSignal,
    metrics: Arc<MetricsRecorder>,
    scan_active: bool,
    cycle: u64,
}

enum Wait {
    Reached,
    Cancelled,
}

enum CycleOutcome {
    Completed,
    Cancelled,
}

/// Hardware handed back for teardown once the cycle loop has exited.
pub(crate) struct TeardownParts {
    pub sampler: Box<dyn Sampler>,
    pub generator: Option<Box<dyn Generator>>,
    pub scan_active: bool,
}

impl Orchestrator {
    pub(crate) fn new(
        config: RadarConfig,
        sampler: Box<dyn Sampler>,
        generator: Option<Box<dyn Generator>>,
        publisher: FramePublisher,
        stop: StopSignal,
        metrics: Arc<MetricsRecorder>,
    ) -> Self {
        let processor = RangeDopplerProcessor::new(config.clone(), metrics.clone());
        Self {
            config,
            sampler,
            generator,
            processor,
            publisher,
            stop,
            metrics,
            scan_active: false,
            cycle: 0,
        }
    }

    pub(crate) async fn run_cycles(&mut self) -> RadarResult<()> {
        while !self.stop.is_set() {
            match self.run_cycle().await {
                Ok(CycleOutcome::Completed) => {
                    self.metrics.record_cycle();
                    if !self.pause(self.config.cycle_pause()).await {
                        break;
                    }
                }
                Ok(CycleOutcome::Cancelled) => break,
                Err(err) => {
                    self.close_generator_on_fault();
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    async fn run_cycle(&mut self) -> RadarResult<CycleOutcome> {
        let rate = self.sampler.arm_scan()?;
        self.scan_active = true;
        debug!("cycle {}: scan armed at {rate} S/s", self.cycle);

        // the trigger may only go out once the sampler is capturing
        if let Wait::Cancelled = self.wait_for_status(ScanStatus::Running).await? {
            return Ok(CycleOutcome::Cancelled);
        }

        if let Some(generator) = self.generator.as_mut() {
            generator.connect()?;
            generator.fire()?;
            generator.close()?;
        }

        if let Wait::Cancelled = self.wait_for_status(ScanStatus::Idle).await? {
            return Ok(CycleOutcome::Cancelled);
        }
        self.scan_active = false;

        let burst = self.sampler.read_burst()?;
        let frame = self.processor.process(&burst, rate, self.cycle);
        self.publisher.publish(frame);
        self.cycle += 1;
        Ok(CycleOutcome::Completed)
    }

    /// Bounded busy-poll of the sampler status. Cancellation is checked once
    /// per poll and again inside the pacing sleep.
    async fn wait_for_status(&mut self, wanted: ScanStatus) -> RadarResult<Wait> {
        let bound = self.config.poll_timeout();
        let started = Instant::now();
        loop {
            if self.sampler.scan_status() == wanted {
                return Ok(Wait::Reached);
            }
            if self.stop.is_set() {
                return Ok(Wait::Cancelled);
            }
            if started.elapsed() >= bound {
                return Err(RadarError::PollTimeout {
                    wanted,
                    waited: bound,
                });
            }
            if !self.pause(self.config.poll_interval()).await {
                return Ok(Wait::Cancelled);
            }
        }
    }

    /// Sleeps unless the stop signal fires first; true when the full pause
    /// elapsed.
    async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.stop.cancelled() => false,
        }
    }

    /// A faulted cycle must not leave a dangling instrument connection
    /// behind; RF output itself stays on until session teardown.
    fn close_generator_on_fault(&mut self) {
        if let Some(generator) = self.generator.as_mut() {
            if let Err(err) = generator.close() {
                warn!("closing generator after cycle fault failed: {err}");
            }
        }
    }

    pub(crate) fn into_hardware(self) -> TeardownParts {
        TeardownParts {
            sampler: self.sampler,
            generator: self.generator,
            scan_active: self.scan_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayWindow;
    use crate::frame::LiveFrame;
    use crate::hardware::SamplerKind;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn config() -> RadarConfig {
        RadarConfig {
            sampler: SamplerKind::Simulated,
            sample_rate: 8000.0,
            chirp_duration: 1e-3,
            real_chirp_duration: 1e-3,
            chirp_count: 4,
            generator_bandwidth: 1e6,
            frequency_multiplier: 18.0,
            base_frequency: 15e9,
            range_interp: 1,
            doppler_interp: 1,
            waveform_interp: 1,
            reference_chirp: 1,
            resample: false,
            resample_grid: None,
            poll_interval_secs: 0.001,
            poll_timeout_secs: 0.05,
            cycle_pause_secs: 0.001,
            display: DisplayWindow::default(),
        }
    }

    #[derive(Clone, Default)]
    struct CallLog(Arc<Mutex<Vec<String>>>);

    impl CallLog {
        fn push(&self, entry: &str) {
            self.0.lock().unwrap().push(entry.to_string());
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct ScriptedSampler {
        log: CallLog,
        statuses: Mutex<VecDeque<ScanStatus>>,
        burst: Vec<f64>,
        stop_after_read: Option<StopSignal>,
    }

    impl Sampler for ScriptedSampler {
        fn connect(&mut self) -> RadarResult<()> {
            self.log.push("connect");
            Ok(())
        }

        fn disconnect(&mut self) -> RadarResult<()> {
            self.log.push("disconnect");
            Ok(())
        }

        fn release(&mut self) -> RadarResult<()> {
            self.log.push("release");
            Ok(())
        }

        fn arm_scan(&mut self) -> RadarResult<f64> {
            self.log.push("arm");
            Ok(8000.0)
        }

        fn scan_status(&mut self) -> ScanStatus {
            let mut statuses = self.statuses.lock().unwrap();
            let status = if statuses.len() > 1 {
                statuses.pop_front().unwrap()
            } else {
                *statuses.front().unwrap()
            };
            self.log.push(match status {
                ScanStatus::Idle => "status:idle",
                ScanStatus::Running => "status:running",
            });
            status
        }

        fn stop_scan(&mut self) -> RadarResult<()> {
            self.log.push("stop_scan");
            Ok(())
        }

        fn read_burst(&mut self) -> RadarResult<Vec<f64>> {
            self.log.push("read");
            if let Some(stop) = &self.stop_after_read {
                stop.set();
            }
            Ok(self.burst.clone())
        }
    }

    struct ScriptedGenerator {
        log: CallLog,
    }

    impl Generator for ScriptedGenerator {
        fn connect(&mut self) -> RadarResult<()> {
            self.log.push("gen:connect");
            Ok(())
        }

        fn configure(&mut self, _chirp_duration: f64, _bandwidth: f64) -> RadarResult<()> {
            self.log.push("gen:configure");
            Ok(())
        }

        fn enable(&mut self) -> RadarResult<()> {
            self.log.push("gen:enable");
            Ok(())
        }

        fn fire(&mut self) -> RadarResult<()> {
            self.log.push("gen:fire");
            Ok(())
        }

        fn off(&mut self) -> RadarResult<()> {
            self.log.push("gen:off");
            Ok(())
        }

        fn close(&mut self) -> RadarResult<()> {
            self.log.push("gen:close");
            Ok(())
        }
    }

    fn orchestrator(
        cfg: RadarConfig,
        sampler: ScriptedSampler,
        generator: Option<ScriptedGenerator>,
        stop: StopSignal,
    ) -> Orchestrator {
        let (publisher, _subscriber) = FramePublisher::new(LiveFrame::zeroed(&cfg));
        Orchestrator::new(
            cfg,
            Box::new(sampler),
            generator.map(|g| Box::new(g) as Box<dyn Generator>),
            publisher,
            stop,
            Arc::new(MetricsRecorder::new()),
        )
    }

    #[tokio::test]
    async fn trigger_fires_only_after_the_sampler_runs() {
        let cfg = config();
        let log = CallLog::default();
        let stop = StopSignal::new();
        let sampler = ScriptedSampler {
            log: log.clone(),
            statuses: Mutex::new(VecDeque::from(vec![
                ScanStatus::Idle,
                ScanStatus::Running,
                ScanStatus::Idle,
            ])),
            burst: vec![0.5; cfg.burst_len()],
            stop_after_read: Some(stop.clone()),
        };
        let generator = ScriptedGenerator { log: log.clone() };
        let mut orchestrator = orchestrator(cfg, sampler, Some(generator), stop);

        orchestrator.run_cycles().await.unwrap();

        assert_eq!(
            log.entries(),
            vec![
                "arm",
                "status:idle",
                "status:running",
                "gen:connect",
                "gen:fire",
                "gen:close",
                "status:idle",
                "read",
            ]
        );
    }

    #[tokio::test]
    async fn stuck_sampler_times_out_and_closes_the_generator() {
        let cfg = config();
        let log = CallLog::default();
        let sampler = ScriptedSampler {
            log: log.clone(),
            statuses: Mutex::new(VecDeque::from(vec![ScanStatus::Idle])),
            burst: Vec::new(),
            stop_after_read: None,
        };
        let generator = ScriptedGenerator { log: log.clone() };
        let mut orchestrator = orchestrator(cfg, sampler, Some(generator), StopSignal::new());

        let err = orchestrator.run_cycles().await.unwrap_err();
        assert!(matches!(
            err,
            RadarError::PollTimeout {
                wanted: ScanStatus::Running,
                ..
            }
        ));
        assert_eq!(log.entries().last().map(String::as_str), Some("gen:close"));
    }

    #[tokio::test]
    async fn preset_stop_skips_arming_entirely() {
        let cfg = config();
        let log = CallLog::default();
        let stop = StopSignal::new();
        stop.set();
        let sampler = ScriptedSampler {
            log: log.clone(),
            statuses: Mutex::new(VecDeque::from(vec![ScanStatus::Idle])),
            burst: Vec::new(),
            stop_after_read: None,
        };
        let mut orchestrator = orchestrator(cfg, sampler, None, stop);

        orchestrator.run_cycles().await.unwrap();
        assert!(log.entries().is_empty());
    }
}
