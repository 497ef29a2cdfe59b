use crate::acquisition::orchestrator::{Orchestrator, TeardownParts};
use crate::acquisition::publisher::{FramePublisher, FrameSubscriber};
use crate::acquisition::stop::StopSignal;
use crate::config::RadarConfig;
use crate::frame::LiveFrame;
use crate::hardware::{Generator, Sampler};
use crate::prelude::{RadarError, RadarResult};
use crate::telemetry::MetricsRecorder;
use log::warn;
use std::sync::Arc;
use tokio::task;

/// One acquisition session: owns the configuration, the connected hardware
/// and the cycle loop. The configuration cannot change while the session
/// lives; a new one means running this session to completion and starting
/// another.
pub struct Session {
    orchestrator: Orchestrator,
    subscriber: FrameSubscriber,
    stop: StopSignal,
    metrics: Arc<MetricsRecorder>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Prepares the generator, connects the sampler (off the async scheduler,
    /// the call blocks) and sizes the transform state. Start-up failures
    /// abort the attempt; hardware already brought up is wound back down.
    pub async fn start(
        config: RadarConfig,
        sampler: Box<dyn Sampler>,
        mut generator: Option<Box<dyn Generator>>,
    ) -> RadarResult<Self> {
        config.validate()?;

        if let Some(gen) = generator.as_mut() {
            prepare_generator(gen.as_mut(), &config)?;
        }

        let connected = task::spawn_blocking(move || {
            let mut sampler = sampler;
            sampler.connect().map(|()| sampler)
        })
        .await;
        let sampler = match connected {
            Ok(Ok(sampler)) => sampler,
            Ok(Err(err)) => {
                wind_down_generator(&mut generator);
                return Err(err);
            }
            Err(join_err) => {
                wind_down_generator(&mut generator);
                return Err(RadarError::Connect(format!(
                    "sampler connect task failed: {join_err}"
                )));
            }
        };

        let stop = StopSignal::new();
        let metrics = Arc::new(MetricsRecorder::new());
        let (publisher, subscriber) = FramePublisher::new(LiveFrame::zeroed(&config));
        let orchestrator = Orchestrator::new(
            config,
            sampler,
            generator,
            publisher,
            stop.clone(),
            metrics.clone(),
        );

        Ok(Self {
            orchestrator,
            subscriber,
            stop,
            metrics,
        })
    }

    /// Signal observed by every wait point of the cycle loop.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn subscribe(&self) -> FrameSubscriber {
        self.subscriber.clone()
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    /// Runs acquisition cycles until the stop signal fires or a cycle fails,
    /// then tears the hardware down. Consuming `self` makes teardown run
    /// exactly once, whichever path ended the loop.
    pub async fn run(self) -> RadarResult<()> {
        let Session {
            mut orchestrator,
            stop: _stop,
            metrics,
            subscriber: _subscriber,
        } = self;
        let outcome = orchestrator.run_cycles().await;
        teardown(orchestrator.into_hardware(), metrics).await;
        outcome
    }
}

fn prepare_generator(generator: &mut dyn Generator, config: &RadarConfig) -> RadarResult<()> {
    generator.connect()?;
    generator.configure(config.chirp_duration, config.generator_bandwidth)?;
    generator.enable()?;
    Ok(())
}

fn wind_down_generator(generator: &mut Option<Box<dyn Generator>>) {
    if let Some(gen) = generator.as_mut() {
        if let Err(err) = gen.off() {
            warn!("generator off after failed start: {err}");
        }
        if let Err(err) = gen.close() {
            warn!("closing generator after failed start: {err}");
        }
    }
}

/// Fail-safe shutdown: every step runs even when earlier ones fail, so a
/// faulted sampler can never keep the RF output on. Failures are logged and
/// counted, never re-raised.
async fn teardown(parts: TeardownParts, metrics: Arc<MetricsRecorder>) {
    let TeardownParts {
        mut sampler,
        generator,
        scan_active,
    } = parts;

    if scan_active {
        if let Err(err) = sampler.stop_scan() {
            warn!("stopping scan during teardown failed: {err}");
            metrics.record_teardown_fault();
        }
    }

    // disconnect/release block, so they run off the scheduler like connect
    let blocking_metrics = metrics.clone();
    let joined = task::spawn_blocking(move || {
        if let Err(err) = sampler.disconnect() {
            warn!("disconnecting sampler failed: {err}");
            blocking_metrics.record_teardown_fault();
        }
        if let Err(err) = sampler.release() {
            warn!("releasing sampler failed: {err}");
            blocking_metrics.record_teardown_fault();
        }
    })
    .await;
    if let Err(err) = joined {
        warn!("sampler teardown task failed: {err}");
        metrics.record_teardown_fault();
    }

    if let Some(mut generator) = generator {
        if let Err(err) = generator.off() {
            warn!("turning generator output off failed: {err}");
            metrics.record_teardown_fault();
        }
        if let Err(err) = generator.close() {
            warn!("closing generator failed: {err}");
            metrics.record_teardown_fault();
        }
    }
}
