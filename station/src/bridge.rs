use fmcwcore::acquisition::{FrameSubscriber, StopSignal};
use fmcwcore::config::RadarConfig;
use fmcwcore::frame::LiveFrame;
use fmcwcore::telemetry::MetricsRecorder;
use fmcwcore::view::ViewGeometry;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use warp::Filter;

/// Options for the HTTP live view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub listen: SocketAddr,
    /// Display refresh period in seconds.
    pub refresh_secs: f64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 9000)),
            refresh_secs: 0.1,
        }
    }
}

/// JSON view of the latest map, restricted to the display windows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameView {
    pub distance_m: Vec<f64>,
    pub velocity_mps: Vec<f64>,
    pub intensity: Vec<Vec<f64>>,
    pub cycle: u64,
    pub rate: f64,
}

/// JSON view of the reference-chirp waveform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveformView {
    pub time_s: Vec<f64>,
    pub amplitude: Vec<f64>,
}

#[derive(Default)]
struct ViewState {
    frame: FrameView,
    waveform: WaveformView,
}

/// Hosts the live-view endpoint and the refresh task that pulls the latest
/// frame at its own cadence. The display has no feedback path into the
/// acquisition core; every route is read-only.
pub struct LiveViewBridge {
    server: JoinHandle<()>,
    refresh: JoinHandle<()>,
}

impl LiveViewBridge {
    pub fn spawn(
        subscriber: FrameSubscriber,
        metrics: Arc<MetricsRecorder>,
        geometry: ViewGeometry,
        radar: &RadarConfig,
        settings: BridgeSettings,
        stop: StopSignal,
    ) -> Self {
        let state = Arc::new(RwLock::new(ViewState::default()));

        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let metrics_filter = warp::any().map(move || metrics.clone());
        let stop_for_filter = stop.clone();
        let stop_filter = warp::any().map(move || stop_for_filter.clone());

        let frame_route = warp::path("frame")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<ViewState>>| match state.read() {
                Ok(guard) => warp::reply::json(&guard.frame),
                Err(_) => warp::reply::json(&FrameView::default()),
            });

        let waveform_route = warp::path("waveform")
            .and(warp::get())
            .and(state_filter)
            .map(|state: Arc<RwLock<ViewState>>| match state.read() {
                Ok(guard) => warp::reply::json(&guard.waveform),
                Err(_) => warp::reply::json(&WaveformView::default()),
            });

        let status_route = warp::path("status")
            .and(warp::get())
            .and(metrics_filter)
            .and(stop_filter)
            .map(|metrics: Arc<MetricsRecorder>, stop: StopSignal| {
                warp::reply::json(&json!({
                    "scanning": !stop.is_set(),
                    "metrics": metrics.snapshot(),
                }))
            });

        let routes = frame_route.or(waveform_route).or(status_route);
        let server = tokio::spawn(warp::serve(routes).run(settings.listen));

        let refresh = tokio::spawn(refresh_loop(
            subscriber,
            geometry,
            radar.waveform_interp as f64,
            state,
            Duration::from_secs_f64(settings.refresh_secs),
            stop,
        ));

        Self { server, refresh }
    }

    pub async fn shutdown(self) {
        self.server.abort();
        let _ = self.refresh.await;
    }
}

async fn refresh_loop(
    subscriber: FrameSubscriber,
    geometry: ViewGeometry,
    waveform_interp: f64,
    state: Arc<RwLock<ViewState>>,
    period: Duration,
    stop: StopSignal,
) {
    let mut ticker = time::interval(period);
    // a refresh still in flight when the next tick lands is dropped, not
    // queued behind it
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = stop.cancelled() => break,
            _ = ticker.tick() => {
                let frame = subscriber.latest();
                let view = render(&frame, &geometry, waveform_interp);
                if let Ok(mut guard) = state.write() {
                    *guard = view;
                }
            }
        }
    }
}

fn render(frame: &LiveFrame, geometry: &ViewGeometry, waveform_interp: f64) -> ViewState {
    let masked = geometry.masked_map(&frame.map);
    ViewState {
        frame: FrameView {
            distance_m: geometry.masked_range_axis(),
            velocity_mps: geometry.masked_velocity_axis(),
            intensity: masked.outer_iter().map(|row| row.to_vec()).collect(),
            cycle: frame.cycle,
            rate: frame.rate,
        },
        waveform: WaveformView {
            time_s: (0..frame.waveform.len())
                .map(|i| i as f64 / (frame.rate * waveform_interp))
                .collect(),
            amplitude: frame.waveform.to_vec(),
        },
    }
}
