use anyhow::Context;
use clap::Parser;
use fmcwcore::acquisition::Session;
use fmcwcore::view::ViewGeometry;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod bridge;
mod daq;
mod presets;
mod settings;

use bridge::LiveViewBridge;
use settings::StationSettings;

#[derive(Parser)]
#[command(author, version, about = "FMCW radar acquisition station")]
struct Args {
    /// Built-in bandwidth profile to run (200m, 600m, 1g, 140m)
    #[arg(long, default_value = "200m")]
    preset: String,
    /// Load full station settings from YAML instead of a preset
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Bind address for the live-view endpoint
    #[arg(long)]
    listen: Option<SocketAddr>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut station = if let Some(path) = args.settings.as_ref() {
        StationSettings::load(path)?
    } else {
        StationSettings::from_preset(&args.preset)?
    };
    if let Some(listen) = args.listen {
        station.bridge.listen = listen;
    }

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating station runtime")?;
    runtime.block_on(serve(station))
}

async fn serve(station: StationSettings) -> anyhow::Result<()> {
    let sampler = daq::build_sampler(&station.radar).context("selecting sampler driver")?;
    // no generator instrument is wired into this build; the session runs the
    // sampler handshake on its own
    let session = Session::start(station.radar.clone(), sampler, None)
        .await
        .context("starting acquisition session")?;

    let stop = session.stop_signal();
    let geometry = ViewGeometry::from_config(&station.radar);
    let bridge = LiveViewBridge::spawn(
        session.subscribe(),
        session.metrics(),
        geometry,
        &station.radar,
        station.bridge.clone(),
        stop.clone(),
    );
    log::info!("live view listening on {}", station.bridge.listen);

    let mut cycles = tokio::spawn(session.run());
    tokio::select! {
        pressed = signal::ctrl_c() => {
            pressed.context("awaiting Ctrl+C")?;
            log::info!("stop requested, shutting the session down");
            stop.set();
            cycles.await.context("joining acquisition task")??;
        }
        finished = &mut cycles => {
            stop.set();
            finished.context("joining acquisition task")??;
        }
    }
    bridge.shutdown().await;
    Ok(())
}
