//! SkyFMS CLI - run the flight-management core against a live simulator.
//!
//! Binds a UDP socket for the simulator's data output, feeds every
//! decoded sample into the core, and logs a navigation summary at a
//! fixed interval until interrupted.

mod feed;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::UdpSocket;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use skyfms::plan::PlanSource;
use skyfms::{Fms, FmsConfig};

use feed::FeedState;

#[derive(Parser, Debug)]
#[command(name = "skyfms", version, about = "Flight-management core runner")]
struct Cli {
    /// Planning-service username to fetch the OFP for
    #[arg(long)]
    simbrief_user: String,

    /// Local OFP cache file (read before fetching, written after)
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Skip the cache and always fetch a fresh plan
    #[arg(long)]
    force_download: bool,

    /// UDP address to receive simulator data output on
    #[arg(long, default_value = "0.0.0.0:49000")]
    listen: String,

    /// Seconds between navigation summary log lines
    #[arg(long, default_value_t = 5)]
    status_interval: u64,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut source = match PlanSource::new(&cli.simbrief_user) {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "Could not build plan source");
            return std::process::ExitCode::FAILURE;
        }
    };
    if let Some(path) = &cli.cache_file {
        source = source.with_cache_file(path);
    }

    let fms = Arc::new(Fms::new(FmsConfig::default()));
    source.spawn_install(Arc::clone(&fms), cli.force_download);

    let socket = match UdpSocket::bind(&cli.listen).await {
        Ok(socket) => socket,
        Err(e) => {
            error!(addr = %cli.listen, error = %e, "Could not bind data-output socket");
            return std::process::ExitCode::FAILURE;
        }
    };
    info!(addr = %cli.listen, "Listening for simulator data output");

    let mut feed_state = FeedState::default();
    let mut buf = [0u8; 2048];
    let mut summary = tokio::time::interval(Duration::from_secs(cli.status_interval.max(1)));

    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => {
                match received {
                    Ok((len, _)) => {
                        if feed_state.ingest(&buf[..len]) {
                            fms.update(&feed_state.sample());
                        }
                    }
                    Err(e) => warn!(error = %e, "Data-output receive failed"),
                }
            }
            _ = summary.tick() => {
                log_summary(&fms);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    std::process::ExitCode::SUCCESS
}

fn log_summary(fms: &Fms) {
    let snapshot = fms.snapshot();
    if !snapshot.loaded {
        info!(status = %snapshot.status, "No flight plan");
        return;
    }

    let active_ident = fms
        .legs()
        .get(snapshot.active_index)
        .map(|leg| leg.ident.clone())
        .unwrap_or_default();

    info!(
        route = format!("{}-{}", snapshot.origin_icao, snapshot.destination_icao),
        phase = %snapshot.phase,
        active = %active_ident,
        dist_to_dest_nm = format!("{:.1}", snapshot.dist_to_dest_nm),
        progress_pct = format!("{:.0}", snapshot.progress_pct),
        dist_to_td_nm = format!("{:.1}", snapshot.dist_to_td_nm),
        fuel_pred_kg = format!("{:.0}", snapshot.fuel_pred_dest_kg),
        baro = snapshot.baro_alert_text(),
        "Navigation summary"
    );
}
