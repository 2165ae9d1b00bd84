// Headless self-play demo: two endpoints wired back to back over the
// in-process loopback relay, each driven by a small scripted gunner. Prints
// the host's final snapshot as JSON when the match ends.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, mpsc, watch};

use tankduel_core::turn::TurnStateKind;
use tankduel_core::{
    MatchTuning, PlayerInput, RenderSnapshot, Side, config, loopback_pair, match_task,
};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Scripted gunner: whenever the snapshot says this side is aiming, lob a
/// 45-degree shot toward the opponent.
async fn drive(
    side: Side,
    mut snapshot_rx: watch::Receiver<Option<RenderSnapshot>>,
    input_tx: mpsc::Sender<PlayerInput>,
) {
    loop {
        if snapshot_rx.changed().await.is_err() {
            return;
        }
        let snapshot = snapshot_rx.borrow().clone();
        let Some(snapshot) = snapshot else { continue };
        if snapshot.turn_owner != side
            || snapshot.turn_state != TurnStateKind::Aiming
            || snapshot.charge_bars > 0
        {
            continue;
        }

        let (me, them) = match side {
            Side::Host => (snapshot.tank_host, snapshot.tank_guest),
            Side::Guest => (snapshot.tank_guest, snapshot.tank_host),
        };
        let angle = if them.x >= me.x {
            -std::f32::consts::FRAC_PI_4
        } else {
            std::f32::consts::PI + std::f32::consts::FRAC_PI_4
        };

        if input_tx.send(PlayerInput::Aim(angle)).await.is_err()
            || input_tx.send(PlayerInput::ChargeStart).await.is_err()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2200)).await;
        if input_tx.send(PlayerInput::ChargeRelease).await.is_err() {
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    init_runtime();

    let (host_end, guest_end) = loopback_pair("demo");
    let shutdown = Arc::new(Notify::new());

    let (host_input_tx, host_input_rx) = mpsc::channel(config::INPUT_CHANNEL_CAPACITY);
    let (guest_input_tx, guest_input_rx) = mpsc::channel(config::INPUT_CHANNEL_CAPACITY);
    let (host_snapshot_tx, host_snapshot_rx) = watch::channel(None);
    let (guest_snapshot_tx, guest_snapshot_rx) = watch::channel(None);

    let host_task = tokio::spawn(match_task(
        host_end.transport,
        host_end.events,
        host_input_rx,
        host_snapshot_tx,
        MatchTuning::default(),
        shutdown.clone(),
    ));
    tokio::spawn(match_task(
        guest_end.transport,
        guest_end.events,
        guest_input_rx,
        guest_snapshot_tx,
        MatchTuning::default(),
        shutdown.clone(),
    ));

    tokio::spawn(drive(Side::Host, host_snapshot_rx.clone(), host_input_tx));
    tokio::spawn(drive(Side::Guest, guest_snapshot_rx.clone(), guest_input_tx));

    match tokio::time::timeout(Duration::from_secs(120), host_task).await {
        Ok(Ok(end)) => tracing::info!(?end, "host endpoint finished"),
        Ok(Err(e)) => tracing::error!(error = %e, "host task panicked"),
        Err(_) => tracing::info!("demo time limit reached"),
    }
    shutdown.notify_waiters();

    // Let the guest settle before reading the last published state.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let snapshot = host_snapshot_rx.borrow().clone();
    if let Some(snapshot) = snapshot {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "snapshot serialization failed"),
        }
    }
}
