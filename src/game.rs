// Per-endpoint match task: waits for the relay lifecycle, then drives the
// fixed-step loop. One task owns one `MatchSim`; there is no locking because
// nothing else ever touches it.

use std::sync::Arc;

use tokio::sync::{Notify, mpsc, watch};
use tracing::{info, warn};

use crate::config;
use crate::protocol;
use crate::sim::{MatchSim, PlayerInput};
use crate::state::{MatchOutcome, RenderSnapshot, Side};
use crate::transport::{Transport, TransportEvent};
use crate::tuning::MatchTuning;

/// Why the match task returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEnd {
    GameOver(MatchOutcome),
    PeerDisconnected,
    Shutdown,
}

pub async fn match_task<T: Transport>(
    transport: T,
    mut transport_rx: mpsc::Receiver<TransportEvent>,
    mut input_rx: mpsc::Receiver<PlayerInput>,
    snapshot_tx: watch::Sender<Option<RenderSnapshot>>,
    tuning: MatchTuning,
    shutdown: Arc<Notify>,
) -> MatchEnd {
    // Relay handshake: learn which side we are, then hold for the start
    // signal before the first turn begins.
    let local_side = loop {
        tokio::select! {
            _ = shutdown.notified() => return MatchEnd::Shutdown,
            event = transport_rx.recv() => match event {
                Some(TransportEvent::MatchCreated { code, local_id }) => {
                    info!(%code, local_id, "match created, playing host");
                    break Side::Host;
                }
                Some(TransportEvent::MatchJoined { code, local_id }) => {
                    info!(%code, local_id, "match joined, playing guest");
                    break Side::Guest;
                }
                Some(TransportEvent::PeerDisconnected) | None => return MatchEnd::PeerDisconnected,
                Some(other) => warn!(?other, "unexpected event before side assignment"),
            }
        }
    };

    let mut sim = MatchSim::new(local_side, tuning);

    loop {
        tokio::select! {
            _ = shutdown.notified() => return MatchEnd::Shutdown,
            event = transport_rx.recv() => match event {
                Some(TransportEvent::StartSignal) => break,
                Some(TransportEvent::PeerDisconnected) | None => return MatchEnd::PeerDisconnected,
                Some(other) => warn!(?other, "unexpected event before the start signal"),
            }
        }
    }
    sim.start();

    let mut interval = tokio::time::interval(config::TICK_INTERVAL);
    let dt = config::TICK_INTERVAL.as_secs_f32();

    loop {
        tokio::select! {
            _ = shutdown.notified() => return MatchEnd::Shutdown,
            _ = interval.tick() => {
                while let Ok(input) = input_rx.try_recv() {
                    sim.apply_input(input);
                }
                sim.step(dt);
            }
            event = transport_rx.recv() => match event {
                Some(TransportEvent::Message(bytes)) => match protocol::decode(&bytes) {
                    Ok(msg) => sim.handle_message(msg),
                    Err(e) => warn!(error = ?e, "undecodable peer message dropped"),
                },
                Some(TransportEvent::PeerDisconnected) | None => {
                    info!(side = ?local_side, "peer disconnected, ending match");
                    return MatchEnd::PeerDisconnected;
                }
                Some(other) => warn!(?other, "unexpected mid-match transport event"),
            }
        }

        for msg in sim.take_outbox() {
            match protocol::encode(&msg) {
                Ok(bytes) => transport.send(bytes),
                Err(e) => warn!(error = ?e, "outbound message failed to encode"),
            }
        }
        let _ = snapshot_tx.send(Some(sim.render_snapshot()));

        // Linger after game-over only while the final snapshot is still
        // unacknowledged; its resend loop runs inside `sim.step`.
        if let Some(outcome) = sim.outcome()
            && !sim.has_pending_turn()
        {
            info!(?outcome, side = ?local_side, "match finished");
            return MatchEnd::GameOver(outcome);
        }
    }
}
