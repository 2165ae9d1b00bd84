// Seam between the match core and the external relay. The core only ever
// sees opaque bytes going out and `TransportEvent`s coming in; the relay's
// handshake and socket plumbing live on the other side of this trait.

use tokio::sync::mpsc;
use tracing::trace;

use crate::config;

/// Connection lifecycle and peer traffic, as surfaced by the relay client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// We created the room; this endpoint plays Host.
    MatchCreated { code: String, local_id: u32 },
    /// We joined an existing room; this endpoint plays Guest.
    MatchJoined { code: String, local_id: u32 },
    /// Both participants are present; the first turn may begin.
    StartSignal,
    /// Opaque bytes forwarded from the peer.
    Message(Vec<u8>),
    PeerDisconnected,
}

/// Outbound half of the relay connection. Sends are fire-and-forget:
/// implementations drop on a full or closed peer rather than block the
/// simulation tick.
pub trait Transport: Send + 'static {
    fn send(&self, bytes: Vec<u8>);
}

/// One side of an in-process relay, used by tests and the demo binary.
pub struct LoopbackEndpoint {
    pub transport: LoopbackTransport,
    pub events: mpsc::Receiver<TransportEvent>,
}

pub struct LoopbackTransport {
    peer_tx: mpsc::Sender<TransportEvent>,
}

impl Transport for LoopbackTransport {
    fn send(&self, bytes: Vec<u8>) {
        if self.peer_tx.try_send(TransportEvent::Message(bytes)).is_err() {
            trace!("loopback peer unavailable, message dropped");
        }
    }
}

impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        // Leaving the match surfaces on the other side as a disconnect.
        let _ = self.peer_tx.try_send(TransportEvent::PeerDisconnected);
    }
}

/// Wires two endpoints back to back and seeds the lifecycle events a real
/// relay would emit: room creation/join, then the start signal for both.
#[must_use]
pub fn loopback_pair(code: &str) -> (LoopbackEndpoint, LoopbackEndpoint) {
    let (host_tx, host_rx) = mpsc::channel(config::TRANSPORT_EVENT_CAPACITY);
    let (guest_tx, guest_rx) = mpsc::channel(config::TRANSPORT_EVENT_CAPACITY);

    let _ = host_tx.try_send(TransportEvent::MatchCreated {
        code: code.to_owned(),
        local_id: 1,
    });
    let _ = guest_tx.try_send(TransportEvent::MatchJoined {
        code: code.to_owned(),
        local_id: 2,
    });
    let _ = host_tx.try_send(TransportEvent::StartSignal);
    let _ = guest_tx.try_send(TransportEvent::StartSignal);

    (
        LoopbackEndpoint {
            transport: LoopbackTransport { peer_tx: guest_tx },
            events: host_rx,
        },
        LoopbackEndpoint {
            transport: LoopbackTransport { peer_tx: host_tx },
            events: guest_rx,
        },
    )
}
