// Endpoint-level flows over the in-process loopback relay: two match tasks,
// real channels, paused tokio time.

mod support;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tankduel_core::protocol::{self, WireMessage};
use tankduel_core::transport::Transport;
use tankduel_core::turn::TurnStateKind;
use tankduel_core::{MatchEnd, Side, loopback_pair};

use support::{fire_shot, spawn_endpoint, wait_for};

#[tokio::test(start_paused = true)]
async fn host_shot_hands_the_turn_to_the_guest() {
    let (host_end, guest_end) = loopback_pair("flow-shot");
    let mut host = spawn_endpoint(host_end.transport, host_end.events);
    let mut guest = spawn_endpoint(guest_end.transport, guest_end.events);

    wait_for(&mut host.snapshot_rx, |s| {
        s.turn_state == TurnStateKind::Aiming
    })
    .await;
    fire_shot(&host, -0.6, Duration::from_millis(900)).await;
    wait_for(&mut host.snapshot_rx, |s| {
        s.turn_state == TurnStateKind::InFlight
    })
    .await;

    // the hand-off lands on both sides
    let host_view = wait_for(&mut host.snapshot_rx, |s| s.turn_owner == Side::Guest).await;
    let guest_view = wait_for(&mut guest.snapshot_rx, |s| {
        s.turn_owner == Side::Guest && s.turn_state == TurnStateKind::Aiming
    })
    .await;

    assert_eq!(host_view.turn_state, TurnStateKind::Waiting);
    assert_eq!(host_view.terrain_bits, guest_view.terrain_bits);
    assert_eq!(
        host_view.tank_host.health,
        guest_view.tank_host.health
    );
    assert_eq!(
        host_view.tank_guest.health,
        guest_view.tank_guest.health
    );

    host.shutdown.notify_waiters();
    guest.shutdown.notify_waiters();
}

#[tokio::test(start_paused = true)]
async fn countdown_expiry_forfeits_the_turn_without_input() {
    let (host_end, guest_end) = loopback_pair("flow-forfeit");
    let mut host = spawn_endpoint(host_end.transport, host_end.events);
    let mut guest = spawn_endpoint(guest_end.transport, guest_end.events);

    let before = wait_for(&mut host.snapshot_rx, |s| {
        s.turn_state == TurnStateKind::Aiming
    })
    .await;

    // nobody touches the input channels
    let guest_view = wait_for(&mut guest.snapshot_rx, |s| {
        s.turn_state == TurnStateKind::Aiming
    })
    .await;
    assert_eq!(guest_view.turn_owner, Side::Guest);
    // a forfeit carries no shot: terrain is untouched
    assert_eq!(guest_view.terrain_bits, before.terrain_bits);

    host.shutdown.notify_waiters();
    guest.shutdown.notify_waiters();
}

/// Swallows the first hand-off snapshot to prove the resend loop heals it.
struct DropFirstTurnUpdate<T: Transport> {
    inner: T,
    dropped: AtomicBool,
}

impl<T: Transport> Transport for DropFirstTurnUpdate<T> {
    fn send(&self, bytes: Vec<u8>) {
        if !self.dropped.load(Ordering::Relaxed)
            && matches!(protocol::decode(&bytes), Ok(WireMessage::Turn(_)))
        {
            self.dropped.store(true, Ordering::Relaxed);
            return;
        }
        self.inner.send(bytes);
    }
}

#[tokio::test(start_paused = true)]
async fn dropped_turn_update_is_resent_until_it_lands() {
    let (host_end, guest_end) = loopback_pair("flow-resend");
    let host = spawn_endpoint(
        DropFirstTurnUpdate {
            inner: host_end.transport,
            dropped: AtomicBool::new(false),
        },
        host_end.events,
    );
    let mut guest = spawn_endpoint(guest_end.transport, guest_end.events);

    fire_shot(&host, -0.6, Duration::from_millis(900)).await;

    // the first copy is swallowed; a resend still flips the turn
    let guest_view = wait_for(&mut guest.snapshot_rx, |s| {
        s.turn_owner == Side::Guest && s.turn_state == TurnStateKind::Aiming
    })
    .await;
    assert_eq!(guest_view.local_side, Side::Guest);

    host.shutdown.notify_waiters();
    guest.shutdown.notify_waiters();
}

#[tokio::test(start_paused = true)]
async fn leaving_endpoint_surfaces_as_peer_disconnect() {
    let (host_end, guest_end) = loopback_pair("flow-disconnect");
    let mut host = spawn_endpoint(host_end.transport, host_end.events);
    let guest = spawn_endpoint(guest_end.transport, guest_end.events);

    wait_for(&mut host.snapshot_rx, |s| {
        s.turn_state == TurnStateKind::Aiming
    })
    .await;

    guest.shutdown.notify_waiters();
    assert_eq!(guest.handle.await.unwrap(), MatchEnd::Shutdown);
    assert_eq!(host.handle.await.unwrap(), MatchEnd::PeerDisconnected);
}
