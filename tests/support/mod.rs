// Shared harness for endpoint-level integration tests: spawns a match task
// with its channel plumbing and offers snapshot polling helpers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, mpsc, watch};
use tokio::task::JoinHandle;

use tankduel_core::transport::{Transport, TransportEvent};
use tankduel_core::{MatchEnd, MatchTuning, PlayerInput, RenderSnapshot, match_task};

pub struct Endpoint {
    pub input_tx: mpsc::Sender<PlayerInput>,
    pub snapshot_rx: watch::Receiver<Option<RenderSnapshot>>,
    pub shutdown: Arc<Notify>,
    pub handle: JoinHandle<MatchEnd>,
}

pub fn spawn_endpoint<T: Transport>(
    transport: T,
    events: mpsc::Receiver<TransportEvent>,
) -> Endpoint {
    let (input_tx, input_rx) = mpsc::channel(16);
    let (snapshot_tx, snapshot_rx) = watch::channel(None);
    let shutdown = Arc::new(Notify::new());
    let handle = tokio::spawn(match_task(
        transport,
        events,
        input_rx,
        snapshot_tx,
        MatchTuning::default(),
        shutdown.clone(),
    ));
    Endpoint {
        input_tx,
        snapshot_rx,
        shutdown,
        handle,
    }
}

/// Waits until the endpoint publishes a snapshot satisfying `pred`.
pub async fn wait_for(
    snapshot_rx: &mut watch::Receiver<Option<RenderSnapshot>>,
    mut pred: impl FnMut(&RenderSnapshot) -> bool,
) -> RenderSnapshot {
    let found = async {
        loop {
            {
                let current = snapshot_rx.borrow();
                if let Some(snapshot) = current.as_ref()
                    && pred(snapshot)
                {
                    return snapshot.clone();
                }
            }
            snapshot_rx
                .changed()
                .await
                .expect("snapshot channel closed");
        }
    };
    tokio::time::timeout(Duration::from_secs(300), found)
        .await
        .expect("condition never reached")
}

/// Charges for `hold` and releases at `angle`.
pub async fn fire_shot(endpoint: &Endpoint, angle: f32, hold: Duration) {
    endpoint
        .input_tx
        .send(PlayerInput::Aim(angle))
        .await
        .expect("input channel closed");
    endpoint
        .input_tx
        .send(PlayerInput::ChargeStart)
        .await
        .expect("input channel closed");
    tokio::time::sleep(hold).await;
    endpoint
        .input_tx
        .send(PlayerInput::ChargeRelease)
        .await
        .expect("input channel closed");
}
