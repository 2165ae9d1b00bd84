// Turn machine for one endpoint. `Handoff` is transitional: it is observable
// for one tick while the final snapshot goes out, then the owner flips.

use serde::Serialize;

use crate::state::MatchOutcome;
use crate::tuning::TurnTuning;

/// Charge accumulated while fire is held. Starts at one bar on press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charge {
    pub bars: u32,
    held: f32,
}

impl Charge {
    #[must_use]
    pub const fn begin() -> Self {
        Self { bars: 1, held: 0.0 }
    }

    /// One bar lands per interval while held, saturating at the cap.
    pub fn accrue(&mut self, dt: f32, tuning: &TurnTuning) {
        if self.bars >= tuning.max_charge_bars {
            return;
        }
        self.held += dt;
        while self.held >= tuning.charge_interval && self.bars < tuning.max_charge_bars {
            self.held -= tuning.charge_interval;
            self.bars += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnPhase {
    /// Not my turn; no local input accepted.
    Waiting,
    /// My turn: movement, aim and charge input accepted while the countdown
    /// runs.
    Aiming { countdown: f32, charge: Option<Charge> },
    /// A shot is in the air; input stays locked until every bullet resolves.
    InFlight,
    /// Final snapshot goes out, then the owner flips.
    Handoff,
    /// Terminal. Never exited.
    GameOver(MatchOutcome),
}

impl TurnPhase {
    #[must_use]
    pub const fn kind(&self) -> TurnStateKind {
        match self {
            TurnPhase::Waiting => TurnStateKind::Waiting,
            TurnPhase::Aiming { .. } => TurnStateKind::Aiming,
            TurnPhase::InFlight => TurnStateKind::InFlight,
            TurnPhase::Handoff => TurnStateKind::Handoff,
            TurnPhase::GameOver(_) => TurnStateKind::GameOver,
        }
    }

    #[must_use]
    pub const fn accepts_input(&self) -> bool {
        matches!(self, TurnPhase::Aiming { .. })
    }
}

/// Flat tag for render snapshots; payloads stay in [`TurnPhase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnStateKind {
    Waiting,
    Aiming,
    InFlight,
    Handoff,
    GameOver,
}
