// One endpoint's copy of the match. `MatchSim` owns terrain, both tanks, the
// bullet/explosion arenas and the turn machine, and threads them through the
// systems each tick. Only the side holding the turn simulates; the other
// side mirrors whatever the peer reports.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::config;
use crate::protocol::{DynamicUpdate, TurnUpdate, WireMessage};
use crate::state::{Bullet, Explosion, MatchOutcome, RenderSnapshot, Side, Tank};
use crate::systems::{bullets, explosions, movement};
use crate::terrain::Terrain;
use crate::tuning::MatchTuning;
use crate::turn::{Charge, TurnPhase};

/// Local input events, accepted only while this side is aiming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerInput {
    /// Horizontal intent; sticky until the next `Move` or the turn ends.
    Move(i8),
    /// Absolute aim angle in radians.
    Aim(f32),
    ChargeStart,
    ChargeRelease,
}

pub struct MatchSim {
    tuning: MatchTuning,
    local_side: Side,
    terrain: Terrain,
    host: Tank,
    guest: Tank,
    bullets: Vec<Bullet>,
    explosions: Vec<Explosion>,
    exploded_ids: HashSet<u32>,
    next_bullet_id: u32,
    next_explosion_id: u32,
    turn_owner: Side,
    phase: TurnPhase,
    /// Sequence of the last locally-issued turn update.
    next_turn_seq: u64,
    /// Kept until the matching ack arrives; drives the resend loop.
    pending_turn: Option<TurnUpdate>,
    /// Highest peer turn-update sequence applied so far.
    highest_applied_seq: u64,
    dynamic_elapsed: f32,
    resend_elapsed: f32,
    outbox: Vec<WireMessage>,
}

impl MatchSim {
    #[must_use]
    pub fn new(local_side: Side, tuning: MatchTuning) -> Self {
        let terrain = Terrain::generate(&tuning.terrain);
        let mut host = Tank::spawn(tuning.terrain.host_spawn, tuning.tank.max_health);
        let mut guest = Tank::spawn(tuning.terrain.guest_spawn, tuning.tank.max_health);
        // Spawn points are nominal; both tanks start seated on the surface.
        movement::drop_from_sky(&mut host, &terrain, &tuning.tank);
        movement::drop_from_sky(&mut guest, &terrain, &tuning.tank);
        Self {
            tuning,
            local_side,
            terrain,
            host,
            guest,
            bullets: Vec::new(),
            explosions: Vec::new(),
            exploded_ids: HashSet::new(),
            next_bullet_id: 1,
            next_explosion_id: 1,
            turn_owner: Side::Host,
            phase: TurnPhase::Waiting,
            next_turn_seq: 0,
            pending_turn: None,
            highest_applied_seq: 0,
            dynamic_elapsed: 0.0,
            resend_elapsed: 0.0,
            outbox: Vec::new(),
        }
    }

    /// Reacts to the relay's start signal: the host takes the first turn
    /// with a full countdown, the guest waits.
    pub fn start(&mut self) {
        self.turn_owner = Side::Host;
        self.phase = if self.local_side == Side::Host {
            TurnPhase::Aiming {
                countdown: self.tuning.turn.countdown,
                charge: None,
            }
        } else {
            TurnPhase::Waiting
        };
        info!(side = ?self.local_side, "turn cycle started");
    }

    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.turn_owner == self.local_side
    }

    #[must_use]
    pub fn local_side(&self) -> Side {
        self.local_side
    }

    #[must_use]
    pub fn turn_owner(&self) -> Side {
        self.turn_owner
    }

    #[must_use]
    pub fn turn_phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        match self.phase {
            TurnPhase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_pending_turn(&self) -> bool {
        self.pending_turn.is_some()
    }

    #[must_use]
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Drains the messages queued for the transport since the last call.
    pub fn take_outbox(&mut self) -> Vec<WireMessage> {
        std::mem::take(&mut self.outbox)
    }

    pub fn apply_input(&mut self, input: PlayerInput) {
        if !self.is_my_turn() || !self.phase.accepts_input() {
            debug!(?input, "input ignored outside an active turn");
            return;
        }
        match input {
            PlayerInput::Move(dir) => self.local_tank_mut().move_dir = dir.signum(),
            PlayerInput::Aim(angle) => {
                if angle.is_finite() {
                    self.local_tank_mut().aim_angle = angle;
                }
            }
            PlayerInput::ChargeStart => {
                if let TurnPhase::Aiming { charge, .. } = &mut self.phase
                    && charge.is_none()
                {
                    *charge = Some(Charge::begin());
                }
            }
            PlayerInput::ChargeRelease => {
                if let TurnPhase::Aiming {
                    charge: Some(charge),
                    ..
                } = self.phase
                {
                    self.fire(charge.bars);
                }
            }
        }
    }

    /// Advances one simulation tick. Safe to call on both sides; the passive
    /// side only ages its visual explosions and services the resend loop.
    pub fn step(&mut self, dt: f32) {
        explosions::expire(&mut self.explosions, dt, self.tuning.explosion.lifetime);

        if matches!(self.phase, TurnPhase::GameOver(_)) {
            self.tick_resend(dt);
            return;
        }

        if self.is_my_turn() {
            match self.phase {
                TurnPhase::Aiming { .. } => self.tick_aiming(dt),
                TurnPhase::InFlight => self.tick_in_flight(dt),
                TurnPhase::Handoff => self.complete_handoff(),
                TurnPhase::Waiting | TurnPhase::GameOver(_) => {}
            }

            // Periodic fire-and-forget broadcast while the turn is live.
            if matches!(self.phase, TurnPhase::Aiming { .. } | TurnPhase::InFlight) {
                self.dynamic_elapsed += dt;
                if self.dynamic_elapsed >= config::DYNAMIC_UPDATE_INTERVAL.as_secs_f32() {
                    self.dynamic_elapsed = 0.0;
                    let update = self.dynamic_update(self.turn_owner);
                    self.outbox.push(WireMessage::Dynamic(update));
                }
            }
        }

        self.tick_resend(dt);
    }

    pub fn handle_message(&mut self, msg: WireMessage) {
        if matches!(self.phase, TurnPhase::GameOver(_)) {
            // Terminal: still ack so the peer's resend loop stops.
            match msg {
                WireMessage::Turn(update) => {
                    self.outbox.push(WireMessage::TurnAck { seq: update.seq });
                }
                WireMessage::TurnAck { seq } => self.handle_ack(seq),
                WireMessage::Dynamic(_) => {}
            }
            return;
        }
        match msg {
            WireMessage::Dynamic(update) => self.apply_dynamic(update),
            WireMessage::Turn(update) => self.apply_turn(update),
            WireMessage::TurnAck { seq } => self.handle_ack(seq),
        }
    }

    #[must_use]
    pub fn render_snapshot(&self) -> RenderSnapshot {
        let (countdown, charge_bars) = match self.phase {
            TurnPhase::Aiming { countdown, charge } => {
                (countdown.max(0.0), charge.map_or(0, |c| c.bars))
            }
            _ => (0.0, 0),
        };
        RenderSnapshot {
            terrain_bits: self.terrain.bits().to_vec(),
            tank_host: (&self.host).into(),
            tank_guest: (&self.guest).into(),
            bullets: self.bullets.iter().map(Into::into).collect(),
            explosions: self.explosions.iter().map(Into::into).collect(),
            turn_state: self.phase.kind(),
            turn_owner: self.turn_owner,
            local_side: self.local_side,
            countdown,
            charge_bars,
            outcome: self.outcome(),
        }
    }

    fn tank_mut(&mut self, side: Side) -> &mut Tank {
        match side {
            Side::Host => &mut self.host,
            Side::Guest => &mut self.guest,
        }
    }

    fn local_tank_mut(&mut self) -> &mut Tank {
        self.tank_mut(self.local_side)
    }

    fn fire(&mut self, bars: u32) {
        let speed = bullets::launch_speed(
            bars,
            self.tuning.turn.max_charge_bars,
            self.tuning.bullet.speed_factor,
        );
        let side = self.local_side;
        let tank = self.local_tank_mut();
        let (x, y, angle) = (tank.x, tank.y, tank.aim_angle);
        tank.move_dir = 0;

        let id = self.next_bullet_id;
        self.next_bullet_id += 1;
        self.bullets.push(Bullet {
            id,
            owner: side,
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
        });
        self.phase = TurnPhase::InFlight;
        info!(side = ?side, bullet_id = id, bars, speed, "shot fired");
    }

    fn tick_aiming(&mut self, dt: f32) {
        let TurnPhase::Aiming {
            mut countdown,
            mut charge,
        } = self.phase
        else {
            return;
        };

        countdown -= dt;
        if let Some(charge) = charge.as_mut() {
            charge.accrue(dt, &self.tuning.turn);
        }

        if countdown <= 0.0 {
            // Forfeit; a held, unreleased charge is discarded.
            info!(side = ?self.local_side, "countdown expired, turn forfeited");
            self.local_tank_mut().move_dir = 0;
            self.phase = TurnPhase::Handoff;
            return;
        }
        self.phase = TurnPhase::Aiming { countdown, charge };

        // The active side runs kinematics for both tanks so carved ground
        // under either of them is never stale.
        match self.local_side {
            Side::Host => {
                movement::tick_tank(&mut self.host, &self.terrain, dt, &self.tuning.tank);
                movement::seat_on_ground(&mut self.guest, &self.terrain, &self.tuning.tank);
            }
            Side::Guest => {
                movement::tick_tank(&mut self.guest, &self.terrain, dt, &self.tuning.tank);
                movement::seat_on_ground(&mut self.host, &self.terrain, &self.tuning.tank);
            }
        }
    }

    fn tick_in_flight(&mut self, dt: f32) {
        let mut blasts: Vec<(u32, f32, f32)> = Vec::new();
        bullets::tick(
            &mut self.bullets,
            &self.terrain,
            dt,
            self.tuning.bullet.gravity,
            &mut self.exploded_ids,
            |id, x, y| blasts.push((id, x, y)),
        );

        for (bullet_id, x, y) in blasts {
            info!(bullet_id, x, y, "bullet detonated");
            explosions::carve_and_damage(
                &mut self.terrain,
                [&mut self.host, &mut self.guest],
                x,
                y,
                &self.tuning.explosion,
            );
            let id = self.next_explosion_id;
            self.next_explosion_id += 1;
            self.explosions.push(Explosion { id, x, y, age: 0.0 });
        }

        movement::seat_on_ground(&mut self.host, &self.terrain, &self.tuning.tank);
        movement::seat_on_ground(&mut self.guest, &self.terrain, &self.tuning.tank);

        if self.host.health == 0 || self.guest.health == 0 {
            self.finish(self.outcome_from_healths());
            return;
        }
        if self.bullets.is_empty() {
            self.phase = TurnPhase::Handoff;
        }
    }

    fn complete_handoff(&mut self) {
        let new_owner = self.turn_owner.opponent();
        self.queue_turn_update(new_owner);
        self.turn_owner = new_owner;
        self.phase = TurnPhase::Waiting;
        self.dynamic_elapsed = 0.0;
        info!(new_owner = ?new_owner, "turn handed off");
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        info!(?outcome, "match over");
        self.phase = TurnPhase::GameOver(outcome);
        // One final authoritative snapshot; the owner value is moot because
        // the receiver derives game-over from the healths it carries.
        self.queue_turn_update(self.turn_owner.opponent());
        self.turn_owner = self.turn_owner.opponent();
    }

    fn outcome_from_healths(&self) -> MatchOutcome {
        match (self.host.health == 0, self.guest.health == 0) {
            (true, true) => MatchOutcome::Draw,
            (true, false) => MatchOutcome::Winner(Side::Guest),
            _ => MatchOutcome::Winner(Side::Host),
        }
    }

    fn dynamic_update(&self, turn_owner: Side) -> DynamicUpdate {
        DynamicUpdate {
            host_tank: (&self.host).into(),
            guest_tank: (&self.guest).into(),
            bullets: self.bullets.iter().map(Into::into).collect(),
            turn_owner,
        }
    }

    fn queue_turn_update(&mut self, new_owner: Side) {
        self.next_turn_seq += 1;
        let update = TurnUpdate {
            seq: self.next_turn_seq,
            terrain_bits: self.terrain.bits().to_vec(),
            turn_owner: new_owner,
            update: self.dynamic_update(new_owner),
        };
        self.outbox.push(WireMessage::Turn(update.clone()));
        self.pending_turn = Some(update);
        self.resend_elapsed = 0.0;
    }

    fn tick_resend(&mut self, dt: f32) {
        let Some(pending) = &self.pending_turn else {
            return;
        };
        self.resend_elapsed += dt;
        if self.resend_elapsed >= config::TURN_RESEND_INTERVAL.as_secs_f32() {
            self.resend_elapsed = 0.0;
            debug!(seq = pending.seq, "re-sending unacknowledged turn update");
            self.outbox.push(WireMessage::Turn(pending.clone()));
        }
    }

    fn handle_ack(&mut self, seq: u64) {
        if self.pending_turn.as_ref().is_some_and(|p| p.seq == seq) {
            debug!(seq, "turn update acknowledged");
            self.pending_turn = None;
        }
    }

    /// Mirrors the active side's broadcast verbatim; this side never
    /// re-simulates.
    fn apply_dynamic(&mut self, update: DynamicUpdate) {
        if self.is_my_turn() {
            // Stale broadcast from before a hand-off crossed over.
            debug!("ignoring dynamic update while holding the turn");
            return;
        }
        self.host.apply_state(&update.host_tank);
        self.guest.apply_state(&update.guest_tank);
        let owner = self.turn_owner;
        self.bullets = update
            .bullets
            .iter()
            .map(|b| Bullet {
                id: b.id,
                owner,
                x: b.x,
                y: b.y,
                vx: b.vx,
                vy: b.vy,
            })
            .collect();
    }

    /// Overwrites local terrain and tanks with the sender's authoritative
    /// outcome, then takes or cedes the turn.
    fn apply_turn(&mut self, update: TurnUpdate) {
        if update.seq <= self.highest_applied_seq {
            debug!(seq = update.seq, "duplicate turn update, acking again");
            self.outbox.push(WireMessage::TurnAck { seq: update.seq });
            return;
        }
        if let Err(e) = self.terrain.restore(&update.terrain_bits) {
            warn!(error = ?e, "turn update with mismatched terrain buffer dropped");
            return;
        }
        self.highest_applied_seq = update.seq;
        self.outbox.push(WireMessage::TurnAck { seq: update.seq });

        self.host.apply_state(&update.update.host_tank);
        self.guest.apply_state(&update.update.guest_tank);
        self.bullets.clear();
        self.turn_owner = update.turn_owner;

        if self.host.health == 0 || self.guest.health == 0 {
            let outcome = self.outcome_from_healths();
            info!(?outcome, "match over");
            self.phase = TurnPhase::GameOver(outcome);
            return;
        }

        if self.is_my_turn() {
            info!(side = ?self.local_side, "turn received");
            self.phase = TurnPhase::Aiming {
                countdown: self.tuning.turn.countdown,
                charge: None,
            };
        } else {
            self.phase = TurnPhase::Waiting;
        }
    }
}
