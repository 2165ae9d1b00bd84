// Simulation entities, their snapshot types, and the render view.

use serde::{Deserialize, Serialize};

use crate::turn::TurnStateKind;

/// Which endpoint a value belongs to. The relay makes the room creator the
/// host and the joiner the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Host,
    Guest,
}

impl Side {
    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Host => Side::Guest,
            Side::Guest => Side::Host,
        }
    }
}

pub struct Tank {
    pub x: f32,
    pub y: f32,
    pub aim_angle: f32,
    pub health: i32,

    // Latest horizontal intent in {-1, 0, +1}; local input only, never
    // mirrored from the peer.
    pub move_dir: i8,
}

impl Tank {
    pub fn spawn(pos: (f32, f32), health: i32) -> Self {
        Self {
            x: pos.0,
            y: pos.1,
            aim_angle: 0.0,
            health,
            move_dir: 0,
        }
    }

    /// Overwrites the mirrored fields from a peer snapshot.
    pub fn apply_state(&mut self, state: &TankState) {
        self.x = state.x;
        self.y = state.y;
        self.aim_angle = state.aim_angle;
        self.health = state.health;
    }
}

pub struct Bullet {
    pub id: u32,
    pub owner: Side,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

pub struct Explosion {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub age: f32,
}

/// Tank fields that travel in wire updates and render snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankState {
    pub x: f32,
    pub y: f32,
    pub aim_angle: f32,
    pub health: i32,
}

impl From<&Tank> for TankState {
    fn from(tank: &Tank) -> Self {
        Self {
            x: tank.x,
            y: tank.y,
            aim_angle: tank.aim_angle,
            health: tank.health,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletState {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl From<&Bullet> for BulletState {
    fn from(bullet: &Bullet) -> Self {
        Self {
            id: bullet.id,
            x: bullet.x,
            y: bullet.y,
            vx: bullet.vx,
            vy: bullet.vy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExplosionState {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

impl From<&Explosion> for ExplosionState {
    fn from(explosion: &Explosion) -> Self {
        Self {
            id: explosion.id,
            x: explosion.x,
            y: explosion.y,
        }
    }
}

/// How a finished match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    Winner(Side),
    /// Both tanks died in the same blast.
    Draw,
}

/// Read-only view for the rendering layer, refreshed once per tick.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub terrain_bits: Vec<u8>,
    pub tank_host: TankState,
    pub tank_guest: TankState,
    pub bullets: Vec<BulletState>,
    pub explosions: Vec<ExplosionState>,
    pub turn_state: TurnStateKind,
    pub turn_owner: Side,
    pub local_side: Side,
    pub countdown: f32,
    pub charge_bars: u32,
    pub outcome: Option<MatchOutcome>,
}
