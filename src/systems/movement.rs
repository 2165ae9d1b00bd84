// Tank kinematics: horizontal drive with step-over, then a ground-seek
// reseat. Tanks never integrate gravity; seeking the nearest solid row below
// cannot tunnel through thin terrain after a carve.

use crate::state::Tank;
use crate::terrain::Terrain;
use crate::tuning::TankTuning;

pub fn tick_tank(tank: &mut Tank, terrain: &Terrain, dt: f32, cfg: &TankTuning) {
    if tank.move_dir != 0 {
        step_horizontal(tank, terrain, dt, cfg);
    }
    seat_on_ground(tank, terrain, cfg);
}

fn step_horizontal(tank: &mut Tank, terrain: &Terrain, dt: f32, cfg: &TankTuning) {
    let half_w = cfg.width / 2.0;
    let dir = f32::from(tank.move_dir);
    let candidate =
        (tank.x + dir * cfg.speed * dt).clamp(half_w, terrain.width() as f32 - half_w);

    // Probe the leading edge at the body row resting on the current ground.
    let lead_col = (candidate + dir * half_w).floor() as i32;
    let ground_row = (tank.y + cfg.height / 2.0).round() as i32;
    let body_row = ground_row - 1;

    if !terrain.query(lead_col, body_row) {
        tank.x = candidate;
        return;
    }

    // Blocked: climb if a clear leading cell exists within the allowance.
    for step in 1..=cfg.max_step_over {
        if !terrain.query(lead_col, body_row - step) {
            tank.x = candidate;
            tank.y -= step as f32;
            return;
        }
    }
    // Wall too tall; the horizontal move is cancelled.
}

/// Seats the tank so its bottom rests exactly on the first solid row under
/// either footprint edge column.
pub fn seat_on_ground(tank: &mut Tank, terrain: &Terrain, cfg: &TankTuning) {
    tank.y = ground_seek(tank.x, tank.y, terrain, cfg);
}

/// Initial seating at match start: scans from the board top, so a nominal
/// spawn point at or inside the generated surface still lands on top of it.
/// Per-tick reseating keeps the downward-only scan.
pub fn drop_from_sky(tank: &mut Tank, terrain: &Terrain, cfg: &TankTuning) {
    tank.y = ground_seek(tank.x, -(cfg.height / 2.0), terrain, cfg);
}

/// Scans downward from just below the tank's bottom edge. With no solid row
/// anywhere below, the board's bottom boundary acts as always-solid ground.
#[must_use]
pub fn ground_seek(x: f32, y_start: f32, terrain: &Terrain, cfg: &TankTuning) -> f32 {
    let half_w = cfg.width / 2.0;
    let half_h = cfg.height / 2.0;
    let col_start = (x - half_w).floor() as i32;
    let col_end = (x + half_w - 0.001).floor() as i32;

    let mut ground_row = terrain.height();
    for row in (y_start + half_h).ceil() as i32..terrain.height() {
        if terrain.query(col_start, row) || terrain.query(col_end, row) {
            ground_row = row;
            break;
        }
    }
    ground_row as f32 - half_h
}
