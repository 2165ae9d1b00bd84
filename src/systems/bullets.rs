// Ballistics for the live bullet arena: explicit Euler integration against
// gravity, terminated by board exit or a solid terrain cell.

use std::collections::HashSet;

use tracing::debug;

use crate::state::Bullet;
use crate::terrain::Terrain;

/// Launch speed scales linearly with the held charge: zero bars is zero
/// speed, a full hold is exactly `speed_factor`.
#[must_use]
pub fn launch_speed(bars: u32, max_bars: u32, speed_factor: f32) -> f32 {
    bars as f32 / max_bars as f32 * speed_factor
}

/// Integrates every live bullet and removes the dead ones. Each death fires
/// `on_explode` with the bullet id and last position at most once per id,
/// guarded by `exploded_ids`, even if the terminal condition is observed
/// again before removal completes.
pub fn tick(
    bullets: &mut Vec<Bullet>,
    terrain: &Terrain,
    dt: f32,
    gravity: f32,
    exploded_ids: &mut HashSet<u32>,
    mut on_explode: impl FnMut(u32, f32, f32),
) {
    let (max_x, max_y) = (terrain.width() as f32, terrain.height() as f32);

    bullets.retain_mut(|bullet| {
        bullet.vy += gravity * dt;
        bullet.x += bullet.vx * dt;
        bullet.y += bullet.vy * dt;

        let out = bullet.x < 0.0 || bullet.x > max_x || bullet.y < 0.0 || bullet.y > max_y;
        if !out && !terrain.query(bullet.x.floor() as i32, bullet.y.floor() as i32) {
            return true;
        }

        if exploded_ids.insert(bullet.id) {
            on_explode(bullet.id, bullet.x, bullet.y);
        } else {
            debug!(bullet_id = bullet.id, "terminal bullet already exploded");
        }
        false
    });
}
