// Explosion resolution: terrain carving plus distance-based damage, applied
// synchronously when a bullet dies. Visual entities linger separately and
// never feed back into gameplay.

use tracing::debug;

use crate::state::{Explosion, Tank};
use crate::terrain::Terrain;
use crate::tuning::ExplosionTuning;

/// Carves the blast circle and damages every tank within the radius. The
/// distance test is inclusive at the boundary; health clamps at zero.
pub fn carve_and_damage(
    terrain: &mut Terrain,
    tanks: [&mut Tank; 2],
    wx: f32,
    wy: f32,
    cfg: &ExplosionTuning,
) {
    terrain.carve_circle(wx, wy, cfg.radius);

    let radius_sq = (cfg.radius * cfg.radius) as f32;
    for tank in tanks {
        let dx = tank.x - wx;
        let dy = tank.y - wy;
        if dx * dx + dy * dy <= radius_sq {
            tank.health = (tank.health - cfg.damage).max(0);
            debug!(health = tank.health, "tank caught in blast");
        }
    }
}

/// Ages visual explosions and drops the expired ones.
pub fn expire(explosions: &mut Vec<Explosion>, dt: f32, lifetime: f32) {
    for explosion in explosions.iter_mut() {
        explosion.age += dt;
    }
    explosions.retain(|explosion| explosion.age < lifetime);
}
