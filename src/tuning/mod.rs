// Gameplay tuning, grouped per concern and bundled into one match-wide set.

pub mod bullet;
pub mod explosion;
pub mod tank;
pub mod terrain;
pub mod turn;

pub use bullet::BulletTuning;
pub use explosion::ExplosionTuning;
pub use tank::TankTuning;
pub use terrain::TerrainTuning;
pub use turn::TurnTuning;

/// Everything tunable about one match. Both endpoints must run the same
/// values or their boards diverge at generation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchTuning {
    pub tank: TankTuning,
    pub bullet: BulletTuning,
    pub explosion: ExplosionTuning,
    pub terrain: TerrainTuning,
    pub turn: TurnTuning,
}
