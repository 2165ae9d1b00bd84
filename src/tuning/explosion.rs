/// Gameplay tuning for explosions.

#[derive(Debug, Clone, Copy)]
pub struct ExplosionTuning {
    /// Carve and damage radius in cells.
    pub radius: i32,

    /// Flat damage applied to any tank inside the radius.
    pub damage: i32,

    /// Seconds a visual explosion lingers in snapshots before expiring.
    pub lifetime: f32,
}

impl Default for ExplosionTuning {
    fn default() -> Self {
        Self {
            radius: 3,
            damage: 25,
            lifetime: 1.0,
        }
    }
}
