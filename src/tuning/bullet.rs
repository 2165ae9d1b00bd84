/// Gameplay tuning for bullets.

#[derive(Debug, Clone, Copy)]
pub struct BulletTuning {
    /// Downward acceleration in cells per second squared.
    pub gravity: f32,

    /// Launch speed of a full-charge shot, in cells per second. Partial
    /// charges scale linearly down from this.
    pub speed_factor: f32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            speed_factor: 30.0,
        }
    }
}
