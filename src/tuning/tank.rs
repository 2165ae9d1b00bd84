/// Gameplay tuning for tanks.
///
/// Keep this separate from runtime configuration (tick rates, channel sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct TankTuning {
    /// Horizontal drive speed in cells per second.
    pub speed: f32,

    /// Footprint width in cells.
    pub width: f32,

    /// Footprint height in cells.
    pub height: f32,

    /// How many rows above a blocked cell the climb scan may look.
    pub max_step_over: i32,

    /// Health both tanks start the match with.
    pub max_health: i32,
}

impl Default for TankTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            width: 1.0,
            height: 1.0,
            max_step_over: 3,
            max_health: 100,
        }
    }
}
