/// Board layout tuning: dimensions, the generated surface, and spawns.

#[derive(Debug, Clone, Copy)]
pub struct TerrainTuning {
    /// Board width in cells.
    pub width: u32,

    /// Board height in cells.
    pub height: u32,

    /// Sky rows above the mean surface height.
    pub air_rows: u32,

    /// Sine amplitude of the surface, in rows.
    pub amplitude: f32,

    /// Sine frequency of the surface across the width.
    pub frequency: f32,

    /// Guaranteed solid rows at the bottom of the board.
    pub flat_bottom_rows: u32,

    /// Host spawn center in cells. Tanks spawn in the air and settle onto
    /// the surface on the first tick.
    pub host_spawn: (f32, f32),

    /// Guest spawn center in cells.
    pub guest_spawn: (f32, f32),
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            width: 100,
            height: 20,
            air_rows: 2,
            amplitude: 3.0,
            frequency: 0.1,
            flat_bottom_rows: 2,
            host_spawn: (25.0, 5.0),
            guest_spawn: (75.0, 5.0),
        }
    }
}
