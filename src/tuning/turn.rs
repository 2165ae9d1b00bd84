/// Gameplay tuning for the turn cycle and fire charging.

#[derive(Debug, Clone, Copy)]
pub struct TurnTuning {
    /// Seconds a side gets to move, aim, and fire before forfeiting.
    pub countdown: f32,

    /// Charge bars at a full hold.
    pub max_charge_bars: u32,

    /// Seconds of holding per additional bar; the first bar lands on press.
    pub charge_interval: f32,
}

impl Default for TurnTuning {
    fn default() -> Self {
        Self {
            countdown: 30.0,
            max_charge_bars: 30,
            charge_interval: 0.1,
        }
    }
}
