use std::time::Duration;

// Runtime constants (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 256;
pub const TRANSPORT_EVENT_CAPACITY: usize = 256;

// 60 Hz fixed step.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

// Cadence for the fire-and-forget state broadcasts while a turn is live.
pub const DYNAMIC_UPDATE_INTERVAL: Duration = Duration::from_millis(300);

// Resend cadence for an unacknowledged hand-off update.
pub const TURN_RESEND_INTERVAL: Duration = Duration::from_millis(1000);
