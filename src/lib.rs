pub mod config;
pub mod game;
pub mod protocol;
pub mod sim;
pub mod state;
pub mod systems;
pub mod terrain;
pub mod transport;
pub mod tuning;
pub mod turn;

pub use game::{MatchEnd, match_task};
pub use sim::{MatchSim, PlayerInput};
pub use state::{MatchOutcome, RenderSnapshot, Side};
pub use terrain::Terrain;
pub use transport::{Transport, TransportEvent, loopback_pair};
pub use tuning::MatchTuning;
