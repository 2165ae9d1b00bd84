// Wire contract between the two endpoints. Everything crossing the relay is
// one bincode-encoded `WireMessage`; the relay forwards the bytes opaquely.

use serde::{Deserialize, Serialize};

use crate::state::{BulletState, Side, TankState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireMessage {
    Dynamic(DynamicUpdate),
    Turn(TurnUpdate),
    /// Receiver acknowledgment for a `TurnUpdate`. Sent for every copy,
    /// duplicates included, so redelivery always terminates.
    TurnAck { seq: u64 },
}

/// Fire-and-forget state broadcast from the side holding the turn. Loss is
/// harmless: each send supersedes the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicUpdate {
    pub host_tank: TankState,
    pub guest_tank: TankState,
    pub bullets: Vec<BulletState>,
    pub turn_owner: Side,
}

/// Authoritative hand-off snapshot: the terrain diff and the turn flip. Held
/// and re-sent by the sender until the matching `TurnAck` arrives; `seq`
/// makes redelivery idempotent on the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnUpdate {
    pub seq: u64,
    pub terrain_bits: Vec<u8>,
    pub turn_owner: Side,
    /// Final authoritative dynamic state, applied alongside the terrain.
    pub update: DynamicUpdate,
}

#[derive(Debug)]
pub enum CodecError {
    Encode(bincode::error::EncodeError),
    Decode(bincode::error::DecodeError),
}

pub fn encode(msg: &WireMessage) -> Result<Vec<u8>, CodecError> {
    bincode::serde::encode_to_vec(msg, bincode::config::standard()).map_err(CodecError::Encode)
}

pub fn decode(bytes: &[u8]) -> Result<WireMessage, CodecError> {
    let (msg, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map_err(CodecError::Decode)?;
    Ok(msg)
}
