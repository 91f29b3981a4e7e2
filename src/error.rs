use crate::aircraft::AircraftId;
use crate::airport::TerminalKind;

pub type Result<T> = std::result::Result<T, TowerError>;

#[derive(Debug, thiserror::Error)]
pub enum TowerError {
    #[error("terminal {terminal} already holds the maximum of {max} gates")]
    CapacityExceeded { terminal: u32, max: usize },

    #[error("no suitable gate: {0}")]
    NoSuitableGate(String),

    #[error("gate {gate} is already occupied by {occupant}")]
    AlreadyOccupied { gate: u32, occupant: AircraftId },

    #[error("invalid task sequence: {0}")]
    InvalidTaskSequence(String),

    #[error("invalid aircraft {callsign}: {reason}")]
    InvalidAircraft { callsign: AircraftId, reason: String },

    #[error("unknown aircraft {0}")]
    UnknownAircraft(AircraftId),

    #[error("unknown terminal {kind} {number}")]
    UnknownTerminal { kind: TerminalKind, number: u32 },

    #[error("malformed save: {0}")]
    MalformedInput(String),

    #[error("failed to parse scenario: {source}")]
    Scenario {
        #[from]
        source: serde_json::Error,
    },

    #[error("i/o error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TowerError {
    pub(crate) fn malformed(cause: impl Into<String>) -> TowerError {
        TowerError::MalformedInput(cause.into())
    }
}
