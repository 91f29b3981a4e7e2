use crate::aircraft::{AircraftId, AircraftKind};
use crate::error::{Result, TowerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;

pub const MAX_NUM_GATES: usize = 6;
/// Written in place of a callsign for a free gate.
pub const EMPTY_GATE: &str = "empty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalKind {
    #[serde(rename = "AirplaneTerminal")]
    Airplane,
    #[serde(rename = "HelicopterTerminal")]
    Helicopter,
}

impl TerminalKind {
    pub fn accepts(self, kind: AircraftKind) -> bool {
        matches!(
            (self, kind),
            (TerminalKind::Airplane, AircraftKind::Airplane) | (TerminalKind::Helicopter, AircraftKind::Helicopter)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TerminalKind::Airplane => "AirplaneTerminal",
            TerminalKind::Helicopter => "HelicopterTerminal",
        }
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TerminalKind {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "AirplaneTerminal" => Ok(TerminalKind::Airplane),
            "HelicopterTerminal" => Ok(TerminalKind::Helicopter),
            _ => Err(TowerError::malformed(format!("unknown terminal kind '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    number: u32,
    occupant: Option<AircraftId>,
}

impl Gate {
    pub fn new(number: u32) -> Gate {
        Gate { number, occupant: None }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn occupant(&self) -> Option<&AircraftId> {
        self.occupant.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn park(&mut self, callsign: AircraftId) -> Result<()> {
        if let Some(occupant) = &self.occupant {
            return Err(TowerError::AlreadyOccupied {
                gate: self.number,
                occupant: occupant.clone(),
            });
        }
        self.occupant = Some(callsign);
        Ok(())
    }

    pub fn release(&mut self) -> Option<AircraftId> {
        self.occupant.take()
    }

    pub fn encode(&self) -> String {
        format!("{}:{}", self.number, self.occupant.as_deref().unwrap_or(EMPTY_GATE))
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.occupant {
            Some(callsign) => write!(f, "Gate {} [{}]", self.number, callsign),
            None => write!(f, "Gate {} [{}]", self.number, EMPTY_GATE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    kind: TerminalKind,
    number: u32,
    gates: Vec<Gate>,
    emergency: bool,
}

impl Terminal {
    pub fn new(kind: TerminalKind, number: u32) -> Terminal {
        Terminal {
            kind,
            number,
            gates: Vec::with_capacity(MAX_NUM_GATES),
            emergency: false,
        }
    }

    pub fn kind(&self) -> TerminalKind {
        self.kind
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn add_gate(&mut self, gate: Gate) -> Result<()> {
        if self.gates.len() >= MAX_NUM_GATES {
            return Err(TowerError::CapacityExceeded {
                terminal: self.number,
                max: MAX_NUM_GATES,
            });
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Index of the first free gate, in the order gates were added.
    pub fn unoccupied_gate_index(&self) -> Option<usize> {
        self.gates.iter().position(|g| !g.is_occupied())
    }

    pub fn find_unoccupied_gate(&mut self) -> Result<&mut Gate> {
        let number = self.number;
        self.gates
            .iter_mut()
            .find(|g| !g.is_occupied())
            .ok_or_else(|| TowerError::NoSuitableGate(format!("no unoccupied gate in terminal {number}")))
    }

    pub(crate) fn gate_mut(&mut self, index: usize) -> Option<&mut Gate> {
        self.gates.get_mut(index)
    }

    pub fn declare_emergency(&mut self) {
        self.emergency = true;
    }

    pub fn clear_emergency(&mut self) {
        self.emergency = false;
    }

    pub fn has_emergency(&self) -> bool {
        self.emergency
    }

    pub fn occupancy_percent(&self) -> u32 {
        if self.gates.is_empty() {
            return 0;
        }
        let occupied = self.gates.iter().filter(|g| g.is_occupied()).count();
        (100.0 * occupied as f64 / self.gates.len() as f64).round() as u32
    }

    pub fn encode(&self) -> String {
        let mut lines = vec![format!(
            "{}:{}:{}:{}",
            self.kind,
            self.number,
            self.emergency,
            self.gates.len()
        )];
        lines.extend(self.gates.iter().map(Gate::encode));
        lines.join("\n")
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} gates{}",
            self.kind,
            self.number,
            self.gates.len(),
            if self.emergency { " (EMERGENCY)" } else { "" }
        )
    }
}
