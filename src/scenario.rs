use crate::aircraft::{Aircraft, Model};
use crate::airport::{Gate, Terminal, TerminalKind};
use crate::error::Result;
use crate::task::TaskList;
use crate::time::Tick;
use crate::tower::ControlTower;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Starting state for a tower, described in JSON.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub ticks: u64,
    #[serde(default)]
    pub terminals: Vec<TerminalSpec>,
    #[serde(default)]
    pub aircraft: Vec<AircraftSpec>,
}

#[derive(Debug, Deserialize)]
pub struct TerminalSpec {
    pub kind: TerminalKind,
    pub number: u32,
    /// Gates are numbered 1..=gates.
    pub gates: u32,
    #[serde(default)]
    pub emergency: bool,
}

#[derive(Debug, Deserialize)]
pub struct AircraftSpec {
    pub callsign: String,
    pub model: Model,
    pub tasks: String,
    pub fuel: f64,
    #[serde(default)]
    pub cargo: u32,
    #[serde(default)]
    pub emergency: bool,
}

impl Scenario {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Terminals first, then aircraft in file order, exactly as if added by hand.
    pub fn build(self) -> Result<ControlTower> {
        let mut tower = ControlTower::new(Tick(self.ticks));
        for spec in self.terminals {
            let mut terminal = Terminal::new(spec.kind, spec.number);
            for number in 1..=spec.gates {
                terminal.add_gate(Gate::new(number))?;
            }
            if spec.emergency {
                terminal.declare_emergency();
            }
            tower.add_terminal(terminal);
        }
        for spec in self.aircraft {
            let tasks = spec.tasks.parse::<TaskList>()?;
            let mut aircraft = Aircraft::new(spec.callsign, spec.model, tasks, spec.fuel, spec.cargo)?;
            if spec.emergency {
                aircraft.declare_emergency();
            }
            tower.add_aircraft(aircraft)?;
        }
        info!("built {tower}");
        Ok(tower)
    }
}
