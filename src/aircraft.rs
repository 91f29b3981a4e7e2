use crate::airport::EMPTY_GATE;
use crate::error::{Result, TowerError};
use crate::task::{Task, TaskList};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;
use std::sync::Arc;

pub type AircraftId = Arc<str>;

/// kg per litre of jet fuel
pub const FUEL_DENSITY: f64 = 0.8;
pub const AVG_PASSENGER_WEIGHT: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AircraftKind {
    Airplane,
    Helicopter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Passenger,
    Freight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Characteristics {
    pub kind: AircraftKind,
    pub empty_weight: u32,
    pub max_takeoff_weight: u32,
    pub range: u32,
    pub fuel_capacity: f64,
    pub passenger_capacity: u32,
    pub freight_capacity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "AIRBUS_A320")]
    AirbusA320,
    #[serde(rename = "BOEING_747_8F")]
    Boeing747_8F,
    #[serde(rename = "ROBINSON_R44")]
    RobinsonR44,
    #[serde(rename = "BOEING_787")]
    Boeing787,
    #[serde(rename = "FOKKER_100")]
    Fokker100,
    #[serde(rename = "SIKORSKY_SKYCRANE")]
    SikorskySkycrane,
}

impl Model {
    pub const ALL: [Model; 6] = [
        Model::AirbusA320,
        Model::Boeing747_8F,
        Model::RobinsonR44,
        Model::Boeing787,
        Model::Fokker100,
        Model::SikorskySkycrane,
    ];

    pub fn characteristics(self) -> &'static Characteristics {
        use AircraftKind::{Airplane, Helicopter};
        match self {
            Model::AirbusA320 => &Characteristics {
                kind: Airplane,
                empty_weight: 42600,
                max_takeoff_weight: 78000,
                range: 6300,
                fuel_capacity: 27200.0,
                passenger_capacity: 150,
                freight_capacity: 0,
            },
            Model::Boeing747_8F => &Characteristics {
                kind: Airplane,
                empty_weight: 197131,
                max_takeoff_weight: 447700,
                range: 8130,
                fuel_capacity: 226117.0,
                passenger_capacity: 0,
                freight_capacity: 137756,
            },
            Model::RobinsonR44 => &Characteristics {
                kind: Helicopter,
                empty_weight: 658,
                max_takeoff_weight: 1134,
                range: 560,
                fuel_capacity: 190.0,
                passenger_capacity: 4,
                freight_capacity: 0,
            },
            Model::Boeing787 => &Characteristics {
                kind: Airplane,
                empty_weight: 119950,
                max_takeoff_weight: 227930,
                range: 14010,
                fuel_capacity: 126206.0,
                passenger_capacity: 242,
                freight_capacity: 0,
            },
            Model::Fokker100 => &Characteristics {
                kind: Airplane,
                empty_weight: 24375,
                max_takeoff_weight: 44450,
                range: 3170,
                fuel_capacity: 13365.0,
                passenger_capacity: 100,
                freight_capacity: 0,
            },
            Model::SikorskySkycrane => &Characteristics {
                kind: Helicopter,
                empty_weight: 8724,
                max_takeoff_weight: 21319,
                range: 740,
                fuel_capacity: 3328.0,
                passenger_capacity: 0,
                freight_capacity: 9100,
            },
        }
    }

    pub fn category(self) -> Category {
        if self.characteristics().passenger_capacity > 0 {
            Category::Passenger
        } else {
            Category::Freight
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Model::AirbusA320 => "AIRBUS_A320",
            Model::Boeing747_8F => "BOEING_747_8F",
            Model::RobinsonR44 => "ROBINSON_R44",
            Model::Boeing787 => "BOEING_787",
            Model::Fokker100 => "FOKKER_100",
            Model::SikorskySkycrane => "SIKORSKY_SKYCRANE",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self> {
        Model::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| TowerError::malformed(format!("unknown aircraft model '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aircraft {
    callsign: AircraftId,
    model: Model,
    tasks: TaskList,
    fuel: f64,
    cargo: u32,
    emergency: bool,
}

impl Aircraft {
    /// Cargo is a passenger head count or freight kg, depending on the model's category.
    pub fn new(
        callsign: impl Into<AircraftId>,
        model: Model,
        tasks: TaskList,
        fuel: f64,
        cargo: u32,
    ) -> Result<Aircraft> {
        let callsign = callsign.into();
        let invalid = |reason: String| TowerError::InvalidAircraft {
            callsign: callsign.clone(),
            reason,
        };
        if let Some(reason) = Self::callsign_problem(&callsign) {
            return Err(invalid(reason.to_string()));
        }
        let capacity = model.characteristics().fuel_capacity;
        if !fuel.is_finite() || fuel < 0.0 || fuel > capacity {
            return Err(invalid(format!("fuel {fuel:.2} outside 0..={capacity:.2}")));
        }
        let cargo_capacity = Self::cargo_capacity_of(model);
        if cargo > cargo_capacity {
            return Err(invalid(format!("cargo {cargo} exceeds capacity {cargo_capacity}")));
        }
        Ok(Aircraft {
            callsign,
            model,
            tasks,
            fuel,
            cargo,
            emergency: false,
        })
    }

    // Callsigns are written bare into saves, so they may not collide with its separators or tokens.
    fn callsign_problem(callsign: &str) -> Option<&'static str> {
        if callsign.is_empty() {
            Some("callsign is empty")
        } else if callsign == EMPTY_GATE {
            Some("callsign is reserved")
        } else if callsign
            .chars()
            .any(|c| matches!(c, ':' | ',' | '@') || c.is_whitespace() || c.is_control())
        {
            Some("callsign contains a separator, whitespace or control character")
        } else {
            None
        }
    }

    fn cargo_capacity_of(model: Model) -> u32 {
        let c = model.characteristics();
        match model.category() {
            Category::Passenger => c.passenger_capacity,
            Category::Freight => c.freight_capacity,
        }
    }

    pub fn callsign(&self) -> &AircraftId {
        &self.callsign
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn characteristics(&self) -> &'static Characteristics {
        self.model.characteristics()
    }

    pub fn kind(&self) -> AircraftKind {
        self.characteristics().kind
    }

    pub fn category(&self) -> Category {
        self.model.category()
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskList {
        &mut self.tasks
    }

    pub fn current_task(&self) -> Task {
        self.tasks.current()
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    pub fn cargo(&self) -> u32 {
        self.cargo
    }

    pub fn cargo_capacity(&self) -> u32 {
        Self::cargo_capacity_of(self.model)
    }

    pub fn has_emergency(&self) -> bool {
        self.emergency
    }

    pub fn declare_emergency(&mut self) {
        self.emergency = true;
    }

    pub fn clear_emergency(&mut self) {
        self.emergency = false;
    }

    pub fn fuel_percent_remaining(&self) -> u32 {
        (100.0 * self.fuel / self.characteristics().fuel_capacity).round() as u32
    }

    pub fn cargo_weight(&self) -> f64 {
        match self.category() {
            Category::Passenger => self.cargo as f64 * AVG_PASSENGER_WEIGHT,
            Category::Freight => self.cargo as f64,
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.characteristics().empty_weight as f64 + self.fuel * FUEL_DENSITY + self.cargo_weight()
    }

    /// Passengers disembark / freight is unloaded the moment the aircraft reaches its gate.
    pub fn unload(&mut self) {
        self.cargo = 0;
    }

    // Percentage of the next LOAD task, looking from the current task onwards.
    fn upcoming_load_percent(&self) -> u8 {
        self.tasks
            .iter_from_current()
            .find_map(Task::load_percent)
            .unwrap_or(0)
    }

    fn load_target(&self, percent: u8) -> u32 {
        self.cargo_capacity() * percent as u32 / 100
    }

    /// Ticks the aircraft spends at its gate for the upcoming LOAD task.
    pub fn loading_time(&self) -> u32 {
        let target = self.load_target(self.upcoming_load_percent());
        match self.category() {
            Category::Passenger if target == 0 => 1,
            Category::Passenger => ((target as f64).log10().round() as u32).max(1),
            Category::Freight if target < 1000 => 1,
            Category::Freight if target <= 50000 => 2,
            Category::Freight => 3,
        }
    }

    /// Advances fuel and cargo by one tick. Never changes the current task.
    pub fn tick(&mut self) {
        let capacity = self.characteristics().fuel_capacity;
        match self.current_task() {
            Task::Away => {
                self.fuel = (self.fuel - capacity * 0.1).max(0.0);
            }
            Task::Load { percent } => {
                let ticks = self.loading_time();
                self.fuel = (self.fuel + capacity / ticks as f64).min(capacity);
                let target = self.load_target(percent);
                if self.cargo < target {
                    self.cargo = (self.cargo + target.div_ceil(ticks)).min(target);
                }
            }
            Task::Land | Task::Wait | Task::Takeoff => {}
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{:.2}:{}:{}",
            self.callsign,
            self.model,
            self.tasks.encode(),
            self.fuel,
            self.emergency,
            self.cargo
        )
    }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let unit = match self.category() {
            Category::Passenger => "passengers",
            Category::Freight => "kg freight",
        };
        write!(
            f,
            "{} {} ({}) {}% fuel, {} {}{}",
            self.kind_label(),
            self.callsign,
            self.model,
            self.fuel_percent_remaining(),
            self.cargo,
            unit,
            if self.emergency { " (EMERGENCY)" } else { "" }
        )
    }
}

impl Aircraft {
    fn kind_label(&self) -> &'static str {
        match self.kind() {
            AircraftKind::Airplane => "AIRPLANE",
            AircraftKind::Helicopter => "HELICOPTER",
        }
    }
}

/// Every aircraft managed by a tower, in insertion order, indexed by callsign.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    aircraft: Vec<Aircraft>,
    index: HashMap<AircraftId, usize>,
}

impl Fleet {
    pub fn new() -> Fleet {
        Fleet::default()
    }

    pub fn insert(&mut self, aircraft: Aircraft) -> Result<()> {
        if self.index.contains_key(aircraft.callsign()) {
            return Err(TowerError::InvalidAircraft {
                callsign: aircraft.callsign().clone(),
                reason: "duplicate callsign".to_string(),
            });
        }
        self.index.insert(aircraft.callsign().clone(), self.aircraft.len());
        self.aircraft.push(aircraft);
        Ok(())
    }

    pub fn contains(&self, callsign: &str) -> bool {
        self.index.contains_key(callsign)
    }

    pub fn get(&self, callsign: &str) -> Option<&Aircraft> {
        self.index.get(callsign).map(|i| &self.aircraft[*i])
    }

    pub fn get_mut(&mut self, callsign: &str) -> Option<&mut Aircraft> {
        self.index.get(callsign).map(|i| &mut self.aircraft[*i])
    }

    /// Resolves a callsign to the shared id held by the fleet.
    pub fn resolve(&self, callsign: &str) -> Option<&AircraftId> {
        self.get(callsign).map(Aircraft::callsign)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aircraft> {
        self.aircraft.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Aircraft> {
        self.aircraft.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }
}

impl PartialEq for Fleet {
    fn eq(&self, other: &Self) -> bool {
        self.aircraft == other.aircraft
    }
}
