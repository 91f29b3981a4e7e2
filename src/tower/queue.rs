use crate::aircraft::{Aircraft, AircraftId, Category, Fleet};
use std::collections::VecDeque;
use std::fmt;
use std::fmt::Formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    Takeoff,
    Landing,
}

impl QueueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueueKind::Takeoff => "TakeoffQueue",
            QueueKind::Landing => "LandingQueue",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aircraft waiting for the runway. Queues hold callsigns; the fleet is
/// passed in whenever a policy needs to look at the aircraft themselves.
pub trait AircraftQueue {
    fn kind(&self) -> QueueKind;

    fn add(&mut self, callsign: AircraftId);

    fn peek(&self, fleet: &Fleet) -> Option<&AircraftId>;

    fn remove(&mut self, fleet: &Fleet) -> Option<AircraftId>;

    fn contains(&self, callsign: &str) -> bool;

    /// Contents in the order `remove` would hand them out.
    fn all_in_order(&self, fleet: &Fleet) -> Vec<AircraftId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn encode(&self, fleet: &Fleet) -> String {
        let order = self.all_in_order(fleet);
        let header = format!("{}:{}", self.kind(), order.len());
        if order.is_empty() {
            header
        } else {
            format!("{}\n{}", header, order.join(","))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TakeoffQueue {
    aircraft: VecDeque<AircraftId>,
}

impl TakeoffQueue {
    pub fn new() -> TakeoffQueue {
        TakeoffQueue::default()
    }
}

impl AircraftQueue for TakeoffQueue {
    fn kind(&self) -> QueueKind {
        QueueKind::Takeoff
    }

    fn add(&mut self, callsign: AircraftId) {
        self.aircraft.push_back(callsign);
    }

    fn peek(&self, _fleet: &Fleet) -> Option<&AircraftId> {
        self.aircraft.front()
    }

    fn remove(&mut self, _fleet: &Fleet) -> Option<AircraftId> {
        self.aircraft.pop_front()
    }

    fn contains(&self, callsign: &str) -> bool {
        self.aircraft.iter().any(|id| **id == *callsign)
    }

    fn all_in_order(&self, _fleet: &Fleet) -> Vec<AircraftId> {
        self.aircraft.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.aircraft.len()
    }
}

/// Landing tiers, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Emergency,
    LowFuel,
    Passenger,
    Normal,
}

impl Priority {
    pub const LOW_FUEL_PERCENT: u32 = 20;

    pub fn of(aircraft: &Aircraft) -> Priority {
        if aircraft.has_emergency() {
            Priority::Emergency
        } else if aircraft.fuel_percent_remaining() < Self::LOW_FUEL_PERCENT {
            Priority::LowFuel
        } else if aircraft.category() == Category::Passenger {
            Priority::Passenger
        } else {
            Priority::Normal
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Emergency => "emergency",
            Priority::LowFuel => "low fuel",
            Priority::Passenger => "passenger",
            Priority::Normal => "normal",
        };
        f.write_str(label)
    }
}

/// Unordered storage; the head is whichever aircraft ranks highest, earliest
/// arrival breaking ties within a tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandingQueue {
    aircraft: Vec<AircraftId>,
}

impl LandingQueue {
    pub fn new() -> LandingQueue {
        LandingQueue::default()
    }

    fn rank(fleet: &Fleet, callsign: &str) -> Priority {
        fleet.get(callsign).map_or(Priority::Normal, Priority::of)
    }

    fn head_index(&self, fleet: &Fleet) -> Option<usize> {
        self.aircraft
            .iter()
            .enumerate()
            .min_by_key(|(i, id)| (Self::rank(fleet, id), *i))
            .map(|(i, _)| i)
    }

    pub fn priority_of(&self, fleet: &Fleet, callsign: &str) -> Option<Priority> {
        self.contains(callsign).then(|| Self::rank(fleet, callsign))
    }
}

impl AircraftQueue for LandingQueue {
    fn kind(&self) -> QueueKind {
        QueueKind::Landing
    }

    fn add(&mut self, callsign: AircraftId) {
        self.aircraft.push(callsign);
    }

    fn peek(&self, fleet: &Fleet) -> Option<&AircraftId> {
        self.head_index(fleet).map(|i| &self.aircraft[i])
    }

    fn remove(&mut self, fleet: &Fleet) -> Option<AircraftId> {
        self.head_index(fleet).map(|i| self.aircraft.remove(i))
    }

    fn contains(&self, callsign: &str) -> bool {
        self.aircraft.iter().any(|id| **id == *callsign)
    }

    // Draining by rank is a stable sort on the tier, so no removal replay is needed.
    fn all_in_order(&self, fleet: &Fleet) -> Vec<AircraftId> {
        let mut ranked = self
            .aircraft
            .iter()
            .map(|id| (Self::rank(fleet, id), id.clone()))
            .collect::<Vec<_>>();
        ranked.sort_by_key(|(priority, _)| *priority);
        ranked.into_iter().map(|(_, id)| id).collect()
    }

    fn len(&self) -> usize {
        self.aircraft.len()
    }
}
