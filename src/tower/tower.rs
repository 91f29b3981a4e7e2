use crate::aircraft::{Aircraft, AircraftId, Fleet};
use crate::airport::{Gate, Terminal, TerminalKind};
use crate::error::{Result, TowerError};
use crate::task::TaskType;
use crate::time::Tick;
use crate::tower::queue::{AircraftQueue, LandingQueue, TakeoffQueue};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Formatter;
use tracing::{debug, debug_span, info, warn};

/// Position of a gate inside the tower's terminal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GateRef {
    pub terminal: usize,
    pub gate: usize,
}

/// Callsign -> ticks of loading left. Ordered by callsign so saves are stable.
pub type LoadingAircraft = BTreeMap<AircraftId, u32>;

pub struct ControlTower {
    ticks_elapsed: Tick,
    aircraft: Fleet,
    terminals: Vec<Terminal>,
    landing_queue: LandingQueue,
    takeoff_queue: TakeoffQueue,
    loading_aircraft: LoadingAircraft,
}

impl ControlTower {
    pub fn new(ticks_elapsed: Tick) -> ControlTower {
        ControlTower::from_parts(
            ticks_elapsed,
            Fleet::new(),
            LandingQueue::new(),
            TakeoffQueue::new(),
            LoadingAircraft::new(),
        )
    }

    /// Assembles a tower from already-validated state, without re-running queue placement.
    pub fn from_parts(
        ticks_elapsed: Tick,
        aircraft: Fleet,
        landing_queue: LandingQueue,
        takeoff_queue: TakeoffQueue,
        loading_aircraft: LoadingAircraft,
    ) -> ControlTower {
        ControlTower {
            ticks_elapsed,
            aircraft,
            terminals: vec![],
            landing_queue,
            takeoff_queue,
            loading_aircraft,
        }
    }

    pub fn ticks_elapsed(&self) -> Tick {
        self.ticks_elapsed
    }

    pub fn aircraft(&self) -> &Fleet {
        &self.aircraft
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn landing_queue(&self) -> &LandingQueue {
        &self.landing_queue
    }

    pub fn takeoff_queue(&self) -> &TakeoffQueue {
        &self.takeoff_queue
    }

    pub fn loading_aircraft(&self) -> &LoadingAircraft {
        &self.loading_aircraft
    }

    pub fn gate(&self, at: GateRef) -> Option<&Gate> {
        self.terminals.get(at.terminal).and_then(|t| t.gates().get(at.gate))
    }

    pub fn add_terminal(&mut self, terminal: Terminal) {
        self.terminals.push(terminal);
    }

    /// Aircraft that start on the ground (WAIT or LOAD) are parked straight away;
    /// if no gate fits, nothing is added.
    pub fn add_aircraft(&mut self, aircraft: Aircraft) -> Result<()> {
        if self.aircraft.contains(aircraft.callsign()) {
            return Err(TowerError::InvalidAircraft {
                callsign: aircraft.callsign().clone(),
                reason: "duplicate callsign".to_string(),
            });
        }
        let callsign = aircraft.callsign().clone();
        if matches!(aircraft.current_task().kind(), TaskType::Wait | TaskType::Load) {
            let at = self.find_unoccupied_gate(&aircraft)?;
            self.park(at, callsign.clone())?;
            debug!(%callsign, terminal = at.terminal, gate = at.gate, "parked on arrival");
        }
        self.aircraft.insert(aircraft)?;
        self.place_aircraft_in_queues(&callsign);
        Ok(())
    }

    pub fn find_gate_of_aircraft(&self, callsign: &str) -> Option<GateRef> {
        self.terminals.iter().enumerate().find_map(|(ti, terminal)| {
            terminal
                .gates()
                .iter()
                .position(|g| g.occupant().is_some_and(|id| **id == *callsign))
                .map(|gi| GateRef { terminal: ti, gate: gi })
        })
    }

    pub fn find_unoccupied_gate(&self, aircraft: &Aircraft) -> Result<GateRef> {
        Self::locate_free_gate(&self.terminals, aircraft)
    }

    // Terminal order first, then gate order; terminals in emergency take no new aircraft.
    fn locate_free_gate(terminals: &[Terminal], aircraft: &Aircraft) -> Result<GateRef> {
        terminals
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind().accepts(aircraft.kind()) && !t.has_emergency())
            .find_map(|(ti, t)| {
                t.unoccupied_gate_index()
                    .map(|gi| GateRef { terminal: ti, gate: gi })
            })
            .ok_or_else(|| {
                TowerError::NoSuitableGate(format!("no gate available for aircraft {}", aircraft.callsign()))
            })
    }

    // `at` comes from locate_free_gate, so its gate is the terminal's first free one.
    fn park(&mut self, at: GateRef, callsign: AircraftId) -> Result<()> {
        self.terminals
            .get_mut(at.terminal)
            .ok_or_else(|| TowerError::NoSuitableGate(format!("terminal {} does not exist", at.terminal)))?
            .find_unoccupied_gate()?
            .park(callsign)
    }

    pub fn try_land_aircraft(&mut self) -> bool {
        let Some(callsign) = self.landing_queue.peek(&self.aircraft).cloned() else {
            return false;
        };
        let Some(aircraft) = self.aircraft.get(&callsign) else {
            return false;
        };
        let at = match Self::locate_free_gate(&self.terminals, aircraft) {
            Ok(at) => at,
            Err(err) => {
                warn!(%callsign, "holding: {err}");
                return false;
            }
        };
        if let Err(err) = self.park(at, callsign.clone()) {
            warn!(%callsign, "holding: {err}");
            return false;
        }
        self.landing_queue.remove(&self.aircraft);
        if let Some(aircraft) = self.aircraft.get_mut(&callsign) {
            aircraft.unload();
            aircraft.tasks_mut().advance();
        }
        info!(%callsign, terminal = at.terminal, gate = at.gate, "landed");
        true
    }

    pub fn try_take_off_aircraft(&mut self) -> bool {
        let Some(callsign) = self.takeoff_queue.remove(&self.aircraft) else {
            return false;
        };
        if let Some(aircraft) = self.aircraft.get_mut(&callsign) {
            aircraft.tasks_mut().advance();
        }
        info!(%callsign, "took off");
        true
    }

    /// Counts every loading aircraft down by one tick; finished ones vacate their gate.
    pub fn load_aircraft(&mut self) {
        let mut finished = vec![];
        for (callsign, ticks) in self.loading_aircraft.iter_mut() {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                finished.push(callsign.clone());
            }
        }
        for callsign in finished {
            self.loading_aircraft.remove(&callsign);
            if let Some(at) = self.find_gate_of_aircraft(&callsign) {
                if let Some(gate) = self.terminals[at.terminal].gate_mut(at.gate) {
                    gate.release();
                }
            }
            if let Some(aircraft) = self.aircraft.get_mut(&callsign) {
                aircraft.tasks_mut().advance();
            }
            info!(%callsign, "loading complete");
        }
    }

    pub fn place_aircraft_in_queues(&mut self, callsign: &str) {
        if let Some(aircraft) = self.aircraft.get(callsign) {
            Self::bucket(
                aircraft,
                &mut self.landing_queue,
                &mut self.takeoff_queue,
                &mut self.loading_aircraft,
            );
        }
    }

    pub fn place_all_aircraft_in_queues(&mut self) {
        for aircraft in self.aircraft.iter() {
            Self::bucket(
                aircraft,
                &mut self.landing_queue,
                &mut self.takeoff_queue,
                &mut self.loading_aircraft,
            );
        }
    }

    fn bucket(
        aircraft: &Aircraft,
        landing_queue: &mut LandingQueue,
        takeoff_queue: &mut TakeoffQueue,
        loading_aircraft: &mut LoadingAircraft,
    ) {
        let callsign = aircraft.callsign();
        match aircraft.current_task().kind() {
            TaskType::Land if !landing_queue.contains(callsign) => {
                landing_queue.add(callsign.clone());
            }
            TaskType::Takeoff if !takeoff_queue.contains(callsign) => {
                takeoff_queue.add(callsign.clone());
            }
            TaskType::Load => {
                loading_aircraft
                    .entry(callsign.clone())
                    .or_insert_with(|| aircraft.loading_time());
            }
            _ => {}
        }
    }

    /// Runs one tick. Returns false, changing nothing, once the tick counter is exhausted.
    pub fn tick(&mut self) -> bool {
        let Some(next) = self.ticks_elapsed.next() else {
            warn!(tick = self.ticks_elapsed.0, "tick counter exhausted");
            return false;
        };
        let _span = debug_span!("tick", tick = self.ticks_elapsed.0).entered();

        self.aircraft.iter_mut().for_each(Aircraft::tick);

        self.aircraft
            .iter_mut()
            .filter(|a| matches!(a.current_task().kind(), TaskType::Away | TaskType::Wait))
            .for_each(|a| a.tasks_mut().advance());

        self.load_aircraft();

        if self.ticks_elapsed.is_even() {
            if !self.try_land_aircraft() {
                self.try_take_off_aircraft();
            }
        } else {
            self.try_take_off_aircraft();
        }

        self.place_all_aircraft_in_queues();
        debug!(
            landing = self.landing_queue.len(),
            takeoff = self.takeoff_queue.len(),
            loading = self.loading_aircraft.len(),
            "queues placed"
        );

        self.ticks_elapsed = next;
        true
    }

    /// Number of ticks actually run.
    pub fn tick_many(&mut self, ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < ticks && self.tick() {
            ran += 1;
        }
        ran
    }

    pub fn set_aircraft_emergency(&mut self, callsign: &str, emergency: bool) -> Result<()> {
        let aircraft = self
            .aircraft
            .get_mut(callsign)
            .ok_or_else(|| TowerError::UnknownAircraft(AircraftId::from(callsign)))?;
        if emergency {
            aircraft.declare_emergency();
        } else {
            aircraft.clear_emergency();
        }
        info!(%callsign, emergency, "aircraft emergency status changed");
        Ok(())
    }

    pub fn set_terminal_emergency(&mut self, kind: TerminalKind, number: u32, emergency: bool) -> Result<()> {
        let terminal = self
            .terminals
            .iter_mut()
            .find(|t| t.kind() == kind && t.number() == number)
            .ok_or(TowerError::UnknownTerminal { kind, number })?;
        if emergency {
            terminal.declare_emergency();
        } else {
            terminal.clear_emergency();
        }
        info!(%kind, number, emergency, "terminal emergency status changed");
        Ok(())
    }
}

impl fmt::Display for ControlTower {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ControlTower: {} terminals, {} total aircraft ({} LAND, {} TAKEOFF, {} LOAD)",
            self.terminals.len(),
            self.aircraft.len(),
            self.landing_queue.len(),
            self.takeoff_queue.len(),
            self.loading_aircraft.len()
        )
    }
}
