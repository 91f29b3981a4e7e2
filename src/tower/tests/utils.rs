use crate::aircraft::{Aircraft, AircraftId, Model};
use crate::airport::{Gate, Terminal, TerminalKind};
use crate::task::TaskList;
use crate::time::Tick;
use crate::tower::ControlTower;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> AircraftId {
    Arc::from(s)
}

pub fn aircraft(callsign: &str, model: Model, tasks: &str, fuel: f64, cargo: u32) -> Aircraft {
    Aircraft::new(id(callsign), model, tasks.parse::<TaskList>().unwrap(), fuel, cargo).unwrap()
}

pub fn emergency(mut aircraft: Aircraft) -> Aircraft {
    aircraft.declare_emergency();
    aircraft
}

pub fn terminal(kind: TerminalKind, number: u32, gates: &[u32]) -> Terminal {
    let mut terminal = Terminal::new(kind, number);
    for gate in gates {
        terminal.add_gate(Gate::new(*gate)).unwrap();
    }
    terminal
}

pub fn add_terminal(tower: &mut ControlTower, kind: TerminalKind, number: u32, gates: &[u32]) {
    tower.add_terminal(terminal(kind, number, gates));
}

pub fn tower(ticks: u64) -> ControlTower {
    ControlTower::new(Tick(ticks))
}

pub fn occupant(tower: &ControlTower, terminal: usize, gate: usize) -> Option<AircraftId> {
    tower.terminals()[terminal].gates()[gate].occupant().cloned()
}

pub fn landing_order(tower: &ControlTower) -> Vec<AircraftId> {
    use crate::tower::AircraftQueue;
    tower.landing_queue().all_in_order(tower.aircraft())
}

pub fn takeoff_order(tower: &ControlTower) -> Vec<AircraftId> {
    use crate::tower::AircraftQueue;
    tower.takeoff_queue().all_in_order(tower.aircraft())
}

pub fn ids(callsigns: &[&str]) -> Vec<AircraftId> {
    callsigns.iter().map(|c| id(c)).collect()
}

pub fn arb_model() -> impl Strategy<Value = Model> {
    prop_oneof![
        Just(Model::AirbusA320),
        Just(Model::Boeing747_8F),
        Just(Model::RobinsonR44),
        Just(Model::Boeing787),
        Just(Model::Fokker100),
        Just(Model::SikorskySkycrane),
    ]
}

/// Rotations of the scripts used throughout the tower tests.
pub fn arb_task_list() -> impl Strategy<Value = TaskList> {
    (
        prop_oneof![
            Just("AWAY,AWAY,LAND,WAIT,WAIT,LOAD@60,TAKEOFF,AWAY"),
            Just("LAND,WAIT,LOAD@75,TAKEOFF,AWAY,AWAY"),
            Just("LAND,LOAD@100,TAKEOFF,AWAY"),
            Just("AWAY,LAND,WAIT,LOAD@20,TAKEOFF"),
            Just("WAIT,LOAD@50,TAKEOFF,AWAY,AWAY,AWAY,LAND"),
        ],
        0..8usize,
    )
        .prop_map(|(script, shift)| {
            let mut tasks: TaskList = script.parse().unwrap();
            for _ in 0..shift {
                tasks.advance();
            }
            tasks
        })
}
