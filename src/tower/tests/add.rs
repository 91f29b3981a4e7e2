use crate::aircraft::Model;
use crate::airport::TerminalKind::{Airplane, Helicopter};
use crate::error::TowerError;
use crate::tower::GateRef;
use crate::tower::tests::utils::{add_terminal, aircraft, id, ids, landing_order, occupant, takeoff_order, tower};

#[test]
fn test_loading_aircraft_is_parked_on_add() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[2, 1, 3]);
    tower
        .add_aircraft(aircraft("UTD302", Model::AirbusA320, "LOAD@60,TAKEOFF,AWAY,AWAY,AWAY,LAND,WAIT,WAIT", 40.0, 4))
        .unwrap();

    assert_eq!(1, tower.aircraft().len());
    assert_eq!(Some(&2), tower.loading_aircraft().get("UTD302"));
    assert!(landing_order(&tower).is_empty());
    assert!(takeoff_order(&tower).is_empty());
    // first gate added, not lowest number
    let at = tower.find_gate_of_aircraft("UTD302").unwrap();
    assert_eq!(GateRef { terminal: 0, gate: 0 }, at);
    assert_eq!(2, tower.gate(at).unwrap().number());
}

#[test]
fn test_waiting_aircraft_is_parked_but_not_queued() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("UTD302", Model::Boeing787, "WAIT,LOAD@100,TAKEOFF,AWAY,AWAY,AWAY,LAND", 10000.0, 0))
        .unwrap();

    assert_eq!(Some(id("UTD302")), occupant(&tower, 0, 0));
    assert!(tower.loading_aircraft().is_empty());
    assert!(landing_order(&tower).is_empty());
}

#[test]
fn test_airborne_aircraft_go_to_their_queues() {
    let mut tower = tower(0);
    tower
        .add_aircraft(aircraft("LANDER", Model::AirbusA320, "LAND,WAIT,WAIT,LOAD@60,TAKEOFF,AWAY,AWAY,AWAY", 40.0, 100))
        .unwrap();
    tower
        .add_aircraft(aircraft("TAKER", Model::AirbusA320, "TAKEOFF,AWAY,AWAY,AWAY,LAND,WAIT,WAIT,LOAD@60", 40.0, 4))
        .unwrap();

    assert_eq!(ids(&["LANDER"]), landing_order(&tower));
    assert_eq!(ids(&["TAKER"]), takeoff_order(&tower));
    assert_eq!(None, tower.find_gate_of_aircraft("LANDER"));
}

#[test]
fn test_add_fails_without_compatible_gate() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Helicopter, 1, &[1]);
    let result =
        tower.add_aircraft(aircraft("UTD302", Model::AirbusA320, "LOAD@60,TAKEOFF,AWAY,AWAY,AWAY,LAND,WAIT,WAIT", 40.0, 4));

    assert!(matches!(result, Err(TowerError::NoSuitableGate(_))));
    assert!(tower.aircraft().is_empty());
    assert!(tower.loading_aircraft().is_empty());
    assert_eq!(None, occupant(&tower, 0, 0));
}

#[test]
fn test_add_skips_emergency_terminal() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    add_terminal(&mut tower, Airplane, 2, &[1]);
    tower.set_terminal_emergency(Airplane, 1, true).unwrap();
    tower
        .add_aircraft(aircraft("UTD302", Model::AirbusA320, "WAIT,LOAD@60,TAKEOFF,AWAY,LAND", 40.0, 4))
        .unwrap();
    assert_eq!(Some(GateRef { terminal: 1, gate: 0 }), tower.find_gate_of_aircraft("UTD302"));

    tower.set_terminal_emergency(Airplane, 2, true).unwrap();
    let result = tower.add_aircraft(aircraft("QFA481", Model::AirbusA320, "WAIT,LOAD@60,TAKEOFF,AWAY,LAND", 40.0, 4));
    assert!(matches!(result, Err(TowerError::NoSuitableGate(_))));

    // emergency does not evict
    assert_eq!(Some(id("UTD302")), occupant(&tower, 1, 0));
}

#[test]
fn test_duplicate_callsign_is_rejected() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1, 2]);
    tower
        .add_aircraft(aircraft("UTD302", Model::AirbusA320, "WAIT,LOAD@60,TAKEOFF,AWAY,LAND", 40.0, 4))
        .unwrap();
    let result = tower.add_aircraft(aircraft("UTD302", Model::AirbusA320, "WAIT,LOAD@60,TAKEOFF,AWAY,LAND", 40.0, 4));

    assert!(matches!(result, Err(TowerError::InvalidAircraft { .. })));
    assert_eq!(None, occupant(&tower, 0, 1));
}

#[test]
fn test_find_unoccupied_gate() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Helicopter, 1, &[1]);
    add_terminal(&mut tower, Airplane, 1, &[1, 2]);
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "WAIT,LOAD@60,TAKEOFF,AWAY,LAND", 40.0, 4))
        .unwrap();

    let away = aircraft("VH-BFK", Model::AirbusA320, "AWAY,AWAY,LAND,WAIT,WAIT,LOAD@60,TAKEOFF,AWAY", 40.0, 4);
    assert_eq!(GateRef { terminal: 1, gate: 1 }, tower.find_unoccupied_gate(&away).unwrap());

    let heli = aircraft("VH-HEL", Model::SikorskySkycrane, "AWAY,LAND,WAIT,LOAD@10,TAKEOFF", 100.0, 0);
    assert_eq!(GateRef { terminal: 0, gate: 0 }, tower.find_unoccupied_gate(&heli).unwrap());
}

#[test]
fn test_emergency_toggles_by_reference() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "AWAY,LAND,WAIT,LOAD@60,TAKEOFF", 40.0, 4))
        .unwrap();

    tower.set_aircraft_emergency("QFA481", true).unwrap();
    assert!(tower.aircraft().get("QFA481").unwrap().has_emergency());
    tower.set_aircraft_emergency("QFA481", false).unwrap();
    assert!(!tower.aircraft().get("QFA481").unwrap().has_emergency());

    assert!(matches!(
        tower.set_aircraft_emergency("NOPE", true),
        Err(TowerError::UnknownAircraft(_))
    ));
    assert!(matches!(
        tower.set_terminal_emergency(Helicopter, 1, true),
        Err(TowerError::UnknownTerminal { number: 1, .. })
    ));
    tower.set_terminal_emergency(Airplane, 1, true).unwrap();
    assert!(tower.terminals()[0].has_emergency());
}
