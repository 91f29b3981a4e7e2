use crate::aircraft::Model;
use crate::airport::TerminalKind::{Airplane, Helicopter};
use crate::task::{Task, TaskType};
use crate::time::Tick;
use crate::tower::tests::utils::{
    add_terminal, aircraft, emergency, id, ids, landing_order, occupant, takeoff_order, tower,
};

#[test]
fn test_even_tick_lands_aircraft() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "LAND,WAIT,LOAD@60,TAKEOFF,AWAY,AWAY,AWAY", 10000.0, 100))
        .unwrap();
    assert_eq!(ids(&["QFA481"]), landing_order(&tower));

    tower.tick();

    assert_eq!(Tick(1), tower.ticks_elapsed());
    assert_eq!(Some(id("QFA481")), occupant(&tower, 0, 0));
    assert!(landing_order(&tower).is_empty());
    let qfa = tower.aircraft().get("QFA481").unwrap();
    assert_eq!(0, qfa.cargo());
    // landed during this tick, so the WAIT is not skipped until the next one
    assert_eq!(Task::Wait, qfa.current_task());
}

#[test]
fn test_full_ground_cycle() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "LAND,WAIT,LOAD@60,TAKEOFF,AWAY,AWAY,AWAY", 10000.0, 100))
        .unwrap();

    // tick 0: land
    tower.tick();
    // tick 1: WAIT -> LOAD, placed in the loading map
    tower.tick();
    assert_eq!(Task::Load { percent: 60 }, tower.aircraft().get("QFA481").unwrap().current_task());
    assert_eq!(Some(&2), tower.loading_aircraft().get("QFA481"));

    // tick 2: first loading tick
    tower.tick();
    assert_eq!(Some(&1), tower.loading_aircraft().get("QFA481"));
    assert_eq!(45, tower.aircraft().get("QFA481").unwrap().cargo());

    // tick 3: loading done, gate freed, queued for takeoff
    tower.tick();
    assert!(tower.loading_aircraft().is_empty());
    assert_eq!(None, occupant(&tower, 0, 0));
    let qfa = tower.aircraft().get("QFA481").unwrap();
    assert_eq!(Task::Takeoff, qfa.current_task());
    assert_eq!(90, qfa.cargo());
    assert_eq!(100, qfa.fuel_percent_remaining());
    assert_eq!(ids(&["QFA481"]), takeoff_order(&tower));

    // tick 4: even, nothing to land so the takeoff goes
    tower.tick();
    assert!(takeoff_order(&tower).is_empty());
    assert_eq!(Task::Away, tower.aircraft().get("QFA481").unwrap().current_task());

    // tick 5: burns fuel and moves on to the next AWAY
    tower.tick();
    let qfa = tower.aircraft().get("QFA481").unwrap();
    assert_eq!(90, qfa.fuel_percent_remaining());
    assert_eq!(5, qfa.tasks().position());
}

#[test]
fn test_loading_countdown_releases_gate() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("UTD302", Model::AirbusA320, "LOAD@60,TAKEOFF,AWAY,LAND,WAIT", 0.0, 0))
        .unwrap();
    assert_eq!(Some(&2), tower.loading_aircraft().get("UTD302"));
    assert_eq!(Some(id("UTD302")), occupant(&tower, 0, 0));

    tower.tick();
    assert_eq!(Some(&1), tower.loading_aircraft().get("UTD302"));
    assert_eq!(Some(id("UTD302")), occupant(&tower, 0, 0));

    tower.tick();
    assert!(tower.loading_aircraft().get("UTD302").is_none());
    assert_eq!(None, occupant(&tower, 0, 0));
    assert_eq!(None, tower.find_gate_of_aircraft("UTD302"));
    assert_eq!(Task::Takeoff, tower.aircraft().get("UTD302").unwrap().current_task());
    assert_eq!(ids(&["UTD302"]), takeoff_order(&tower));
}

#[test]
fn test_load_aircraft_decrements_without_tick() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("UTD302", Model::AirbusA320, "LOAD@60,TAKEOFF,AWAY,LAND,WAIT", 0.0, 0))
        .unwrap();
    tower.load_aircraft();
    assert_eq!(Some(&1), tower.loading_aircraft().get("UTD302"));
    assert_eq!(Tick(0), tower.ticks_elapsed());
}

#[test]
fn test_odd_tick_only_takes_off() {
    let mut tower = tower(1);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("LANDER", Model::AirbusA320, "LAND,WAIT,LOAD@60,TAKEOFF,AWAY", 10000.0, 0))
        .unwrap();
    tower
        .add_aircraft(aircraft("LEAVER", Model::AirbusA320, "TAKEOFF,AWAY,LAND,WAIT,LOAD@60", 10000.0, 0))
        .unwrap();

    tower.tick();

    assert_eq!(ids(&["LANDER"]), landing_order(&tower));
    assert_eq!(None, occupant(&tower, 0, 0));
    assert!(takeoff_order(&tower).is_empty());
    assert_eq!(Task::Away, tower.aircraft().get("LEAVER").unwrap().current_task());
    assert_eq!(Task::Land, tower.aircraft().get("LANDER").unwrap().current_task());
}

#[test]
fn test_even_tick_prefers_landing() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("LANDER", Model::AirbusA320, "LAND,WAIT,LOAD@60,TAKEOFF,AWAY", 10000.0, 0))
        .unwrap();
    tower
        .add_aircraft(aircraft("LEAVER", Model::AirbusA320, "TAKEOFF,AWAY,LAND,WAIT,LOAD@60", 10000.0, 0))
        .unwrap();

    tower.tick();

    assert!(landing_order(&tower).is_empty());
    assert_eq!(ids(&["LEAVER"]), takeoff_order(&tower));
    assert_eq!(Task::Takeoff, tower.aircraft().get("LEAVER").unwrap().current_task());
}

#[test]
fn test_even_tick_falls_back_to_takeoff() {
    let mut tower = tower(0);
    tower
        .add_aircraft(aircraft("LANDER", Model::AirbusA320, "LAND,WAIT,LOAD@60,TAKEOFF,AWAY", 10000.0, 0))
        .unwrap();
    tower
        .add_aircraft(aircraft("LEAVER", Model::AirbusA320, "TAKEOFF,AWAY,LAND,WAIT,LOAD@60", 10000.0, 0))
        .unwrap();

    tower.tick();

    assert_eq!(ids(&["LANDER"]), landing_order(&tower));
    assert!(takeoff_order(&tower).is_empty());
    assert_eq!(Task::Away, tower.aircraft().get("LEAVER").unwrap().current_task());
}

#[test]
fn test_away_aircraft_is_queued_in_the_same_tick() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "AWAY,LAND,WAIT,LOAD@60,TAKEOFF", 27200.0, 0))
        .unwrap();
    assert!(landing_order(&tower).is_empty());

    // tick 0: AWAY -> LAND, but the landing attempt ran before placement
    tower.tick();
    assert_eq!(ids(&["QFA481"]), landing_order(&tower));
    assert_eq!(None, occupant(&tower, 0, 0));
    assert_eq!(90, tower.aircraft().get("QFA481").unwrap().fuel_percent_remaining());

    // tick 1: odd, no landings
    tower.tick();
    assert_eq!(ids(&["QFA481"]), landing_order(&tower));

    // tick 2: lands
    tower.tick();
    assert!(landing_order(&tower).is_empty());
    assert_eq!(Some(id("QFA481")), occupant(&tower, 0, 0));
}

#[test]
fn test_landing_respects_priority() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("UPS119", Model::Boeing747_8F, "LAND,WAIT,LOAD@50,TAKEOFF,AWAY", 200000.0, 0))
        .unwrap();
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "LAND,WAIT,LOAD@60,TAKEOFF,AWAY", 20000.0, 150))
        .unwrap();

    tower.tick();

    assert_eq!(Some(id("QFA481")), occupant(&tower, 0, 0));
    assert_eq!(ids(&["UPS119"]), landing_order(&tower));
}

#[test]
fn test_emergency_jumps_the_landing_queue() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "LAND,WAIT,LOAD@60,TAKEOFF,AWAY", 20000.0, 150))
        .unwrap();
    tower
        .add_aircraft(emergency(aircraft(
            "UPS119",
            Model::Boeing747_8F,
            "LAND,WAIT,LOAD@50,TAKEOFF,AWAY",
            200000.0,
            0,
        )))
        .unwrap();

    tower.tick();

    assert_eq!(Some(id("UPS119")), occupant(&tower, 0, 0));
    assert_eq!(ids(&["QFA481"]), landing_order(&tower));
}

#[test]
fn test_landing_skips_emergency_terminal() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    add_terminal(&mut tower, Airplane, 2, &[1]);
    tower.set_terminal_emergency(Airplane, 1, true).unwrap();
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "LAND,WAIT,LOAD@60,TAKEOFF,AWAY", 20000.0, 150))
        .unwrap();

    tower.tick();

    assert_eq!(None, occupant(&tower, 0, 0));
    assert_eq!(Some(id("QFA481")), occupant(&tower, 1, 0));
}

#[test]
fn test_helicopter_needs_helicopter_terminal() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1, 2]);
    tower
        .add_aircraft(aircraft("VH-BFK", Model::RobinsonR44, "LAND,WAIT,LOAD@75,TAKEOFF,AWAY,AWAY", 40.0, 4))
        .unwrap();

    tower.tick();
    assert_eq!(ids(&["VH-BFK"]), landing_order(&tower));
    assert_eq!(TaskType::Land, tower.aircraft().get("VH-BFK").unwrap().current_task().kind());

    add_terminal(&mut tower, Helicopter, 1, &[1]);
    tower.tick();
    tower.tick();
    assert!(landing_order(&tower).is_empty());
    assert_eq!(Some(id("VH-BFK")), occupant(&tower, 1, 0));
}

#[test]
fn test_low_fuel_outranks_passengers() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "LAND,WAIT,LOAD@60,TAKEOFF,AWAY", 20000.0, 150))
        .unwrap();
    tower
        .add_aircraft(aircraft("UPS119", Model::Boeing747_8F, "LAND,WAIT,LOAD@50,TAKEOFF,AWAY", 4000.0, 0))
        .unwrap();

    tower.tick();

    assert_eq!(Some(id("UPS119")), occupant(&tower, 0, 0));
}

#[test]
fn test_tick_many_and_summary() {
    let mut tower = tower(0);
    add_terminal(&mut tower, Airplane, 1, &[1, 2, 3]);
    add_terminal(&mut tower, Airplane, 2, &[]);
    add_terminal(&mut tower, Helicopter, 1, &[1]);
    tower
        .add_aircraft(aircraft("TAKER", Model::AirbusA320, "TAKEOFF,AWAY,AWAY,AWAY,LAND,WAIT,WAIT,LOAD@60", 40.0, 4))
        .unwrap();
    tower
        .add_aircraft(aircraft("AWAY1", Model::AirbusA320, "AWAY,AWAY,LAND,WAIT,WAIT,LOAD@60,TAKEOFF,AWAY", 40.0, 4))
        .unwrap();
    tower
        .add_aircraft(aircraft("LANDER", Model::AirbusA320, "LAND,WAIT,WAIT,LOAD@60,TAKEOFF,AWAY,AWAY,AWAY", 40.0, 100))
        .unwrap();
    tower
        .add_aircraft(aircraft("LOADER", Model::AirbusA320, "LOAD@60,TAKEOFF,AWAY,AWAY,AWAY,LAND,WAIT,WAIT", 40.0, 4))
        .unwrap();
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "AWAY,AWAY,LAND,WAIT,WAIT,LOAD@60,TAKEOFF,AWAY", 10000.0, 132))
        .unwrap();
    tower.place_all_aircraft_in_queues();
    assert_eq!(
        "ControlTower: 3 terminals, 5 total aircraft (1 LAND, 1 TAKEOFF, 1 LOAD)",
        tower.to_string()
    );

    tower.tick_many(6);
    assert_eq!(Tick(6), tower.ticks_elapsed());
    assert_eq!(5, tower.aircraft().len());
}

#[test]
fn test_exhausted_counter_stops_cleanly() {
    let mut tower = tower(u64::MAX);
    add_terminal(&mut tower, Airplane, 1, &[1]);
    tower
        .add_aircraft(aircraft("QFA481", Model::AirbusA320, "AWAY,LAND,WAIT,LOAD@60,TAKEOFF", 27200.0, 0))
        .unwrap();

    assert!(!tower.tick());
    assert_eq!(Tick(u64::MAX), tower.ticks_elapsed());
    let qfa = tower.aircraft().get("QFA481").unwrap();
    assert_eq!(Task::Away, qfa.current_task());
    assert_eq!(100, qfa.fuel_percent_remaining());
    assert_eq!(0, tower.tick_many(3));
}

#[test]
fn test_tick_many_reports_ticks_run() {
    let mut fresh = tower(0);
    assert_eq!(4, fresh.tick_many(4));
    assert_eq!(Tick(4), fresh.ticks_elapsed());

    let mut near_end = tower(u64::MAX - 2);
    assert_eq!(2, near_end.tick_many(5));
    assert_eq!(Tick(u64::MAX), near_end.ticks_elapsed());
}
