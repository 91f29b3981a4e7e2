//! Text save format for a [`ControlTower`].
//!
//! A save is four sections, normally four files in one directory:
//!
//! - `tick.txt`: ticks elapsed
//! - `aircraft.txt`: every aircraft, one per line
//! - `queues.txt`: takeoff queue, landing queue, then loading aircraft
//! - `terminalsWithGates.txt`: terminals followed by their gates
//!
//! Loading is all-or-nothing: any structural problem in any section yields a
//! single [`TowerError::MalformedInput`] and no tower.

use crate::aircraft::{Aircraft, AircraftId, Fleet};
use crate::airport::{EMPTY_GATE, Gate, MAX_NUM_GATES, Terminal, TerminalKind};
use crate::error::{Result, TowerError};
use crate::time::Tick;
use crate::tower::{AircraftQueue, ControlTower, LandingQueue, LoadingAircraft, TakeoffQueue};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::Lines;
use tracing::info;

pub const TICK_FILE: &str = "tick.txt";
pub const AIRCRAFT_FILE: &str = "aircraft.txt";
pub const QUEUES_FILE: &str = "queues.txt";
pub const TERMINALS_FILE: &str = "terminalsWithGates.txt";

const LOADING_HEADER: &str = "LoadingAircraft";

struct Section<'a> {
    name: &'static str,
    lines: Lines<'a>,
}

impl<'a> Section<'a> {
    fn new(name: &'static str, input: &'a str) -> Section<'a> {
        Section { name, lines: input.lines() }
    }

    fn next_line(&mut self) -> Result<&'a str> {
        self.lines
            .next()
            .ok_or_else(|| TowerError::malformed(format!("{}: unexpected end of input", self.name)))
    }

    fn finish(mut self) -> Result<()> {
        match self.lines.next() {
            Some(extra) => Err(TowerError::malformed(format!("{}: unexpected trailing line '{extra}'", self.name))),
            None => Ok(()),
        }
    }
}

fn split_exact<'a>(line: &'a str, separator: char, fields: usize) -> Result<Vec<&'a str>> {
    let parts = line.splitn(fields, separator).collect::<Vec<_>>();
    if parts.len() != fields {
        return Err(TowerError::malformed(format!(
            "expected {fields} '{separator}'-separated fields in '{line}'"
        )));
    }
    Ok(parts)
}

fn read_count(s: &str) -> Result<usize> {
    s.parse::<usize>()
        .map_err(|_| TowerError::malformed(format!("'{s}' is not a non-negative integer")))
}

fn read_number(s: &str) -> Result<u32> {
    s.parse::<u32>()
        .map_err(|_| TowerError::malformed(format!("'{s}' is not a non-negative integer")))
}

fn read_positive(s: &str) -> Result<u32> {
    match read_number(s)? {
        0 => Err(TowerError::malformed(format!("'{s}' must be at least 1"))),
        n => Ok(n),
    }
}

fn read_bool(s: &str) -> Result<bool> {
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(TowerError::malformed(format!("'{s}' is not a boolean"))),
    }
}

/// Fuel is written with exactly two decimals, e.g. `10000.00`.
fn read_fuel(s: &str) -> Result<f64> {
    let malformed = || TowerError::malformed(format!("'{s}' is not a fuel amount with two decimals"));
    let (whole, fraction) = s.split_once('.').ok_or_else(malformed)?;
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || fraction.len() != 2 || !digits(fraction) {
        return Err(malformed());
    }
    s.parse::<f64>().map_err(|_| malformed())
}

fn resolve(fleet: &Fleet, callsign: &str) -> Result<AircraftId> {
    fleet
        .resolve(callsign)
        .cloned()
        .ok_or_else(|| TowerError::malformed(format!("unknown aircraft '{callsign}'")))
}

// Construction errors inside a save are save errors.
fn as_malformed(err: TowerError) -> TowerError {
    match err {
        TowerError::MalformedInput(_) => err,
        other => TowerError::malformed(other.to_string()),
    }
}

pub fn load_tick(input: &str) -> Result<Tick> {
    let mut section = Section::new(TICK_FILE, input);
    let line = section.next_line()?;
    let ticks = line
        .parse::<u64>()
        .map_err(|_| TowerError::malformed(format!("'{line}' is not a valid tick count")))?;
    section.finish()?;
    Ok(Tick(ticks))
}

pub fn read_aircraft(line: &str) -> Result<Aircraft> {
    let fields = split_exact(line, ':', 6)?;
    let model = fields[1].parse()?;
    let tasks = fields[2].parse().map_err(as_malformed)?;
    let fuel = read_fuel(fields[3])?;
    let emergency = read_bool(fields[4])?;
    let cargo = read_number(fields[5])?;
    let mut aircraft = Aircraft::new(fields[0], model, tasks, fuel, cargo).map_err(as_malformed)?;
    if emergency {
        aircraft.declare_emergency();
    }
    Ok(aircraft)
}

pub fn load_aircraft(input: &str) -> Result<Fleet> {
    let mut section = Section::new(AIRCRAFT_FILE, input);
    let count = read_count(section.next_line()?)?;
    let mut fleet = Fleet::new();
    for _ in 0..count {
        fleet
            .insert(read_aircraft(section.next_line()?)?)
            .map_err(as_malformed)?;
    }
    section.finish()?;
    Ok(fleet)
}

fn read_callsign_line<'a>(section: &mut Section<'a>, count: usize) -> Result<Vec<&'a str>> {
    if count == 0 {
        return Ok(vec![]);
    }
    let entries = section.next_line()?.split(',').collect::<Vec<_>>();
    if entries.len() != count {
        return Err(TowerError::malformed(format!(
            "{}: expected {count} entries, found {}",
            section.name,
            entries.len()
        )));
    }
    Ok(entries)
}

fn read_queue<Q: AircraftQueue>(section: &mut Section, fleet: &Fleet, queue: &mut Q) -> Result<()> {
    let header = split_exact(section.next_line()?, ':', 2)?;
    if header[0] != queue.kind().as_str() {
        return Err(TowerError::malformed(format!(
            "expected {} but found '{}'",
            queue.kind(),
            header[0]
        )));
    }
    let count = read_count(header[1])?;
    for callsign in read_callsign_line(section, count)? {
        if queue.contains(callsign) {
            return Err(TowerError::malformed(format!("{callsign} listed twice in {}", queue.kind())));
        }
        queue.add(resolve(fleet, callsign)?);
    }
    Ok(())
}

fn read_loading_aircraft(section: &mut Section, fleet: &Fleet) -> Result<LoadingAircraft> {
    let header = split_exact(section.next_line()?, ':', 2)?;
    if header[0] != LOADING_HEADER {
        return Err(TowerError::malformed(format!(
            "expected {LOADING_HEADER} but found '{}'",
            header[0]
        )));
    }
    let count = read_count(header[1])?;
    let mut loading = LoadingAircraft::new();
    for entry in read_callsign_line(section, count)? {
        let pair = split_exact(entry, ':', 2)?;
        let callsign = resolve(fleet, pair[0])?;
        let ticks = read_positive(pair[1])?;
        if loading.insert(callsign, ticks).is_some() {
            return Err(TowerError::malformed(format!("{} is loading twice", pair[0])));
        }
    }
    Ok(loading)
}

pub fn load_queues(input: &str, fleet: &Fleet) -> Result<(TakeoffQueue, LandingQueue, LoadingAircraft)> {
    let mut section = Section::new(QUEUES_FILE, input);
    let mut takeoff = TakeoffQueue::new();
    let mut landing = LandingQueue::new();
    read_queue(&mut section, fleet, &mut takeoff)?;
    read_queue(&mut section, fleet, &mut landing)?;
    let loading = read_loading_aircraft(&mut section, fleet)?;
    section.finish()?;
    Ok((takeoff, landing, loading))
}

fn read_gate(line: &str, fleet: &Fleet, parked: &mut HashSet<AircraftId>) -> Result<Gate> {
    let fields = split_exact(line, ':', 2)?;
    let mut gate = Gate::new(read_positive(fields[0])?);
    if fields[1] != EMPTY_GATE {
        let callsign = resolve(fleet, fields[1])?;
        if !parked.insert(callsign.clone()) {
            return Err(TowerError::malformed(format!("{callsign} is parked at more than one gate")));
        }
        gate.park(callsign).map_err(as_malformed)?;
    }
    Ok(gate)
}

fn read_terminal(section: &mut Section, fleet: &Fleet, parked: &mut HashSet<AircraftId>) -> Result<Terminal> {
    let fields = split_exact(section.next_line()?, ':', 4)?;
    let kind = fields[0].parse::<TerminalKind>()?;
    let number = read_positive(fields[1])?;
    let emergency = read_bool(fields[2])?;
    let gates = read_count(fields[3])?;
    if gates > MAX_NUM_GATES {
        return Err(TowerError::malformed(format!(
            "terminal {number} lists {gates} gates, maximum is {MAX_NUM_GATES}"
        )));
    }
    let mut terminal = Terminal::new(kind, number);
    if emergency {
        terminal.declare_emergency();
    }
    for _ in 0..gates {
        let gate = read_gate(section.next_line()?, fleet, parked)?;
        terminal.add_gate(gate).map_err(as_malformed)?;
    }
    Ok(terminal)
}

pub fn load_terminals(input: &str, fleet: &Fleet) -> Result<Vec<Terminal>> {
    let mut section = Section::new(TERMINALS_FILE, input);
    let count = read_count(section.next_line()?)?;
    let mut parked = HashSet::new();
    let terminals = (0..count)
        .map(|_| read_terminal(&mut section, fleet, &mut parked))
        .collect::<Result<Vec<_>>>()?;
    section.finish()?;
    Ok(terminals)
}

/// Builds a tower from the four sections. Nothing is returned unless every section is valid.
pub fn create_control_tower(tick: &str, aircraft: &str, queues: &str, terminals: &str) -> Result<ControlTower> {
    let fleet = load_aircraft(aircraft)?;
    let (takeoff, landing, loading) = load_queues(queues, &fleet)?;
    let ticks = load_tick(tick)?;
    let terminals = load_terminals(terminals, &fleet)?;

    let mut tower = ControlTower::from_parts(ticks, fleet, landing, takeoff, loading);
    for terminal in terminals {
        tower.add_terminal(terminal);
    }
    Ok(tower)
}

pub fn load_dir(dir: &Path) -> Result<ControlTower> {
    let read = |name: &str| fs::read_to_string(dir.join(name));
    let tower = create_control_tower(
        &read(TICK_FILE)?,
        &read(AIRCRAFT_FILE)?,
        &read(QUEUES_FILE)?,
        &read(TERMINALS_FILE)?,
    )?;
    info!(dir = %dir.display(), "loaded save: {tower}");
    Ok(tower)
}

pub fn encode_tick(tower: &ControlTower) -> String {
    format!("{}\n", tower.ticks_elapsed().0)
}

pub fn encode_aircraft(tower: &ControlTower) -> String {
    let mut out = format!("{}\n", tower.aircraft().len());
    for aircraft in tower.aircraft().iter() {
        out.push_str(&aircraft.encode());
        out.push('\n');
    }
    out
}

pub fn encode_queues(tower: &ControlTower) -> String {
    let fleet = tower.aircraft();
    let loading = tower.loading_aircraft();
    let mut lines = vec![
        tower.takeoff_queue().encode(fleet),
        tower.landing_queue().encode(fleet),
        format!("{LOADING_HEADER}:{}", loading.len()),
    ];
    if !loading.is_empty() {
        lines.push(
            loading
                .iter()
                .map(|(callsign, ticks)| format!("{callsign}:{ticks}"))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n") + "\n"
}

pub fn encode_terminals(tower: &ControlTower) -> String {
    let mut out = format!("{}\n", tower.terminals().len());
    for terminal in tower.terminals() {
        out.push_str(&terminal.encode());
        out.push('\n');
    }
    out
}

pub fn save_dir(tower: &ControlTower, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(TICK_FILE), encode_tick(tower))?;
    fs::write(dir.join(AIRCRAFT_FILE), encode_aircraft(tower))?;
    fs::write(dir.join(QUEUES_FILE), encode_queues(tower))?;
    fs::write(dir.join(TERMINALS_FILE), encode_terminals(tower))?;
    info!(dir = %dir.display(), "saved {tower}");
    Ok(())
}
