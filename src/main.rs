use crate::aircraft::Model;
use crate::airport::TerminalKind;
use crate::error::TowerError;
use crate::scenario::Scenario;
use crate::tower::{AircraftQueue, ControlTower, GateRef, Priority};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

mod aircraft;
mod airport;
mod error;
mod save;
mod scenario;
mod task;
mod time;
mod tower;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// Directory holding a saved tower (tick.txt, aircraft.txt, queues.txt, terminalsWithGates.txt)
    #[arg(long, value_name = "DIR", conflicts_with = "scenario")]
    save: Option<PathBuf>,
}

/// Completes the command word, then its argument from the word lists below.
#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
    pub callsigns: Vec<String>,
}

const LISTINGS: [&str; 4] = ["aircraft", "terminals", "queues", "models"];
const TERMINAL_KINDS: [&str; 2] = ["airplane", "helicopter"];

impl CompleteHelper {
    fn arguments(&self, command: &str) -> Vec<&'_ str> {
        match command {
            "ls" => LISTINGS.to_vec(),
            "emergency" | "clear" => self.callsigns.iter().map(String::as_str).collect(),
            "terminal-emergency" => TERMINAL_KINDS.to_vec(),
            _ => vec![],
        }
    }

    /// Start of the word being typed, and the words that could finish it.
    fn candidates<'a>(&'a self, line: &str) -> (usize, Vec<&'a str>) {
        let start = line.rfind(char::is_whitespace).map_or(0, |i| i + 1);
        let (head, word) = line.split_at(start);
        let words = match head.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => self.commands.iter().map(String::as_str).collect(),
            [command] => self.arguments(command),
            _ => vec![],
        };
        (start, words.into_iter().filter(|w| w.starts_with(word)).collect())
    }
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(&line[..pos]);
        let candidates = words
            .into_iter()
            .map(|w| Pair {
                display: w.to_string(),
                replacement: format!("{w} "),
            })
            .collect();

        Ok((start, candidates))
    }
}

#[derive(Tabled)]
struct AircraftRow {
    #[tabled(rename = "Callsign")]
    callsign: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Task")]
    task: String,
    #[tabled(rename = "Next")]
    next: String,
    #[tabled(rename = "Fuel")]
    fuel: String,
    #[tabled(rename = "Cargo")]
    cargo: String,
    #[tabled(rename = "Weight / MTOW kg")]
    weight: String,
    #[tabled(rename = "Gate")]
    gate: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct TerminalRow {
    #[tabled(rename = "Terminal")]
    terminal: String,
    #[tabled(rename = "Gates")]
    gates: String,
    #[tabled(rename = "Occupancy %")]
    occupancy: u32,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "Queue")]
    queue: String,
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Callsign")]
    callsign: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    model: Model,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Empty kg")]
    empty_weight: u32,
    #[tabled(rename = "MTOW kg")]
    max_takeoff_weight: u32,
    #[tabled(rename = "Range km")]
    range: u32,
    #[tabled(rename = "Fuel L")]
    fuel_capacity: f64,
    #[tabled(rename = "Seats")]
    passengers: u32,
    #[tabled(rename = "Freight kg")]
    freight: u32,
}

fn model_rows() -> Vec<ModelRow> {
    Model::ALL
        .into_iter()
        .map(|model| {
            let c = model.characteristics();
            ModelRow {
                model,
                kind: format!("{:?}", c.kind),
                empty_weight: c.empty_weight,
                max_takeoff_weight: c.max_takeoff_weight,
                range: c.range,
                fuel_capacity: c.fuel_capacity,
                passengers: c.passenger_capacity,
                freight: c.freight_capacity,
            }
        })
        .collect()
}

fn gate_label(tower: &ControlTower, at: GateRef) -> Option<String> {
    let terminal = tower.terminals().get(at.terminal)?;
    let gate = tower.gate(at)?;
    Some(format!("{} {} / {}", terminal.kind(), terminal.number(), gate.number()))
}

fn aircraft_rows(tower: &ControlTower) -> Vec<AircraftRow> {
    tower
        .aircraft()
        .iter()
        .map(|a| {
            let gate = tower
                .find_gate_of_aircraft(a.callsign())
                .and_then(|at| gate_label(tower, at))
                .unwrap_or_else(|| "-".to_string());
            let status = if a.has_emergency() {
                "EMERGENCY".red().bold().to_string()
            } else {
                "ok".green().to_string()
            };
            AircraftRow {
                callsign: a.callsign().to_string(),
                model: a.model().to_string(),
                task: format!("{} [{}/{}]", a.current_task(), a.tasks().position() + 1, a.tasks().len()),
                next: a.tasks().peek_next().to_string(),
                fuel: format!("{:.0} L ({}%)", a.fuel(), a.fuel_percent_remaining()),
                cargo: format!("{}/{}", a.cargo(), a.cargo_capacity()),
                weight: format!("{:.0} / {}", a.total_weight(), a.characteristics().max_takeoff_weight),
                gate,
                status,
            }
        })
        .collect()
}

fn terminal_rows(tower: &ControlTower) -> Vec<TerminalRow> {
    tower
        .terminals()
        .iter()
        .map(|t| TerminalRow {
            terminal: format!("{} {}", t.kind(), t.number()),
            gates: t
                .gates()
                .iter()
                .map(|g| g.encode())
                .collect::<Vec<_>>()
                .join(" "),
            occupancy: t.occupancy_percent(),
            status: if t.has_emergency() {
                "EMERGENCY".red().bold().to_string()
            } else {
                "open".green().to_string()
            },
        })
        .collect()
}

fn queue_rows(tower: &ControlTower) -> Vec<QueueRow> {
    let fleet = tower.aircraft();
    let landing = tower.landing_queue();
    let mut rows = vec![];
    for (i, callsign) in landing.all_in_order(fleet).iter().enumerate() {
        rows.push(QueueRow {
            queue: landing.kind().to_string(),
            position: i + 1,
            callsign: callsign.to_string(),
            detail: landing
                .priority_of(fleet, callsign)
                .unwrap_or(Priority::Normal)
                .to_string(),
        });
    }
    let takeoff = tower.takeoff_queue();
    for (i, callsign) in takeoff.all_in_order(fleet).iter().enumerate() {
        rows.push(QueueRow {
            queue: takeoff.kind().to_string(),
            position: i + 1,
            callsign: callsign.to_string(),
            detail: String::new(),
        });
    }
    for (i, (callsign, ticks)) in tower.loading_aircraft().iter().enumerate() {
        rows.push(QueueRow {
            queue: "LoadingAircraft".to_string(),
            position: i + 1,
            callsign: callsign.to_string(),
            detail: format!("{ticks} ticks left"),
        });
    }
    rows
}

fn show<T: Tabled>(rows: &[T], empty: &str) {
    if rows.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        if let Err(e) = paginate(&table.to_string()) {
            eprintln!("Error writing to pager: {}", e);
        }
    } else {
        println!("{}", table);
    }
}

// `less -R` keeps the table colours; `more` is the fallback.
const PAGERS: [(&str, &[&str]); 2] = [("less", &["-R"]), ("more", &[])];

fn paginate(content: &str) -> std::io::Result<()> {
    let Some(mut pager) = PAGERS
        .iter()
        .find_map(|(program, args)| Command::new(program).args(*args).stdin(Stdio::piped()).spawn().ok())
    else {
        println!("{content}");
        return Ok(());
    };

    if let Some(mut stdin) = pager.stdin.take() {
        match stdin.write_all(content.as_bytes()) {
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e),
            _ => {}
        }
    }
    pager.wait().map(|_| ())
}

fn parse_terminal_kind(s: &str) -> Option<TerminalKind> {
    match s.to_ascii_lowercase().as_str() {
        "airplane" | "airplaneterminal" => Some(TerminalKind::Airplane),
        "helicopter" | "helicopterterminal" => Some(TerminalKind::Helicopter),
        _ => None,
    }
}

fn report(result: Result<String, TowerError>) {
    match result {
        Ok(message) => println!("{}", message.green()),
        Err(err) => println!("{} {}", "Error:".red().bold(), err),
    }
}

fn load_tower(args: &Args) -> Result<ControlTower, TowerError> {
    match &args.save {
        Some(dir) => {
            let tower = save::load_dir(dir)?;
            println!("Tower online. Loaded save from {}", dir.display());
            Ok(tower)
        }
        None => {
            let tower = Scenario::load_from_file(&args.scenario)?.build()?;
            println!("Tower online. Loaded scenario from {}", args.scenario.display());
            Ok(tower)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut tower = load_tower(&args)?;
    println!("{}", tower.to_string().bold());
    if tower.aircraft().is_empty() {
        println!("{}", "No aircraft loaded; the tower will idle.".yellow());
    }

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "tick",
            "ls",
            "emergency",
            "clear",
            "terminal-emergency",
            "save",
            "status",
            "help",
            "exit",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
        callsigns: tower.aircraft().iter().map(|a| a.callsign().to_string()).collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "tick" | "t" => match parts.get(1).map(|n| n.parse::<u64>()).unwrap_or(Ok(1)) {
                        Ok(n) => {
                            let ran = tower.tick_many(n);
                            if ran < n {
                                println!("{}", format!("Tick counter exhausted after {} of {} ticks.", ran, n).yellow());
                            }
                            println!("{} {}", tower.ticks_elapsed().to_string().cyan(), tower);
                        }
                        Err(_) => println!("Usage: tick [count]"),
                    },
                    "ls" => match parts.get(1).copied().unwrap_or("aircraft") {
                        "a" | "aircraft" => show(&aircraft_rows(&tower), "No aircraft."),
                        "t" | "terminals" => show(&terminal_rows(&tower), "No terminals."),
                        "q" | "queues" => show(&queue_rows(&tower), "All queues are empty."),
                        "m" | "models" => show(&model_rows(), "No models."),
                        other => println!("Unknown listing: {}", other),
                    },
                    "emergency" | "clear" => match parts.get(1) {
                        Some(callsign) => {
                            let declare = parts[0] == "emergency";
                            report(
                                tower
                                    .set_aircraft_emergency(callsign, declare)
                                    .map(|_| format!("{} emergency {}.", callsign, if declare { "declared" } else { "cleared" })),
                            );
                        }
                        None => println!("Usage: {} <callsign>", parts[0]),
                    },
                    "terminal-emergency" => {
                        let kind = parts.get(1).and_then(|k| parse_terminal_kind(k));
                        let number = parts.get(2).and_then(|n| n.parse::<u32>().ok());
                        match (kind, number) {
                            (Some(kind), Some(number)) => {
                                let declare = parts.get(3) != Some(&"clear");
                                report(
                                    tower
                                        .set_terminal_emergency(kind, number, declare)
                                        .map(|_| format!("{} {} emergency {}.", kind, number, if declare { "declared" } else { "cleared" })),
                                );
                            }
                            _ => println!("Usage: terminal-emergency <airplane|helicopter> <number> [clear]"),
                        }
                    }
                    "save" => match parts.get(1) {
                        Some(dir) => report(save::save_dir(&tower, Path::new(dir)).map(|_| format!("Saved to {}.", dir))),
                        None => println!("Usage: save <dir>"),
                    },
                    "status" | "s" => println!("{} {}", tower.ticks_elapsed().to_string().cyan(), tower),
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  tick [n]                          - Advance the simulation by n ticks (default 1)");
                        println!("  ls [aircraft|terminals|queues|models] - List aircraft, terminals with gates, queue contents, or the model catalog");
                        println!("  emergency <callsign>              - Declare an emergency on an aircraft");
                        println!("  clear <callsign>                  - Clear an aircraft's emergency");
                        println!("  terminal-emergency <kind> <n> [clear] - Declare or clear an emergency at a terminal");
                        println!("  save <dir>                        - Write the tower state to <dir>");
                        println!("  status                            - Show the tower summary");
                        println!("  help / ?                          - Show this help menu");
                        println!("  exit / quit                       - Exit the simulator\n");
                    }
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
