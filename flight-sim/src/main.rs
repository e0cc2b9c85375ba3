use chrono::Local;
use flight_sim::types::{
    config::ReplayConfig,
    flight::TerminalTransition,
    flight_status::FlightStatus,
    geo::LatLng,
    loader::MissionSet,
    replay::{Presenter, Replay},
    sim_error::SimError,
    simulation::{MissionView, Simulation},
    timer::Timer,
};
use logger::{Color, Logger};
use std::{
    env,
    io::{self, Write},
};

/// Console stand-in for the map: markers are rows of the mission table and
/// terminal transitions are printed like toasts.
struct ConsolePresenter {
    logger: Logger,
}

impl Presenter for ConsolePresenter {
    fn place(&mut self, _index: usize, view: &MissionView) {
        let _ = self.logger.info(
            &format!(
                "{} ({}) takes off from {:.6}, {:.6} with {} waypoints",
                view.name,
                view.label,
                view.marker.latitude,
                view.marker.longitude,
                view.path.len()
            ),
            Color::Cyan,
            true,
        );
    }

    fn move_marker(&mut self, _index: usize, _position: LatLng) {
        // Positions are shown by list-missions.
    }

    fn notify(&mut self, _index: usize, transition: &TerminalTransition) {
        let message = format!("{} - {}", transition.mission_name, transition.label());
        let _ = match transition.status {
            FlightStatus::LandedHalfway => self.logger.warn(&message, true),
            _ => self.logger.info(&message, Color::Green, true),
        };
    }
}

fn clean_scr() {
    print!("\x1B[2J\x1B[1;1H");
    io::stdout().flush().ok();
}

fn build_logger(config: &ReplayConfig) -> Result<Logger, SimError> {
    match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let session = Local::now().format("%Y%m%d_%H%M%S").to_string();
            Ok(Logger::new(dir, &session)?)
        }
        None => Ok(Logger::console()),
    }
}

fn print_plan(set: &MissionSet) {
    for entry in &set.entries {
        let capacity = entry.config.total_energy_capacity();
        match &entry.plan {
            Some(plan) => println!("{} : {}", entry.mission.name, plan.is_feasible(capacity)),
            None => {
                let required = entry
                    .mission
                    .last_point()
                    .map(|p| p.energy)
                    .unwrap_or_default()
                    + entry.mission.energy_req;
                println!("{} : {}", entry.mission.name, required <= capacity);
            }
        }
    }
}

fn set_time_rate(replay: &Replay<ConsolePresenter>) -> Result<(), SimError> {
    let input = prompt_input("Enter the time rate (simulated seconds per tick): ")
        .ok_or(SimError::InvalidInput)?;
    let seconds: i64 = input.parse().map_err(|_| SimError::InvalidInput)?;
    replay.set_time_rate(seconds)
}

fn main() -> Result<(), SimError> {
    let args: Vec<String> = env::args().collect();
    let config = ReplayConfig::from_args(&args)?;
    let logger = build_logger(&config)?;

    let set = MissionSet::load(&config.data_dir)?;
    logger.info(
        &format!("Loaded {} missions from {}", set.len(), config.data_dir.display()),
        Color::Blue,
        true,
    )?;

    let simulation = Simulation::from_mission_set(set.clone())?;
    let timer = Timer::new(config.tick_millis, config.time_rate, logger.clone());
    let presenter = ConsolePresenter {
        logger: logger.clone(),
    };

    let mut replay = Replay::new(simulation, presenter, timer, logger.clone());
    replay.initialize()?;
    replay.start()?;

    loop {
        println!("Enter command (type '-h' or '--help' for options): ");
        let Some(command) = prompt_input("") else {
            break;
        };
        let args: Vec<&str> = command.split_whitespace().collect();
        if args.is_empty() {
            continue;
        }

        match args[0] {
            "list-missions" => replay.display_missions(),

            "plan" => {
                clean_scr();
                print_plan(&set);
            }

            "time-rate" => {
                clean_scr();
                if let Err(e) = set_time_rate(&replay) {
                    println!("{}", e);
                }
            }

            "pause" => {
                replay.pause();
                println!("Replay paused");
            }

            "resume" => {
                replay.resume();
                println!("Replay resumed");
            }

            "-h" | "--help" | "help" => print_help(),

            "exit" => break,

            _ => eprintln!("Invalid command. Use -h for help."),
        }
    }

    replay.stop();
    Ok(())
}

/// Returns `None` once stdin is closed.
fn prompt_input(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

fn print_help() {
    clean_scr();
    println!("Available commands:");
    println!("  list-missions");
    println!("    Show every mission with its status and current position.");
    println!("  plan");
    println!("    Show whether each mission fits in its drone's energy capacity.");
    println!("  time-rate");
    println!("    Changes the simulated seconds advanced per tick.");
    println!("  pause");
    println!("    Pauses the replay.");
    println!("  resume");
    println!("    Resumes the replay.");
    println!("  exit");
    println!("    Closes this application.");
}
