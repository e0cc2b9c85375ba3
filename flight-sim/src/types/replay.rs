use std::io::{self, Write};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use logger::{Color, Logger};

use super::flight::{StepResult, TerminalTransition};
use super::flight_status::FlightStatus;
use super::geo::LatLng;
use super::simulation::{MissionView, Simulation};
use super::sim_error::SimError;
use super::timer::Timer;

/// Presentation layer fed by the replay: a map, a console, a test recorder.
pub trait Presenter: Send {
    /// Draws the marker and path of a mission before the first tick.
    fn place(&mut self, index: usize, view: &MissionView);

    fn move_marker(&mut self, index: usize, position: LatLng);

    /// Shows a terminal transition to the user.
    fn notify(&mut self, index: usize, transition: &TerminalTransition);
}

/// Drives a [`Simulation`] from a [`Timer`] and hands every update to a
/// [`Presenter`].
pub struct Replay<P: Presenter> {
    pub simulation: Arc<Mutex<Simulation>>,
    pub presenter: Arc<Mutex<P>>,
    pub timer: Arc<Timer>,
    logger: Logger,
    handle: Option<JoinHandle<()>>,
}

impl<P: Presenter + 'static> Replay<P> {
    pub fn new(simulation: Simulation, presenter: P, timer: Arc<Timer>, logger: Logger) -> Self {
        Replay {
            simulation: Arc::new(Mutex::new(simulation)),
            presenter: Arc::new(Mutex::new(presenter)),
            timer,
            logger,
            handle: None,
        }
    }

    /// Places every mission on the presenter.
    pub fn initialize(&self) -> Result<(), SimError> {
        let views = lock(&self.simulation, "simulation")?.initialize();
        let mut presenter = lock(&self.presenter, "presenter")?;
        for (index, view) in views.iter().enumerate() {
            presenter.place(index, view);
            self.logger.info(
                &format!(
                    "{} placed at {:.6}, {:.6}",
                    view.name, view.marker.latitude, view.marker.longitude
                ),
                Color::Cyan,
                false,
            )?;
        }
        Ok(())
    }

    /// Runs one tick at `elapsed` seconds and applies its results.
    pub fn run_tick(&self, elapsed: f64) -> Result<Vec<(usize, StepResult)>, SimError> {
        apply_tick(&self.simulation, &self.presenter, &self.logger, elapsed)
    }

    /// Starts ticking on the timer thread.
    pub fn start(&mut self) -> Result<(), SimError> {
        let simulation = Arc::clone(&self.simulation);
        let presenter = Arc::clone(&self.presenter);
        let logger = self.logger.clone();
        let timer = Arc::clone(&self.timer);

        let handle = Arc::clone(&self.timer).start(move |elapsed, _tick_count| {
            match apply_tick(&simulation, &presenter, &logger, elapsed) {
                Ok(_) => {
                    let finished = simulation.lock().map(|sim| sim.is_finished()).unwrap_or(false);
                    if finished {
                        let _ = logger.info("All missions ended.", Color::Blue, false);
                        timer.stop();
                    }
                }
                Err(e) => {
                    let _ = logger.error(&format!("Tick at {}s failed: {}", elapsed, e), false);
                }
            }
        })?;

        self.handle = Some(handle);
        Ok(())
    }

    pub fn pause(&self) {
        self.timer.pause();
    }

    pub fn resume(&self) {
        self.timer.resume();
    }

    pub fn set_time_rate(&self, seconds_per_tick: i64) -> Result<(), SimError> {
        self.timer.set_tick_advance(seconds_per_tick)
    }

    /// Stops the timer and waits for the tick thread to exit.
    pub fn stop(&mut self) {
        self.timer.stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                let _ = self.logger.error("Timer thread panicked.", true);
            }
        }
    }

    /// Shows the missions in real time until Enter is pressed.
    pub fn display_missions(&self) {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut buffer = String::new();
            if io::stdin().read_line(&mut buffer).is_ok() {
                tx.send(()).ok();
            }
        });

        loop {
            print!("\x1B[2J\x1B[1;1H");
            if let Ok(elapsed) = self.timer.elapsed_seconds() {
                let paused = if self.timer.is_paused() {
                    " (paused)"
                } else {
                    ""
                };
                println!("Elapsed: {:.0}s{}", elapsed, paused);
            }

            if let Ok(sim) = self.simulation.try_lock() {
                if sim.is_empty() {
                    println!("No missions loaded.");
                } else {
                    println!(
                        "{} flying, {} flew properly, {} landed halfway",
                        sim.count_with_status(FlightStatus::Flying),
                        sim.count_with_status(FlightStatus::FlewProperly),
                        sim.count_with_status(FlightStatus::LandedHalfway)
                    );
                    println!(
                        "\n{:<20} {:<16} {:<16} {:<12} {:<12}",
                        "Mission", "Drone", "Status", "Latitude", "Longitude"
                    );
                    for flight in sim.flights() {
                        println!(
                            "{:<20} {:<16} {:<16} {:<12.6} {:<12.6}",
                            flight.name(),
                            flight.drone.model().unwrap_or("-"),
                            flight.status.as_str(),
                            flight.position.latitude,
                            flight.position.longitude
                        );
                    }
                }
            }
            println!("\nPress Enter to exit list-missions mode");
            io::stdout().flush().ok();

            if rx.try_recv().is_ok() {
                break;
            }

            thread::sleep(self.timer.tick_period().max(Duration::from_millis(200)));
        }
    }
}

fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    what: &str,
) -> Result<std::sync::MutexGuard<'a, T>, SimError> {
    mutex
        .lock()
        .map_err(|_| SimError::TimerLockError(format!("Failed to lock {}.", what)))
}

fn apply_tick<P: Presenter>(
    simulation: &Mutex<Simulation>,
    presenter: &Mutex<P>,
    logger: &Logger,
    elapsed: f64,
) -> Result<Vec<(usize, StepResult)>, SimError> {
    let results = lock(simulation, "simulation")?.tick(elapsed);
    let mut presenter = lock(presenter, "presenter")?;

    for (index, result) in &results {
        if let Some(position) = result.new_position {
            presenter.move_marker(*index, position);
            logger.debug(&format!(
                "[{}s] mission {} at {:.6}, {:.6}",
                elapsed, index, position.latitude, position.longitude
            ))?;
        }

        if let Some(transition) = &result.terminal_transition {
            presenter.notify(*index, transition);
            let message = format!(
                "[{}s] {} - {}",
                elapsed,
                transition.mission_name,
                transition.label()
            );
            match transition.status {
                FlightStatus::LandedHalfway => logger.warn(&message, false)?,
                _ => logger.info(&message, Color::Green, false)?,
            }
        }
    }

    Ok(results)
}
