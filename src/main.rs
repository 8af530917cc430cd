use std::{thread, time::Duration};

use anyhow::{Context, Result};
use dishrs::{
    AntRule, BoundaryPolicy, ConwayRule, DigitRows, Glyph, Grid, GridEncoder, GridError, TickEngine,
    TransitionRule,
};
use rand::Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod console;
mod options;
mod stats;

use console::{ConsoleCommand, ConsoleRender};
use options::{Args, Automaton};
use stats::{Recorder, SwitchRecorder};

const MIN_TICK: Duration = Duration::from_millis(100);
const MAX_TICK: Duration = Duration::from_millis(2000);
const TICK_STEP: Duration = Duration::from_millis(100);

/// What the driver needs to know about one automaton beyond its rule
trait Flavor: TransitionRule + Sized {
    const DEFAULT_BOUNDARY: BoundaryPolicy;
    /// The boundary cannot be changed away from the default
    const BOUNDARY_LOCKED: bool = false;
    const DEFAULT_DENSITY: f64;

    /// Random fill used by `--fill random` and the `r` key
    fn scatter<G: Rng>(
        engine: &mut TickEngine<Self>,
        density: f64,
        rng: &mut G,
    ) -> Result<(), GridError> {
        engine.randomize(density, rng)
    }
    /// Makes a freshly built grid ready to run
    fn prepare<G: Rng>(_engine: &mut TickEngine<Self>, _rng: &mut G) -> Result<(), GridError> {
        Ok(())
    }
    /// Right click; only meaningful for the ant
    fn move_marker<G: Rng>(
        _engine: &mut TickEngine<Self>,
        _index: usize,
        _rng: &mut G,
    ) -> Result<(), GridError> {
        Ok(())
    }
}

impl Flavor for ConwayRule {
    const DEFAULT_BOUNDARY: BoundaryPolicy = BoundaryPolicy::Clamped;
    const DEFAULT_DENSITY: f64 = 0.4;
}

impl Flavor for AntRule {
    const DEFAULT_BOUNDARY: BoundaryPolicy = BoundaryPolicy::Toroidal;
    // the ant has to be able to walk off one edge and onto the other
    const BOUNDARY_LOCKED: bool = true;
    const DEFAULT_DENSITY: f64 = 0.1;

    fn scatter<G: Rng>(
        engine: &mut TickEngine<Self>,
        density: f64,
        rng: &mut G,
    ) -> Result<(), GridError> {
        engine.randomize_with_ant(density, rng)
    }
    fn prepare<G: Rng>(
        engine: &mut TickEngine<Self>,
        rng: &mut G,
    ) -> Result<(), GridError> {
        if engine.ant().is_none() {
            let index = rng.random_range(0..engine.grid().len());
            engine.move_ant(index, rng)?;
        }
        Ok(())
    }
    fn move_marker<G: Rng>(
        engine: &mut TickEngine<Self>,
        index: usize,
        rng: &mut G,
    ) -> Result<(), GridError> {
        engine.move_ant(index, rng)
    }
}

fn initial_engine<R: Flavor>(args: &Args, rule: R) -> Result<TickEngine<R>> {
    let mut rng = rand::rng();
    let boundary = match args.boundary()? {
        Some(boundary) if R::BOUNDARY_LOCKED && boundary != R::DEFAULT_BOUNDARY => {
            warn!(requested = ?boundary, "boundary is fixed for this automaton");
            R::DEFAULT_BOUNDARY
        }
        boundary => boundary.unwrap_or(R::DEFAULT_BOUNDARY),
    };

    let mut engine = if let Some(file_name) = args.input_file() {
        let text = std::fs::read_to_string(&file_name)
            .with_context(|| format!("read grid from {file_name}"))?;
        let grid: Grid<R::Cell> = DigitRows
            .decode(&text)
            .with_context(|| format!("load grid from {file_name}"))?;
        TickEngine::new(grid, rule, boundary)
    } else {
        let (width, height) = args.grid_size()?;
        let mut engine = TickEngine::new(Grid::new(width, height)?, rule, boundary);
        let density = args.density()?.unwrap_or(R::DEFAULT_DENSITY);
        match args.fill_mode()? {
            options::FillMode::Random => R::scatter(&mut engine, density, &mut rng)?,
            fill => fill.apply(&mut engine, density, &mut rng)?,
        }
        engine
    };
    R::prepare(&mut engine, &mut rng)?;
    Ok(engine.with_parallel(args.multithreading()))
}

fn status<R: TransitionRule>(engine: &TickEngine<R>, tick: Duration, report: &str) -> String {
    format!(
        "[{:?}] {:?} tick:{}ms {}",
        engine.state(),
        engine.boundary(),
        tick.as_millis(),
        report
    )
}

/// Interactive loop: key and mouse commands between ticks
fn run_console<R: Flavor>(
    args: &Args,
    engine: &mut TickEngine<R>,
    stats: &mut SwitchRecorder,
) -> Result<()>
where
    R::Cell: Glyph,
{
    let mut rng = rand::rng();
    let density = args.density()?.unwrap_or(R::DEFAULT_DENSITY);
    let generations = args.generations()?;
    let mut tick = args.sleep()?.unwrap_or(Duration::from_millis(500));
    let mut console = ConsoleRender::new().context("set up terminal")?;
    let mut report = String::new();

    'ticks: loop {
        console.set_report(status(engine, tick, &report));
        console.render(engine.grid()).context("render grid")?;

        // drain input until the next tick is due
        let due = std::time::Instant::now() + tick;
        loop {
            let timeout = due.saturating_duration_since(std::time::Instant::now());
            let Some(cmd) = console.poll_events(timeout)? else {
                break;
            };
            let outcome = match cmd {
                ConsoleCommand::Exit => break 'ticks,
                ConsoleCommand::Handled => Ok(()),
                ConsoleCommand::Start => {
                    engine.start();
                    Ok(())
                }
                ConsoleCommand::Pause => {
                    engine.pause();
                    Ok(())
                }
                ConsoleCommand::TogglePause => {
                    engine.toggle_running();
                    Ok(())
                }
                ConsoleCommand::Step => {
                    engine.step();
                    stats.record(engine.generation(), engine.grid().live_count());
                    Ok(())
                }
                ConsoleCommand::RandomFill => {
                    engine.pause();
                    R::scatter(engine, density, &mut rng)
                }
                ConsoleCommand::Clear => {
                    engine.reset();
                    Ok(())
                }
                ConsoleCommand::ToggleBoundary if R::BOUNDARY_LOCKED => Ok(()),
                ConsoleCommand::ToggleBoundary => {
                    engine.set_boundary(engine.boundary().toggled());
                    Ok(())
                }
                ConsoleCommand::Faster => {
                    tick = tick.saturating_sub(TICK_STEP).max(MIN_TICK);
                    Ok(())
                }
                ConsoleCommand::Slower => {
                    tick = (tick + TICK_STEP).min(MAX_TICK);
                    Ok(())
                }
                ConsoleCommand::Toggle(pos) => match engine.grid().index_of(pos) {
                    Some(index) => engine.toggle(index),
                    None => Ok(()),
                },
                ConsoleCommand::MoveMarker(pos) => match engine.grid().index_of(pos) {
                    Some(index) => R::move_marker(engine, index, &mut rng),
                    None => Ok(()),
                },
            };
            if let Err(err) = outcome {
                warn!(%err, "ignored console command");
            }
            console.set_report(status(engine, tick, &report));
            console.render(engine.grid()).context("render grid")?;
        }

        if engine.generation() >= generations {
            engine.pause();
        }
        if engine.tick() {
            stats.record(engine.generation(), engine.grid().live_count());
        }
        if stats.has_report() {
            report = stats.report();
        }
    }
    Ok(())
}

/// Runs `--gens` generations without a terminal, printing periodic reports
fn run_headless<R: TransitionRule>(
    args: &Args,
    engine: &mut TickEngine<R>,
    stats: &mut SwitchRecorder,
) -> Result<()> {
    let sleep = args.sleep()?;
    let generations = args.generations()?;

    engine.start();
    while engine.generation() < generations {
        if stats.has_report() {
            println!("{}", stats.report());
        }

        engine.tick();
        stats.record(engine.generation(), engine.grid().live_count());
        if let Some(time) = sleep {
            thread::sleep(time);
        }
    }
    engine.pause();
    Ok(())
}

fn run<R: Flavor>(args: &Args, rule: R) -> Result<()>
where
    R::Cell: Glyph,
{
    let mut engine = initial_engine(args, rule)?;
    info!(
        width = engine.grid().width(),
        height = engine.grid().height(),
        live = engine.grid().live_count(),
        boundary = ?engine.boundary(),
        "starting simulation"
    );

    let mut stats = SwitchRecorder::new(engine.grid().live_count(), args.stats_file().is_some());
    if args.console() {
        run_console(args, &mut engine, &mut stats)?;
    } else {
        run_headless(args, &mut engine, &mut stats)?;
    }
    info!(generation = engine.generation(), "simulation finished");

    if let Some(file_name) = args.stats_file() {
        stats
            .save(&file_name)
            .with_context(|| format!("write stats to {file_name}"))?;
    }
    if let Some(file_name) = args.output_file() {
        if !DigitRows.can_encode(engine.grid()) {
            warn!("ant heading is not stored in the digit format");
        }
        std::fs::write(&file_name, DigitRows.encode(engine.grid()))
            .with_context(|| format!("write grid to {file_name}"))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = Args::from_env()? else {
        return Ok(());
    };

    match args.automaton()? {
        Automaton::Life => run(&args, ConwayRule),
        Automaton::Ant => run(&args, args.ant_rule()?),
    }
}
