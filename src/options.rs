use std::{fmt::Display, str::FromStr, time::Duration};

use anyhow::{Context, Result, anyhow};
use dishrs::{AntRule, BoundaryPolicy, Cell, GridError, Pos2, TickEngine, TransitionRule};
use rand::Rng;

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    fn new<T: AsRef<str>>(args: &[T]) -> Result<Option<Self>> {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optflag("c", "console", "run in console mode");
        opts.optflag("t", "threads", "enables multi-threading");
        opts.optopt("a", "automaton", "automaton to run: life or ant", "KIND");
        opts.optopt("r", "rule", "ant turn table preset: a or b", "PRESET");
        opts.optopt("b", "boundary", "edge handling: clamped or toroidal", "POLICY");
        opts.optopt("o", "output", "output file", "FILE");
        opts.optopt("i", "input", "input file", "FILE");
        opts.optopt("w", "width", "set grid width", "WIDTH");
        opts.optopt("h", "height", "set grid height", "HEIGHT");
        opts.optopt("f", "fill", "set fill type", "TYPE");
        opts.optopt("d", "density", "live fraction for random fill", "FRACTION");
        opts.optopt(
            "s",
            "sleep",
            "the amount of time to sleep between generations",
            "MILLIS",
        );
        opts.optopt("g", "gens", "max number of generations", "COUNT");
        opts.optopt("", "stats", "write stats csv to file", "FILE");

        let matches = opts
            .parse(args.iter().map(T::as_ref))
            .context("invalid arguments")?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: dish [options]"));
            Ok(None)
        } else {
            Ok(Some(Self { matches }))
        }
    }
    pub fn from_env() -> Result<Option<Self>> {
        let env = std::env::args().collect::<Vec<_>>();
        Self::new(&env[1..])
    }

    fn get<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.matches
            .opt_get(name)
            .map_err(|err| anyhow!("invalid --{name}: {err}"))
    }

    pub fn automaton(&self) -> Result<Automaton> {
        Ok(self.get("automaton")?.unwrap_or(Automaton::Life))
    }
    pub fn ant_rule(&self) -> Result<AntRule> {
        Ok(self.get("rule")?.unwrap_or_default())
    }
    pub fn boundary(&self) -> Result<Option<BoundaryPolicy>> {
        self.get("boundary")
    }

    pub fn console(&self) -> bool {
        self.matches.opt_present("console")
    }
    pub fn multithreading(&self) -> bool {
        self.matches.opt_present("threads")
    }

    pub fn generations(&self) -> Result<u64> {
        Ok(self.get("gens")?.unwrap_or(u64::MAX))
    }
    /// Delay between generations; the console defaults to half a second
    pub fn sleep(&self) -> Result<Option<Duration>> {
        Ok(match self.get("sleep")? {
            Some(millis) => Some(Duration::from_millis(millis)),
            None if self.console() => Some(Duration::from_millis(500)),
            None => None,
        })
    }

    pub fn grid_size(&self) -> Result<(usize, usize)> {
        let default = if self.console() {
            let (cols, rows) = crossterm::terminal::size().context("query terminal size")?;
            // keep the bottom line for the status report
            (cols as usize, (rows as usize).saturating_sub(1).max(1))
        } else {
            (100, 100)
        };

        Ok((
            self.get("width")?.unwrap_or(default.0),
            self.get("height")?.unwrap_or(default.1),
        ))
    }
    pub fn fill_mode(&self) -> Result<FillMode> {
        Ok(self.get("fill")?.unwrap_or(FillMode::Random))
    }
    pub fn density(&self) -> Result<Option<f64>> {
        self.get("density")
    }

    pub fn output_file(&self) -> Option<String> {
        self.matches.opt_str("output")
    }
    pub fn input_file(&self) -> Option<String> {
        self.matches.opt_str("input")
    }

    pub fn stats_file(&self) -> Option<String> {
        self.matches.opt_str("stats")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Automaton {
    Life,
    Ant,
}
impl FromStr for Automaton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "life" => Ok(Self::Life),
            "ant" => Ok(Self::Ant),
            other => Err(format!("unknown automaton `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Random,
    Alternating,
    All,
    Empty,
}
impl FromStr for FillMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "alternating" => Ok(Self::Alternating),
            "all" => Ok(Self::All),
            "empty" => Ok(Self::Empty),
            other => Err(format!("unknown fill mode `{other}`")),
        }
    }
}
impl FillMode {
    fn fill_cell(self, cell: Pos2) -> bool {
        match self {
            Self::Random | Self::Empty => false,
            Self::Alternating => (cell.x + cell.y) % 2 == 0,
            Self::All => true,
        }
    }

    /// Fills the engine's grid; `Random` toggles cells until `density` of
    /// them are live
    pub fn apply<R, G>(
        self,
        engine: &mut TickEngine<R>,
        density: f64,
        rng: &mut G,
    ) -> Result<(), GridError>
    where
        R: TransitionRule,
        G: Rng,
    {
        if self == Self::Random {
            return engine.randomize(density, rng);
        }

        engine.reset();
        let width = engine.grid().width();
        let targets: Vec<usize> = (0..engine.grid().len())
            .filter(|&i| self.fill_cell(Pos2::from_index(i, width)))
            .filter(|&i| !engine.grid().cells()[i].is_live())
            .collect();
        for index in targets {
            engine.toggle(index)?;
        }
        Ok(())
    }
}
