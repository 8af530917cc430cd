mod state;

pub use self::state::{RunEvent, RunState};
use crate::{
    AntCell, BoundaryPolicy, Cell, Grid, GridError, Heading, TransitionRule, neighbors::gather,
};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Evaluates the rule for one cell against the unmodified `grid`
#[inline]
fn next_cell<R: TransitionRule>(
    grid: &Grid<R::Cell>,
    rule: &R,
    boundary: BoundaryPolicy,
    index: usize,
) -> R::Cell {
    let hood = gather(grid, index, boundary, rule.connectivity());
    rule.next_state(grid.cells()[index], &hood)
}

/// Derives generation N+1 from generation N
///
/// Every cell is evaluated against `grid` as given, which is never touched,
/// so no cell sees a neighbor that was already updated in this tick.
pub fn next_generation<R: TransitionRule>(
    grid: &Grid<R::Cell>,
    rule: &R,
    boundary: BoundaryPolicy,
) -> Grid<R::Cell> {
    let next = (0..grid.len())
        .map(|i| next_cell(grid, rule, boundary, i))
        .collect::<Vec<_>>();
    grid.with_cells(next)
}

/// Same as [`next_generation`], with cells evaluated on the rayon pool
pub fn next_generation_parallel<R: TransitionRule>(
    grid: &Grid<R::Cell>,
    rule: &R,
    boundary: BoundaryPolicy,
) -> Grid<R::Cell> {
    // rayon keeps the index order when collecting into a Vec
    let next = (0..grid.len())
        .into_par_iter()
        .map(|i| next_cell(grid, rule, boundary, i))
        .collect::<Vec<_>>();
    grid.with_cells(next)
}

/// Owns the current generation and advances it on request
///
/// The engine is passive: it never advances by itself. A driver feeds it
/// [`RunEvent`]s and calls [`TickEngine::tick`] on its own cadence; `tick`
/// only advances while [`RunState::Running`]. Edits made through the engine
/// pause it first.
#[derive(Debug, Clone)]
pub struct TickEngine<R: TransitionRule> {
    grid: Grid<R::Cell>,
    rule: R,
    boundary: BoundaryPolicy,
    state: RunState,
    generation: u64,
    parallel: bool,
}

impl<R: TransitionRule> TickEngine<R> {
    pub fn new(grid: Grid<R::Cell>, rule: R, boundary: BoundaryPolicy) -> Self {
        Self {
            grid,
            rule,
            boundary,
            state: RunState::Paused,
            generation: 0,
            parallel: false,
        }
    }

    /// Evaluate generations on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[inline]
    pub fn grid(&self) -> &Grid<R::Cell> {
        &self.grid
    }
    #[inline]
    pub fn rule(&self) -> &R {
        &self.rule
    }
    #[inline]
    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }
    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }
    /// Generations advanced since the current grid was installed
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn handle(&mut self, event: RunEvent) -> RunState {
        let next = self.state.on(event);
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "engine state changed");
            self.state = next;
        }
        self.state
    }
    #[inline]
    pub fn start(&mut self) {
        self.handle(RunEvent::Start);
    }
    #[inline]
    pub fn pause(&mut self) {
        self.handle(RunEvent::Pause);
    }
    /// Space bar semantics: start when paused, pause when running
    #[inline]
    pub fn toggle_running(&mut self) -> RunState {
        self.handle(RunEvent::Toggle)
    }

    /// Advances one generation regardless of the run state
    pub fn step(&mut self) {
        self.grid = if self.parallel {
            next_generation_parallel(&self.grid, &self.rule, self.boundary)
        } else {
            next_generation(&self.grid, &self.rule, self.boundary)
        };
        self.generation += 1;
        trace!(generation = self.generation, "advanced generation");
    }

    /// Advances one generation if running; returns whether it did
    pub fn tick(&mut self) -> bool {
        let running = self.state == RunState::Running;
        if running {
            self.step();
        }
        running
    }

    /// Replaces the grid wholesale
    pub fn load(&mut self, grid: Grid<R::Cell>) {
        self.pause();
        debug!(width = grid.width(), height = grid.height(), "loaded grid");
        self.grid = grid;
        self.generation = 0;
    }

    pub fn toggle(&mut self, index: usize) -> Result<(), GridError> {
        self.pause();
        self.grid.toggle(index)
    }

    pub fn reset(&mut self) {
        self.pause();
        self.grid.reset();
    }

    /// Clears the grid, then brings random dead cells to life until at least
    /// `target` of them are live
    ///
    /// `target` must lie in `0.0..=1.0`. Live cells are never picked, so the
    /// live count only grows and any target in range is reached.
    pub fn randomize<G: Rng>(&mut self, target: f64, rng: &mut G) -> Result<(), GridError> {
        if !(0.0..=1.0).contains(&target) {
            return Err(GridError::validation(format!(
                "live fraction {target} is outside 0..=1"
            )));
        }
        self.reset();

        let len = self.grid.len();
        let mut live = 0usize;
        while live < len && (live as f64) / (len as f64) < target {
            let index = rng.random_range(0..len);
            if !self.grid.cells()[index].is_live() {
                self.grid.toggle(index)?;
                live += 1;
            }
        }
        debug!(target, live, "randomized grid");
        Ok(())
    }

    pub fn set_boundary(&mut self, boundary: BoundaryPolicy) {
        debug!(?boundary, "boundary policy changed");
        self.boundary = boundary;
    }

    pub fn set_rule(&mut self, rule: R) {
        self.rule = rule;
    }
}

impl<R: TransitionRule<Cell = AntCell>> TickEngine<R> {
    /// Puts the ant down on `index` with a random heading
    pub fn move_ant<G: Rng>(&mut self, index: usize, rng: &mut G) -> Result<(), GridError> {
        self.pause();
        let heading = Heading::ALL[rng.random_range(0..Heading::ALL.len())];
        self.grid.move_ant(index, heading)
    }

    /// [`TickEngine::randomize`], then drops the ant somewhere random
    pub fn randomize_with_ant<G: Rng>(
        &mut self,
        target: f64,
        rng: &mut G,
    ) -> Result<(), GridError> {
        self.randomize(target, &mut *rng)?;
        let index = rng.random_range(0..self.grid.len());
        self.move_ant(index, rng)
    }

    #[inline]
    pub fn ant(&self) -> Option<(usize, Heading)> {
        self.grid.ant()
    }

    /// Number of cells carrying a heading; never more than one
    pub fn ant_count(&self) -> usize {
        self.grid.iter().filter(|c| c.has_marker()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AntRule, Binary, ConwayRule};
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn life(width: usize, initial: &[u8]) -> Grid<Binary> {
        Grid::create(width, None, Some(initial)).unwrap()
    }

    fn live_indices(grid: &Grid<Binary>) -> Vec<usize> {
        grid.iter()
            .enumerate()
            .filter(|(_, c)| c.is_live())
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        #[rustfmt::skip]
        let horizontal = life(5, &[
            0, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
            0, 1, 1, 1, 0,
            0, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
        ]);
        let gen1 = next_generation(&horizontal, &ConwayRule, BoundaryPolicy::Clamped);
        assert_eq!(live_indices(&gen1), vec![7, 12, 17]);

        let gen2 = next_generation(&gen1, &ConwayRule, BoundaryPolicy::Clamped);
        assert_eq!(gen2, horizontal);
    }

    #[test]
    fn lone_cell_dies() {
        let grid = life(3, &[0, 0, 0, 0, 1, 0, 0, 0, 0]);
        let next = next_generation(&grid, &ConwayRule, BoundaryPolicy::Clamped);

        assert_eq!(next.live_count(), 0);
    }

    #[test]
    fn block_is_still_life() {
        #[rustfmt::skip]
        let block = life(4, &[
            0, 0, 0, 0,
            0, 1, 1, 0,
            0, 1, 1, 0,
            0, 0, 0, 0,
        ]);
        let mut grid = block.clone();
        for _ in 0..5 {
            grid = next_generation(&grid, &ConwayRule, BoundaryPolicy::Clamped);
        }
        assert_eq!(grid, block);
    }

    #[test]
    fn toroidal_blinker_wraps_over_the_edge() {
        // vertical blinker in column 0 becomes horizontal across columns 4, 0, 1
        #[rustfmt::skip]
        let grid = life(5, &[
            0, 0, 0, 0, 0,
            1, 0, 0, 0, 0,
            1, 0, 0, 0, 0,
            1, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
        ]);
        let next = next_generation(&grid, &ConwayRule, BoundaryPolicy::Toroidal);
        assert_eq!(live_indices(&next), vec![10, 11, 14]);

        let clamped = next_generation(&grid, &ConwayRule, BoundaryPolicy::Clamped);
        assert_eq!(live_indices(&clamped), vec![10, 11]);
    }

    #[test]
    fn step_leaves_input_untouched() {
        let grid = life(3, &[0, 1, 0, 0, 1, 0, 0, 1, 0]);
        let before = grid.clone();
        let _ = next_generation(&grid, &ConwayRule, BoundaryPolicy::Clamped);

        assert_eq!(grid, before);
    }

    #[test]
    fn ant_walks_on_a_torus() {
        let mut grid = Grid::<AntCell>::new(3, 3).unwrap();
        grid.move_ant(4, Heading::North).unwrap();

        let next = next_generation(&grid, &AntRule::A, BoundaryPolicy::Toroidal);
        assert_eq!(next.ant(), Some((1, Heading::East)));
        assert!(next.get(1).unwrap().color);
        assert!(!next.get(4).unwrap().color);

        // top row, heading east: steps right onto cell 2
        let next = next_generation(&next, &AntRule::A, BoundaryPolicy::Toroidal);
        assert_eq!(next.ant(), Some((2, Heading::South)));
    }

    #[test]
    fn ant_wraps_around_the_top_edge() {
        let mut grid = Grid::<AntCell>::new(3, 3).unwrap();
        grid.move_ant(1, Heading::North).unwrap();

        let next = next_generation(&grid, &AntRule::A, BoundaryPolicy::Toroidal);
        assert_eq!(next.ant(), Some((7, Heading::East)));
    }

    #[test]
    fn engine_only_ticks_while_running() {
        let grid = life(3, &[0, 0, 0, 1, 1, 1, 0, 0, 0]);
        let mut engine = TickEngine::new(grid.clone(), ConwayRule, BoundaryPolicy::Clamped);

        assert_eq!(engine.state(), RunState::Paused);
        assert!(!engine.tick());
        assert_eq!(engine.grid(), &grid);

        engine.start();
        assert!(engine.tick());
        assert_eq!(engine.generation(), 1);
        assert_ne!(engine.grid(), &grid);

        engine.pause();
        engine.step();
        assert_eq!(engine.generation(), 2);
        assert_eq!(engine.grid(), &grid);
    }

    #[test]
    fn toggle_running_flips_between_states() {
        let grid = life(3, &[0, 0, 0, 1, 1, 1, 0, 0, 0]);
        let mut engine = TickEngine::new(grid, ConwayRule, BoundaryPolicy::Clamped);

        assert_eq!(engine.toggle_running(), RunState::Running);
        assert!(engine.tick());
        assert_eq!(engine.toggle_running(), RunState::Paused);
        assert!(!engine.tick());
        assert_eq!(engine.generation(), 1);
    }

    #[test]
    fn edits_pause_the_engine() {
        let grid = Grid::<Binary>::new(3, 3).unwrap();
        let mut engine = TickEngine::new(grid, ConwayRule, BoundaryPolicy::Clamped);

        engine.start();
        engine.toggle(4).unwrap();
        assert_eq!(engine.state(), RunState::Paused);
        assert_eq!(engine.grid().live_count(), 1);

        engine.start();
        engine.reset();
        assert_eq!(engine.state(), RunState::Paused);
        assert_eq!(engine.grid().live_count(), 0);

        assert!(engine.toggle(9).is_err());
    }

    #[test]
    fn load_replaces_grid_and_generation() {
        let mut engine =
            TickEngine::new(Grid::<Binary>::new(2, 2).unwrap(), ConwayRule, BoundaryPolicy::Clamped);
        engine.step();

        engine.load(Grid::new(5, 4).unwrap());
        assert_eq!(engine.generation(), 0);
        assert_eq!((engine.grid().width(), engine.grid().height()), (5, 4));
    }

    #[test]
    fn randomize_meets_target() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut engine =
            TickEngine::new(Grid::<Binary>::new(10, 10).unwrap(), ConwayRule, BoundaryPolicy::Clamped);

        engine.randomize(0.4, &mut rng).unwrap();
        assert!(engine.grid().live_fraction() >= 0.4);
        // stops at the first toggle that reaches the target
        assert_eq!(engine.grid().live_count(), 40);

        assert!(engine.randomize(1.5, &mut rng).is_err());
        assert!(engine.randomize(f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn randomize_reaches_dense_targets() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine =
            TickEngine::new(Grid::<Binary>::new(20, 20).unwrap(), ConwayRule, BoundaryPolicy::Clamped);

        engine.randomize(0.75, &mut rng).unwrap();
        assert_eq!(engine.grid().live_count(), 300);

        engine.randomize(0.9, &mut rng).unwrap();
        assert_eq!(engine.grid().live_count(), 360);

        engine.randomize(1.0, &mut rng).unwrap();
        assert_eq!(engine.grid().live_count(), 400);

        engine.randomize(0.0, &mut rng).unwrap();
        assert_eq!(engine.grid().live_count(), 0);
    }

    #[test]
    fn randomize_with_ant_places_one_ant() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut engine =
            TickEngine::new(Grid::<AntCell>::new(8, 8).unwrap(), AntRule::A, BoundaryPolicy::Toroidal);

        engine.randomize_with_ant(0.1, &mut rng).unwrap();
        assert_eq!(engine.ant_count(), 1);
        assert!(engine.grid().live_fraction() >= 0.1);

        engine.move_ant(0, &mut rng).unwrap();
        assert_eq!(engine.ant().map(|(i, _)| i), Some(0));
    }

    #[test]
    fn set_rule_and_boundary_take_effect_next_step() {
        let mut grid = Grid::<AntCell>::new(3, 3).unwrap();
        grid.move_ant(4, Heading::West).unwrap();
        let mut engine = TickEngine::new(grid, AntRule::A, BoundaryPolicy::Toroidal);

        engine.set_rule(AntRule::B);
        engine.set_boundary(BoundaryPolicy::Clamped);
        engine.step();

        // preset B: the cell north of the ant triggers on west (south=3)
        assert_eq!(engine.ant(), Some((1, Heading::North)));
        assert_eq!(engine.boundary(), BoundaryPolicy::Clamped);
    }

    fn arb_life() -> impl Strategy<Value = Grid<Binary>> {
        (1usize..8, 1usize..8).prop_flat_map(|(w, h)| {
            prop::collection::vec(0u8..2, w * h)
                .prop_map(move |cells| Grid::<Binary>::create(w, Some(h), Some(&cells[..])).unwrap())
        })
    }

    fn arb_ant() -> impl Strategy<Value = (Grid<AntCell>, usize, u8)> {
        (1usize..8, 1usize..8).prop_flat_map(|(w, h)| {
            (
                prop::collection::vec(0u8..2, w * h),
                0..w * h,
                0u8..4,
            )
                .prop_map(move |(colors, ant, heading)| {
                    let codes: Vec<_> = colors.into_iter().map(|c| (c, None)).collect();
                    let grid = Grid::<AntCell>::create(w, Some(h), Some(&codes[..])).unwrap();
                    (grid, ant, heading)
                })
        })
    }

    fn arb_boundary() -> impl Strategy<Value = BoundaryPolicy> {
        prop_oneof![Just(BoundaryPolicy::Clamped), Just(BoundaryPolicy::Toroidal)]
    }

    proptest! {
        #[test]
        fn step_is_deterministic(grid in arb_life(), boundary in arb_boundary()) {
            let a = next_generation(&grid, &ConwayRule, boundary);
            let b = next_generation(&grid, &ConwayRule, boundary);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn parallel_matches_serial(grid in arb_life(), boundary in arb_boundary()) {
            prop_assert_eq!(
                next_generation(&grid, &ConwayRule, boundary),
                next_generation_parallel(&grid, &ConwayRule, boundary)
            );
        }

        #[test]
        fn at_most_one_ant(
            (grid, ant, heading) in arb_ant(),
            b_preset in any::<bool>(),
            boundary in arb_boundary(),
        ) {
            let rule = if b_preset { AntRule::B } else { AntRule::A };
            let mut grid = grid;
            grid.move_ant(ant, Heading::from_code(heading).unwrap()).unwrap();
            for _ in 0..20 {
                grid = next_generation(&grid, &rule, boundary);
                prop_assert!(grid.iter().filter(|c| c.has_marker()).count() <= 1);
            }
        }
    }
}
