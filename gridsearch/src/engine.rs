use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::{
    distance::Heuristic,
    frontier::Frontier,
    grid::{Cell, Grid, Point, VisitState},
};

/// Where the engine is in its lifecycle.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// The grid can be edited, no search results are shown
    #[default]
    Editing,
    /// A search is in progress; edits are ignored until it ends or is reset
    Running,
    /// The end cell has been expanded
    Completed,
    /// The frontier ran dry before the end cell was reached
    Exhausted,
}

impl Phase {
    pub fn is_done(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Exhausted)
    }

    pub fn accepts_edits(&self) -> bool {
        !matches!(self, Phase::Running)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old config
pub struct SearchConfig {
    pub heuristic: Heuristic,
}

/// Creates an engine for an open grid of the given size.
pub fn create_search_grid(width: usize, height: usize) -> SearchEngine {
    SearchEngine::new(width, height)
}

/// Owns the grid and the frontier and drives a best-first search over them
/// one expansion at a time.
///
/// Every operation is total: calls that make no sense in the current phase,
/// or that name a point outside the grid, are ignored.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    grid: Grid,
    frontier: Frontier,
    phase: Phase,
    expansions: usize,
    hovered: Option<Point>,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(width, height, SearchConfig::default())
    }

    pub fn with_config(width: usize, height: usize, config: SearchConfig) -> Self {
        if width == 0 || height == 0 {
            warn!(
                "grid size {}x{} raised to at least one cell per side",
                width, height
            );
        }
        Self::from_grid(Grid::new(width.max(1), height.max(1)), config)
    }

    /// Wraps an existing grid. Any search state stored in its cells is
    /// discarded.
    pub fn from_grid(mut grid: Grid, config: SearchConfig) -> Self {
        grid.reset_visitation();
        Self {
            grid,
            frontier: Frontier::new(),
            phase: Phase::Editing,
            expansions: 0,
            hovered: None,
            config,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn cell_at(&self, point: Point) -> Option<&Cell> {
        self.grid.cell_at(point)
    }

    pub fn start(&self) -> Option<Point> {
        self.grid.start()
    }

    pub fn end(&self) -> Option<Point> {
        self.grid.end()
    }

    pub fn hovered_cell(&self) -> Option<Point> {
        self.hovered
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Frontier contents in the order they would be expanded
    pub fn frontier_snapshot(&self) -> Vec<(Point, usize)> {
        self.frontier.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Number of cells expanded since the search was started
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Ignored while running. Discards the results of a finished search.
    pub fn set_config(&mut self, config: SearchConfig) {
        if !self.accepts_edits("set_config") || self.config == config {
            return;
        }
        self.config = config;
        self.after_edit(true);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!("phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn accepts_edits(&self, operation: &str) -> bool {
        if self.phase.accepts_edits() {
            true
        } else {
            trace!("ignoring {} while {:?}", operation, self.phase);
            false
        }
    }

    /// Results of a finished search no longer describe an edited grid.
    fn after_edit(&mut self, changed: bool) {
        if changed && self.phase != Phase::Editing {
            self.frontier.clear();
            self.grid.reset_visitation();
            self.expansions = 0;
            self.set_phase(Phase::Editing);
        }
    }

    pub fn set_obstacle(&mut self, point: Point, value: bool) {
        if !self.accepts_edits("set_obstacle") {
            return;
        }
        let changed = self.grid.set_obstacle(point, value);
        self.after_edit(changed);
    }

    pub fn set_start(&mut self, point: Point) {
        if !self.accepts_edits("set_start") {
            return;
        }
        let changed = self.grid.set_start(point);
        self.after_edit(changed);
    }

    pub fn set_end(&mut self, point: Point) {
        if !self.accepts_edits("set_end") {
            return;
        }
        let changed = self.grid.set_end(point);
        self.after_edit(changed);
    }

    fn clear_start(&mut self) {
        if !self.accepts_edits("clear_start") {
            return;
        }
        let changed = self.grid.clear_start();
        self.after_edit(changed);
    }

    /// Tells the engine which cell the pointer is over. Points outside the
    /// grid count as no cell.
    pub fn set_hovered_cell(&mut self, point: Option<Point>) {
        self.hovered = point.filter(|p| self.grid.in_bounds(*p));
    }

    /// Primary button held (`down`) over a cell draws an obstacle there.
    /// Releasing the button changes nothing.
    pub fn on_click_left(&mut self, down: bool) {
        if !down {
            return;
        }
        if let Some(point) = self.hovered {
            self.set_obstacle(point, true);
        }
    }

    /// Places the start, then the end.
    ///
    /// Without a start the hovered cell becomes the start, otherwise without
    /// an end it becomes the end (taking the cell over from the start). Once
    /// both are placed, clicking the start removes it and any other cell
    /// becomes the new end; the start is never relocated by this.
    pub fn on_click_right(&mut self) {
        let Some(point) = self.hovered else {
            return;
        };

        match (self.grid.start(), self.grid.end()) {
            (None, _) => self.set_start(point),
            (Some(_), None) => self.set_end(point),
            (Some(start), Some(_)) if start == point => self.clear_start(),
            (Some(_), Some(_)) => self.set_end(point),
        }
    }

    /// Begins a new search from the start cell. Needs both start and end and
    /// does nothing while a search is already running.
    pub fn start_simulation(&mut self) {
        if !self.accepts_edits("start_simulation") {
            return;
        }
        let (Some(start), Some(end)) = (self.grid.start(), self.grid.end()) else {
            debug!("cannot start search without both a start and an end");
            return;
        };
        if start == end {
            return;
        }

        self.frontier.clear();
        self.grid.reset_visitation();
        self.expansions = 0;

        if let Some(cell) = self.grid.cell_at_mut(start) {
            cell.visit_state = VisitState::Frontier;
            cell.distance = Some(0);
        }
        self.frontier.push(start, self.config.heuristic.estimate(start, end));

        debug!(
            "searching from {} to {} using heuristic {:?}",
            start, end, self.config.heuristic
        );
        self.set_phase(Phase::Running);
    }

    /// Expands exactly one cell and returns the resulting phase. Does nothing
    /// unless a search is running.
    pub fn step_simulation(&mut self) -> Phase {
        if self.phase != Phase::Running {
            return self.phase;
        }

        let Some(end) = self.grid.end() else {
            // edits are refused while running, so the end cannot vanish
            self.set_phase(Phase::Exhausted);
            return self.phase;
        };

        let Some(current) = self.frontier.pop_min() else {
            debug!("frontier empty after {} expansions", self.expansions);
            self.set_phase(Phase::Exhausted);
            return self.phase;
        };

        let order = self.expansions;
        self.expansions += 1;

        let Some(cell) = self.grid.cell_at_mut(current) else {
            return self.phase;
        };
        cell.visit_state = VisitState::Visited;
        cell.expansion_order = Some(order);
        let distance = cell.distance.unwrap_or_default();

        trace!("expanded {} at distance {} as #{}", current, distance, order);

        if current == end {
            debug!("reached {} at distance {}", end, distance);
            self.set_phase(Phase::Completed);
            return self.phase;
        }

        let candidate = distance + 1;
        for neighbor in self.grid.neighbors_of(current) {
            let Some(cell) = self.grid.cell_at_mut(neighbor) else {
                continue;
            };

            let improves = match (cell.visit_state, cell.distance) {
                (VisitState::Visited, _) => false,
                (VisitState::Unvisited, _) | (_, None) => true,
                (VisitState::Frontier, Some(known)) => candidate < known,
            };
            if !improves {
                continue;
            }

            cell.distance = Some(candidate);
            cell.from = Some(current);
            cell.visit_state = VisitState::Frontier;

            self.frontier.push(
                neighbor,
                candidate + self.config.heuristic.estimate(neighbor, end),
            );
        }

        self.phase
    }

    /// Steps until the search is over. Does nothing unless a search is
    /// running.
    pub fn finish_simulation(&mut self) -> Phase {
        // every step expands a distinct cell, plus one step to notice an
        // empty frontier
        let max_steps = self.grid.width() * self.grid.height() + 1;
        for _ in 0..max_steps {
            if self.step_simulation() != Phase::Running {
                break;
            }
        }
        self.phase
    }

    /// Stops any search and clears its results. Obstacles, start and end are
    /// kept.
    pub fn reset_simulation(&mut self) {
        self.frontier.clear();
        self.grid.reset_visitation();
        self.expansions = 0;
        self.set_phase(Phase::Editing);
    }

    /// The shortest path from start to end, both included, once the search
    /// has completed.
    pub fn path(&self) -> Option<Vec<Point>> {
        if self.phase != Phase::Completed {
            return None;
        }
        let start = self.grid.start()?;
        let end = self.grid.end()?;

        // backtrack to find the total shortest path
        let mut path = vec![end];
        let mut current = end;
        while current != start {
            current = self.grid.cell_at(current)?.from?;
            path.push(current);

            if path.len() > self.grid.width() * self.grid.height() {
                return None;
            }
        }

        path.reverse();
        Some(path)
    }
}
