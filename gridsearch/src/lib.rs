//! Grid editing and step-by-step best-first search.
//!
//! A [`SearchEngine`] owns a [`Grid`] of passable/blocked cells and a
//! [`Frontier`] of discovered cells. After placing a start and an end, the
//! search is advanced one expansion per [`SearchEngine::step_simulation`] call
//! so a frontend can show how the frontier grows.

pub mod distance;
pub mod engine;
pub mod frontier;
pub mod grid;
pub mod util;

pub use distance::{manhattan, Heuristic};
pub use engine::{create_search_grid, Phase, SearchConfig, SearchEngine};
pub use frontier::Frontier;
pub use grid::{Cell, Grid, Point, VisitState};
