use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::grid::Point;

/// Manhattan (L1) distance between two points.
pub fn manhattan(a: Point, b: Point) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Estimate added to a frontier entry's distance to form its priority.
///
/// `None` gives uniform-cost search. `Manhattan` turns the search into A*; on a
/// 4-connected grid with unit steps it never overestimates and is consistent,
/// so a visited cell is never reached again with a lower distance.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Heuristic {
    #[default]
    None,
    Manhattan,
}

impl Heuristic {
    pub fn estimate(&self, from: Point, to: Point) -> usize {
        match self {
            Heuristic::None => 0,
            Heuristic::Manhattan => manhattan(from, to),
        }
    }

    /// iterates over all heuristics
    pub fn iterate() -> impl Iterator<Item = Heuristic> {
        [Heuristic::None, Heuristic::Manhattan].into_iter()
    }
}

impl Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Heuristic::None => "none (Dijkstra)",
                Heuristic::Manhattan => "manhattan (A*)",
            }
        )
    }
}
