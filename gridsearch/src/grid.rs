use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// How far the search has come with a cell. Only ever moves forward until the
/// next reset.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum VisitState {
    #[default]
    Unvisited,
    Frontier,
    Visited,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub passable: bool,
    pub visit_state: VisitState,
    /// Cost from the start cell, known once the cell has been discovered
    pub distance: Option<usize>,
    /// Position in the sequence of expanded cells, known once visited
    pub expansion_order: Option<usize>,
    /// The neighbor the current distance was discovered through
    pub from: Option<Point>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            passable: true,
            visit_state: VisitState::Unvisited,
            distance: None,
            expansion_order: None,
            from: None,
        }
    }
}

impl Cell {
    fn clear_visitation(&mut self) {
        self.visit_state = VisitState::Unvisited;
        self.distance = None;
        self.expansion_order = None;
        self.from = None;
    }
}

/// A rectangular grid of cells stored row by row, together with the optional
/// start and end designations.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Option<Point>,
    end: Option<Point>,
}

/// Unchecked form of a deserialized grid
#[derive(Deserialize)]
struct GridData {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Option<Point>,
    end: Option<Point>,
}

impl TryFrom<GridData> for Grid {
    type Error = anyhow::Error;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        let expected = data
            .width
            .checked_mul(data.height)
            .ok_or_else(|| anyhow!("Grid size {}x{} is too large", data.width, data.height))?;
        if data.cells.len() != expected {
            bail!(
                "Grid of {}x{} needs {} cells, got {}",
                data.width,
                data.height,
                expected,
                data.cells.len()
            );
        }

        let grid = Grid {
            width: data.width,
            height: data.height,
            cells: data.cells,
            start: data.start,
            end: data.end,
        };

        for (role, point) in [("start", grid.start), ("end", grid.end)] {
            if let Some(point) = point {
                if !grid.is_passable(point) {
                    bail!("The {} {} is outside the grid or blocked", role, point);
                }
            }
        }
        if grid.start.is_some() && grid.start == grid.end {
            bail!("Start and end share the cell {:?}", grid.start);
        }

        Ok(grid)
    }
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            start: None,
            end: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    fn index(&self, point: Point) -> Option<usize> {
        self.in_bounds(point).then(|| point.y * self.width + point.x)
    }

    pub fn cell_at(&self, point: Point) -> Option<&Cell> {
        self.cells.get(self.index(point)?)
    }

    pub(crate) fn cell_at_mut(&mut self, point: Point) -> Option<&mut Cell> {
        let i = self.index(point)?;
        self.cells.get_mut(i)
    }

    pub fn is_passable(&self, point: Point) -> bool {
        self.cell_at(point).is_some_and(|c| c.passable)
    }

    /// Iterate over all points of the grid, row by row
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point { x, y }))
    }

    /// Marks or clears an obstacle. Placing an obstacle on the start or end
    /// removes that designation. Returns true if the grid changed.
    pub fn set_obstacle(&mut self, point: Point, value: bool) -> bool {
        let Some(cell) = self.cell_at_mut(point) else {
            return false;
        };

        if cell.passable != value {
            // already in the requested state
            return false;
        }
        cell.passable = !value;

        if value {
            if self.start == Some(point) {
                self.start = None;
            }
            if self.end == Some(point) {
                self.end = None;
            }
        }
        true
    }

    /// Returns true if the grid changed.
    pub fn set_start(&mut self, point: Point) -> bool {
        if !self.is_passable(point) || self.start == Some(point) {
            return false;
        }
        if self.end == Some(point) {
            self.end = None;
        }
        self.start = Some(point);
        true
    }

    /// Returns true if the grid changed.
    pub fn set_end(&mut self, point: Point) -> bool {
        if !self.is_passable(point) || self.end == Some(point) {
            return false;
        }
        if self.start == Some(point) {
            self.start = None;
        }
        self.end = Some(point);
        true
    }

    pub fn clear_start(&mut self) -> bool {
        self.start.take().is_some()
    }

    pub fn clear_end(&mut self) -> bool {
        self.end.take().is_some()
    }

    /// Forget everything a search has written into the cells. Obstacles and
    /// the start/end designations are kept.
    pub fn reset_visitation(&mut self) {
        self.cells.iter_mut().for_each(Cell::clear_visitation);
    }

    /// Returns the passable orthogonal neighbors of the given point in the
    /// order up, left, down, right.
    pub fn neighbors_of(&self, point: Point) -> impl Iterator<Item = Point> {
        let mut points = Vec::with_capacity(4);

        if !self.in_bounds(point) {
            return points.into_iter();
        }

        if point.y > 0 {
            points.push(Point {
                x: point.x,
                y: point.y - 1,
            });
        }
        if point.x > 0 {
            points.push(Point {
                x: point.x - 1,
                y: point.y,
            });
        }
        if point.y < self.height - 1 {
            points.push(Point {
                x: point.x,
                y: point.y + 1,
            });
        }
        if point.x < self.width - 1 {
            points.push(Point {
                x: point.x + 1,
                y: point.y,
            });
        }

        // filter to only keep passable cells
        points.retain(|p| self.is_passable(*p));

        points.into_iter()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point { x, y };
                let c = if self.start == Some(point) {
                    'S'
                } else if self.end == Some(point) {
                    'E'
                } else if self.is_passable(point) {
                    '.'
                } else {
                    '#'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses the layout written by the `Display` implementation: `.` is an open
/// cell, `#` an obstacle, `S` the start and `E` the end. Blank lines and
/// surrounding whitespace are ignored.
impl FromStr for Grid {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let height = rows.len();
        let width = rows
            .first()
            .map(|r| r.chars().count())
            .ok_or_else(|| anyhow!("Grid layout is empty"))?;

        let mut grid = Grid::new(width, height);

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                bail!(
                    "Row {} has {} cells, expected {}",
                    y,
                    row.chars().count(),
                    width
                );
            }

            for (x, c) in row.chars().enumerate() {
                let point = Point { x, y };
                match c {
                    '.' => {}
                    '#' => {
                        grid.set_obstacle(point, true);
                    }
                    'S' => {
                        if grid.start.is_some() {
                            bail!("More than one start cell, second one at {}", point);
                        }
                        grid.set_start(point);
                    }
                    'E' => {
                        if grid.end.is_some() {
                            bail!("More than one end cell, second one at {}", point);
                        }
                        grid.set_end(point);
                    }
                    _ => bail!("Invalid cell '{}' at {}", c, point),
                }
            }
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn all_passable(grid: &Grid) -> Vec<bool> {
        grid.points().map(|p| grid.is_passable(p)).collect()
    }

    #[test]
    fn test_new_grid_is_open() {
        let grid = Grid::new(4, 3);

        assert_eq!(grid.points().count(), 12);
        assert!(all_passable(&grid).into_iter().all(|p| p));
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), None);
        assert!(grid.cell_at(Point::new(4, 0)).is_none());
        assert!(grid.cell_at(Point::new(0, 3)).is_none());
    }

    #[test]
    fn test_out_of_bounds_edits_are_ignored() {
        let mut grid = Grid::new(3, 3);

        assert!(!grid.set_obstacle(Point::new(3, 1), true));
        assert!(!grid.set_start(Point::new(0, 7)));
        assert!(!grid.set_end(Point::new(9, 9)));

        assert!(all_passable(&grid).into_iter().all(|p| p));
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), None);
    }

    #[test]
    fn test_obstacle_clears_role() {
        let mut grid = Grid::new(3, 3);
        grid.set_start(Point::new(0, 0));
        grid.set_end(Point::new(2, 2));

        assert!(grid.set_obstacle(Point::new(0, 0), true));
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), Some(Point::new(2, 2)));

        assert!(grid.set_obstacle(Point::new(2, 2), true));
        assert_eq!(grid.end(), None);

        // redundant edit
        assert!(!grid.set_obstacle(Point::new(2, 2), true));

        // start/end cannot be placed on an obstacle
        assert!(!grid.set_start(Point::new(0, 0)));
        assert!(!grid.set_end(Point::new(2, 2)));

        assert!(grid.set_obstacle(Point::new(2, 2), false));
        assert!(grid.set_end(Point::new(2, 2)));
    }

    #[test]
    fn test_new_role_wins() {
        let mut grid = Grid::new(3, 1);
        grid.set_start(Point::new(0, 0));
        grid.set_end(Point::new(2, 0));

        // moving the end onto the start takes the cell over
        assert!(grid.set_end(Point::new(0, 0)));
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), Some(Point::new(0, 0)));

        assert!(grid.set_start(Point::new(0, 0)));
        assert_eq!(grid.start(), Some(Point::new(0, 0)));
        assert_eq!(grid.end(), None);

        // relocating replaces the previous occupant
        assert!(grid.set_start(Point::new(1, 0)));
        assert_eq!(grid.start(), Some(Point::new(1, 0)));

        assert!(grid.set_end(Point::new(2, 0)));
        assert!(grid.clear_end());
        assert!(!grid.clear_end());
        assert!(grid.clear_start());
        assert_eq!((grid.start(), grid.end()), (None, None));
    }

    #[test]
    fn test_reset_visitation_keeps_layout() {
        let mut grid: Grid = "S.#\n..E".parse().unwrap();

        let cell = grid.cell_at_mut(Point::new(1, 0)).unwrap();
        cell.visit_state = VisitState::Visited;
        cell.distance = Some(1);
        cell.expansion_order = Some(1);
        cell.from = Some(Point::new(0, 0));

        grid.reset_visitation();

        assert!(grid
            .points()
            .all(|p| *grid.cell_at(p).unwrap() == Cell {
                passable: grid.is_passable(p),
                ..Cell::default()
            }));
        assert!(!grid.is_passable(Point::new(2, 0)));
        assert_eq!(grid.start(), Some(Point::new(0, 0)));
        assert_eq!(grid.end(), Some(Point::new(2, 1)));
    }

    #[test]
    fn test_neighbors() {
        let grid: Grid = "...\n.#.\n...".parse().unwrap();

        let n: Vec<Point> = grid.neighbors_of(Point::new(1, 0)).collect();
        assert_eq!(n, vec![Point::new(0, 0), Point::new(2, 0)]);

        let n: Vec<Point> = grid.neighbors_of(Point::new(0, 1)).collect();
        assert_eq!(n, vec![Point::new(0, 0), Point::new(0, 2)]);

        let n: Vec<Point> = grid.neighbors_of(Point::new(2, 2)).collect();
        assert_eq!(n, vec![Point::new(2, 1), Point::new(1, 2)]);

        assert_eq!(grid.neighbors_of(Point::new(5, 5)).count(), 0);
    }

    #[test]
    fn test_layout_roundtrip() {
        let layout = "S..#\n.#..\n...E\n";
        let grid: Grid = layout.parse().unwrap();

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.to_string(), layout);
    }

    #[test]
    fn test_layout_errors() {
        assert!("".parse::<Grid>().is_err());
        assert!("..\n...".parse::<Grid>().is_err());
        assert!("S.S".parse::<Grid>().is_err());
        assert!("E.E".parse::<Grid>().is_err());
        assert!(".x.".parse::<Grid>().is_err());
    }

    #[test]
    fn test_serde() {
        let grid: Grid = "S#\n.E".parse().unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();

        assert_eq!(back.to_string(), grid.to_string());
    }

    #[test]
    fn test_serde_rejects_inconsistent_grid() {
        let cell = serde_json::to_string(&Cell::default()).unwrap();
        let blocked = serde_json::to_string(&Cell {
            passable: false,
            ..Cell::default()
        })
        .unwrap();

        // too few cells for the size
        let json = r#"{"width":3,"height":1,"cells":[],"start":null,"end":null}"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());

        // start out of bounds
        let json = format!(
            r#"{{"width":1,"height":1,"cells":[{}],"start":{{"x":4,"y":0}},"end":null}}"#,
            cell
        );
        assert!(serde_json::from_str::<Grid>(&json).is_err());

        // end on an obstacle
        let json = format!(
            r#"{{"width":2,"height":1,"cells":[{},{}],"start":null,"end":{{"x":1,"y":0}}}}"#,
            cell, blocked
        );
        assert!(serde_json::from_str::<Grid>(&json).is_err());

        // start and end on the same cell
        let origin = r#"{"x":0,"y":0}"#;
        let json = format!(
            r#"{{"width":1,"height":1,"cells":[{}],"start":{},"end":{}}}"#,
            cell, origin, origin
        );
        assert!(serde_json::from_str::<Grid>(&json).is_err());

        let json = format!(
            r#"{{"width":2,"height":1,"cells":[{},{}],"start":{{"x":0,"y":0}},"end":null}}"#,
            cell, cell
        );
        let grid: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(grid.to_string(), "S.\n");
    }
}
