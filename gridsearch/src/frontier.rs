use std::{cmp::Ordering, collections::HashMap};

use crate::grid::Point;

/// The objects that we store in the priority queue
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct ToVisit {
    priority: usize,
    point: Point,
}

impl Ord for ToVisit {
    fn cmp(&self, other: &Self) -> Ordering {
        // ties are broken on the coordinates so the order never depends on
        // the order in which points were pushed
        self.priority
            .cmp(&other.priority)
            .then(self.point.x.cmp(&other.point.x))
            .then(self.point.y.cmp(&other.point.y))
    }
}

impl PartialOrd for ToVisit {
    fn partial_cmp(&self, other: &ToVisit) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority worklist of discovered points.
///
/// A binary heap stored in a `Vec`, with a side table from point to heap slot
/// so that an entry can be found and have its priority lowered in place.
/// Every point is held at most once.
#[derive(Debug, Default, Clone)]
pub struct Frontier {
    heap: Vec<ToVisit>,
    slots: HashMap<Point, usize>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.slots.contains_key(&point)
    }

    pub fn priority_of(&self, point: Point) -> Option<usize> {
        self.slots.get(&point).map(|&i| self.heap[i].priority)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    /// Insert a point, or lower its priority if it is already queued with a
    /// higher one. Pushing an equal or higher priority for a queued point
    /// does nothing.
    pub fn push(&mut self, point: Point, priority: usize) {
        if let Some(&i) = self.slots.get(&point) {
            if priority < self.heap[i].priority {
                self.heap[i].priority = priority;
                self.sift_up(i);
            }
            return;
        }

        let i = self.heap.len();
        self.heap.push(ToVisit { priority, point });
        self.slots.insert(point, i);
        self.sift_up(i);
    }

    /// Remove and return the point with the lowest priority. Ties go to the
    /// lower `x`, then the lower `y`.
    pub fn pop_min(&mut self) -> Option<Point> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);

        let min = self.heap.pop()?;
        self.slots.remove(&min.point);

        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(min.point)
    }

    /// All queued points with their priorities, in the order they would be
    /// popped.
    pub fn snapshot(&self) -> Vec<(Point, usize)> {
        let mut entries = self.heap.clone();
        entries.sort();
        entries.into_iter().map(|e| (e.point, e.priority)).collect()
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].point, a);
        self.slots.insert(self.heap[b].point, b);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i] >= self.heap[parent] {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;

            let mut smallest = i;
            if left < len && self.heap[left] < self.heap[smallest] {
                smallest = left;
            }
            if right < len && self.heap[right] < self.heap[smallest] {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn drain(frontier: &mut Frontier) -> Vec<Point> {
        std::iter::from_fn(|| frontier.pop_min()).collect()
    }

    #[test]
    fn test_pop_order() {
        let mut frontier = Frontier::new();
        frontier.push(Point::new(0, 0), 5);
        frontier.push(Point::new(1, 0), 2);
        frontier.push(Point::new(2, 0), 9);
        frontier.push(Point::new(3, 0), 0);

        assert_eq!(frontier.len(), 4);
        assert_eq!(
            drain(&mut frontier),
            vec![
                Point::new(3, 0),
                Point::new(1, 0),
                Point::new(0, 0),
                Point::new(2, 0)
            ]
        );
        assert!(frontier.is_empty());
        assert_eq!(frontier.pop_min(), None);
    }

    #[test]
    fn test_tie_break_ignores_insertion_order() {
        let points = [
            Point::new(2, 1),
            Point::new(0, 3),
            Point::new(2, 0),
            Point::new(1, 1),
            Point::new(0, 1),
        ];
        let expected = vec![
            Point::new(0, 1),
            Point::new(0, 3),
            Point::new(1, 1),
            Point::new(2, 0),
            Point::new(2, 1),
        ];

        let mut forward = Frontier::new();
        points.iter().for_each(|p| forward.push(*p, 4));
        assert_eq!(drain(&mut forward), expected);

        let mut backward = Frontier::new();
        points.iter().rev().for_each(|p| backward.push(*p, 4));
        assert_eq!(drain(&mut backward), expected);
    }

    #[test]
    fn test_decrease_key() {
        let mut frontier = Frontier::new();
        frontier.push(Point::new(0, 0), 3);
        frontier.push(Point::new(1, 0), 4);
        frontier.push(Point::new(2, 0), 5);

        frontier.push(Point::new(2, 0), 1);
        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.priority_of(Point::new(2, 0)), Some(1));

        // equal or higher priorities are ignored
        frontier.push(Point::new(0, 0), 3);
        frontier.push(Point::new(0, 0), 10);
        assert_eq!(frontier.priority_of(Point::new(0, 0)), Some(3));
        assert_eq!(frontier.len(), 3);

        assert_eq!(
            drain(&mut frontier),
            vec![Point::new(2, 0), Point::new(0, 0), Point::new(1, 0)]
        );
    }

    #[test]
    fn test_contains_and_clear() {
        let mut frontier = Frontier::new();
        frontier.push(Point::new(4, 4), 1);
        frontier.push(Point::new(1, 2), 1);

        assert!(frontier.contains(Point::new(4, 4)));
        assert!(!frontier.contains(Point::new(0, 0)));

        assert_eq!(frontier.pop_min(), Some(Point::new(1, 2)));
        assert!(!frontier.contains(Point::new(1, 2)));
        assert_eq!(frontier.priority_of(Point::new(1, 2)), None);

        frontier.clear();
        assert!(frontier.is_empty());
        assert!(!frontier.contains(Point::new(4, 4)));
    }

    #[test]
    fn test_snapshot_is_pop_order() {
        let mut frontier = Frontier::new();
        for (i, p) in [(3, 3), (0, 2), (1, 1), (2, 0), (0, 0)].iter().enumerate() {
            frontier.push(Point::new(p.0, p.1), i % 2);
        }

        let snapshot = frontier.snapshot();
        assert_eq!(snapshot.len(), 5);

        let popped = drain(&mut frontier);
        assert_eq!(
            snapshot.into_iter().map(|(p, _)| p).collect::<Vec<_>>(),
            popped
        );
    }

    #[test]
    fn test_many_entries_stay_sorted() {
        let mut frontier = Frontier::new();
        // scrambled but deterministic priorities
        for i in 0..200usize {
            let p = Point::new(i % 17, i / 17);
            frontier.push(p, (i * 37) % 23);
        }
        for i in (0..200usize).step_by(3) {
            let p = Point::new(i % 17, i / 17);
            frontier.push(p, (i * 11) % 5);
        }

        let mut previous: Option<(usize, usize, usize)> = None;
        loop {
            let Some((point, priority)) = frontier.snapshot().first().copied() else {
                break;
            };
            assert_eq!(frontier.pop_min(), Some(point));
            let key = (priority, point.x, point.y);
            if let Some(prev) = previous {
                assert!(prev < key);
            }
            previous = Some(key);
        }
        assert!(frontier.is_empty());
    }
}
