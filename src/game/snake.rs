//! Snake body

use std::collections::{HashSet, VecDeque};

use super::location::Cell;

/// Snake body segments, head first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Create a single-segment snake
    pub fn new(head: Cell) -> Self {
        let mut body = VecDeque::new();
        body.push_front(head);
        Self { body }
    }

    /// Create a snake from explicit segments, head first.
    ///
    /// Returns `None` if the segments are empty or not grid-adjacent.
    pub fn from_segments<I: IntoIterator<Item = Cell>>(segments: I) -> Option<Self> {
        let body: VecDeque<Cell> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        let connected = body
            .iter()
            .zip(body.iter().skip(1))
            .all(|(a, b)| a.is_adjacent(b));
        connected.then_some(Self { body })
    }

    /// Get the snake's head location
    pub fn head(&self) -> Cell {
        // The body is never empty, so index 0 always exists
        self.body[0]
    }

    /// Get the tail segment
    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Get all body locations
    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body.contains(cell)
    }

    /// True if `cell` hits the body that will remain after this tick.
    ///
    /// When the snake grows the whole body stays. Otherwise the tail
    /// vacates, so moving onto it is legal.
    pub fn collides(&self, cell: &Cell, growing: bool) -> bool {
        let keep = if growing { self.body.len() } else { self.body.len() - 1 };
        self.body.iter().take(keep).any(|segment| segment == cell)
    }

    /// Push a new head and trim the tail unless growing
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }

    pub fn occupied(&self) -> HashSet<Cell> {
        self.body.iter().copied().collect()
    }

    /// Reset the snake to a single segment
    pub fn reset(&mut self, head: Cell) {
        self.body.clear();
        self.body.push_front(head);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(points: &[(i32, i32)]) -> Vec<Cell> {
        points.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    #[test]
    fn test_new_snake() {
        let snake = Snake::new(Cell::new(10, 10));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), snake.tail());
    }

    #[test]
    fn test_from_segments_rejects_gaps() {
        assert!(Snake::from_segments(cells(&[(2, 0), (1, 0), (0, 0)])).is_some());
        assert!(Snake::from_segments(cells(&[(3, 0), (1, 0)])).is_none());
        assert!(Snake::from_segments(Vec::new()).is_none());
    }

    #[test]
    fn test_advance_without_growth() {
        let mut snake = Snake::from_segments(cells(&[(2, 0), (1, 0), (0, 0)])).unwrap();
        snake.advance(Cell::new(3, 0), false);
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), cells(&[(3, 0), (2, 0), (1, 0)]));
    }

    #[test]
    fn test_advance_with_growth() {
        let mut snake = Snake::new(Cell::new(5, 5));
        snake.advance(Cell::new(5, 4), true);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Cell::new(5, 4));
        assert_eq!(snake.tail(), Cell::new(5, 5));
    }

    #[test]
    fn test_collides_tail_rule() {
        let snake = Snake::from_segments(cells(&[(1, 1), (1, 0), (0, 0), (0, 1)])).unwrap();
        let tail = Cell::new(0, 1);

        assert!(!snake.collides(&tail, false));
        assert!(snake.collides(&tail, true));
        assert!(snake.collides(&Cell::new(0, 0), false));
    }
}
