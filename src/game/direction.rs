//! Direction enum for snake movement

use serde::{Deserialize, Serialize};

/// One of the four unit steps on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// (0, -1)
    Up,
    /// (0, 1)
    Down,
    /// (-1, 0)
    Left,
    /// (1, 0)
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse direction from a key or command name
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "north" | "arrowup" | "w" => Some(Direction::Up),
            "down" | "south" | "arrowdown" | "s" => Some(Direction::Down),
            "left" | "west" | "arrowleft" | "a" => Some(Direction::Left),
            "right" | "east" | "arrowright" | "d" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit vector as (dx, dy)
    pub fn vector(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Two directions are opposite iff their vectors sum to zero
    pub fn is_opposite(&self, other: &Direction) -> bool {
        let (ax, ay) = self.vector();
        let (bx, by) = other.vector();
        ax + bx == 0 && ay + by == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(Direction::from_str("up"), Some(Direction::Up));
        assert_eq!(Direction::from_str("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_str("D"), Some(Direction::Right));
        assert_eq!(Direction::from_str("invalid"), None);
    }

    #[test]
    fn test_is_opposite() {
        assert!(Direction::Up.is_opposite(&Direction::Down));
        assert!(Direction::Right.is_opposite(&Direction::Left));
        assert!(!Direction::Up.is_opposite(&Direction::Right));
        assert!(!Direction::Left.is_opposite(&Direction::Left));
    }

    #[test]
    fn test_opposite_is_symmetric() {
        for a in Direction::ALL {
            for b in Direction::ALL {
                assert_eq!(a.is_opposite(&b), b.is_opposite(&a));
            }
        }
    }
}
